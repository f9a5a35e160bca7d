//! Façade configuration.

use std::collections::BTreeSet;

/// How UPDATE binds its SET and WHERE values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateBinding {
    /// SET and WHERE bind independently. A WHERE marker whose name collides
    /// with a SET field is renamed (`id` becomes `:id_where`), so both values
    /// reach the driver.
    #[default]
    Scoped,
    /// SET and WHERE share one merged bind set; on a name collision the
    /// condition value overwrites the data value.
    Merged,
}

/// Configuration for [`Database`](crate::Database).
#[derive(Debug, Clone)]
pub struct DalConfig {
    /// UPDATE binding mode.
    pub update_binding: UpdateBinding,
    /// When set, only these table names may be used.
    pub allowed_tables: Option<BTreeSet<String>>,
    /// Truncate logged SQL to this many bytes. `None` means no truncation.
    pub max_log_sql_length: Option<usize>,
    /// Read the insert id from `RETURNING <column>` instead of asking the
    /// connection for its last insert id.
    pub insert_returning: Option<String>,
}

impl Default for DalConfig {
    fn default() -> Self {
        Self {
            update_binding: UpdateBinding::Scoped,
            allowed_tables: None,
            max_log_sql_length: Some(200),
            insert_returning: None,
        }
    }
}

impl DalConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the UPDATE binding mode.
    pub fn update_binding(mut self, mode: UpdateBinding) -> Self {
        self.update_binding = mode;
        self
    }

    /// Restrict statements to the given tables.
    pub fn allow_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tables = Some(tables.into_iter().map(Into::into).collect());
        self
    }

    /// Append `RETURNING <column>` to INSERT and return that column as the id.
    ///
    /// Needed on PostgreSQL for tables whose key is not sequence-backed.
    pub fn insert_returning(mut self, column: impl Into<String>) -> Self {
        self.insert_returning = Some(column.into());
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_log_sql_length(mut self, len: usize) -> Self {
        self.max_log_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_log_truncate(mut self) -> Self {
        self.max_log_sql_length = None;
        self
    }
}
