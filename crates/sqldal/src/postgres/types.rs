//! `Value` <-> PostgreSQL conversions.
//!
//! Binding is directed by the parameter type the server inferred for each
//! marker, so a `Value::Text` bound to a `uuid` or `jsonb` column is parsed on
//! the way in. Result columns of types without a native `Value` variant come
//! back as text.

use crate::error::{DalError, DalResult};
use crate::row::Row;
use crate::value::Value;
use bytes::BytesMut;
use rust_decimal::Decimal;
use std::error::Error;
use tokio_postgres::types::{to_sql_checked, FromSql, IsNull, ToSql, Type};

type BoxError = Box<dyn Error + Sync + Send>;

fn mismatch(kind: &str, ty: &Type) -> BoxError {
    format!("cannot bind {kind} value to parameter of type {ty}").into()
}

fn integer_to_sql(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::INT8 => v.to_sql(ty, out),
        Type::OID => u32::try_from(v)?.to_sql(ty, out),
        Type::BOOL => (v != 0).to_sql(ty, out),
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::NUMERIC => Decimal::from(v).to_sql(ty, out),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR => v.to_string().to_sql(ty, out),
        _ => Err(mismatch("integer", ty)),
    }
}

fn float_to_sql(v: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => (v as f32).to_sql(ty, out),
        Type::FLOAT8 => v.to_sql(ty, out),
        Type::NUMERIC => Decimal::try_from(v)?.to_sql(ty, out),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR => v.to_string().to_sql(ty, out),
        _ => Err(mismatch("float", ty)),
    }
}

/// Accepts the literals PostgreSQL itself accepts for `bool` input.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Some(true),
        "f" | "false" | "n" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn text_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            s.to_sql(ty, out)
        }
        Type::INT2 | Type::INT4 | Type::INT8 => integer_to_sql(s.trim().parse()?, ty, out),
        Type::FLOAT4 | Type::FLOAT8 => float_to_sql(s.trim().parse()?, ty, out),
        Type::NUMERIC => s.trim().parse::<Decimal>()?.to_sql(ty, out),
        Type::BOOL => parse_bool(s)
            .ok_or_else(|| format!("invalid boolean literal '{s}'"))?
            .to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out),
        Type::UUID => uuid::Uuid::parse_str(s)?.to_sql(ty, out),
        Type::TIMESTAMPTZ => chrono::DateTime::parse_from_rfc3339(s)?
            .with_timezone(&chrono::Utc)
            .to_sql(ty, out),
        Type::TIMESTAMP => {
            let ts = s
                .parse::<chrono::NaiveDateTime>()
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))?;
            ts.to_sql(ty, out)
        }
        Type::DATE => s.parse::<chrono::NaiveDate>()?.to_sql(ty, out),
        _ => Err(mismatch("text", ty)),
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Integer(v) => integer_to_sql(*v, ty, out),
            Value::Float(v) => float_to_sql(*v, ty, out),
            Value::Text(s) => text_to_sql(s, ty, out),
            Value::Blob(b) if *ty == Type::BYTEA => b.to_sql(ty, out),
            Value::Blob(_) => Err(mismatch("blob", ty)),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn get<'a, T: FromSql<'a>>(
    row: &'a tokio_postgres::Row,
    idx: usize,
    column: &str,
) -> DalResult<Option<T>> {
    row.try_get::<_, Option<T>>(idx)
        .map_err(|e| DalError::decode(column, e.to_string()))
}

fn decode_value(row: &tokio_postgres::Row, idx: usize, ty: &Type, column: &str) -> DalResult<Value> {
    let value = match *ty {
        Type::BOOL => get::<bool>(row, idx, column)?.map(Value::from),
        Type::INT2 => get::<i16>(row, idx, column)?.map(Value::from),
        Type::INT4 => get::<i32>(row, idx, column)?.map(Value::from),
        Type::INT8 => get::<i64>(row, idx, column)?.map(Value::from),
        Type::OID => get::<u32>(row, idx, column)?.map(Value::from),
        Type::FLOAT4 => get::<f32>(row, idx, column)?.map(Value::from),
        Type::FLOAT8 => get::<f64>(row, idx, column)?.map(Value::from),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            get::<String>(row, idx, column)?.map(Value::from)
        }
        Type::BYTEA => get::<Vec<u8>>(row, idx, column)?.map(Value::from),
        Type::NUMERIC => get::<Decimal>(row, idx, column)?.map(|d| Value::Text(d.to_string())),
        Type::UUID => get::<uuid::Uuid>(row, idx, column)?.map(|u| Value::Text(u.to_string())),
        Type::JSON | Type::JSONB => {
            get::<serde_json::Value>(row, idx, column)?.map(|j| Value::Text(j.to_string()))
        }
        Type::TIMESTAMPTZ => get::<chrono::DateTime<chrono::Utc>>(row, idx, column)?
            .map(|t| Value::Text(t.to_rfc3339())),
        Type::TIMESTAMP => get::<chrono::NaiveDateTime>(row, idx, column)?
            .map(|t| Value::Text(t.to_string())),
        Type::DATE => get::<chrono::NaiveDate>(row, idx, column)?.map(|d| Value::Text(d.to_string())),
        ref other => {
            return Err(DalError::decode(
                column,
                format!("unsupported column type {other}"),
            ));
        }
    };
    Ok(value.unwrap_or(Value::Null))
}

/// Convert a driver row into a [`Row`].
pub(crate) fn decode_row(row: &tokio_postgres::Row) -> DalResult<Row> {
    let mut columns = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        columns.push(column.name().to_string());
        values.push(decode_value(row, idx, column.type_(), column.name())?);
    }
    Row::new(columns, values)
}
