use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::{FromRow, Postgres};

/// A typed, nullable bind parameter.
///
/// Keeping the Postgres type on nulls matters: an untyped NULL bound as TEXT
/// cannot be assigned to an INTEGER or NUMERIC column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Text(Option<String>),
    Int(Option<i32>),
    Decimal(Option<Decimal>),
    Bool(Option<bool>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::Text(v) => v.is_none(),
            SqlValue::Int(v) => v.is_none(),
            SqlValue::Decimal(v) => v.is_none(),
            SqlValue::Bool(v) => v.is_none(),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(Some(v.to_string()))
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(Some(v))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        SqlValue::Text(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(Some(v))
    }
}

impl From<Option<i32>> for SqlValue {
    fn from(v: Option<i32>) -> Self {
        SqlValue::Int(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::Decimal(Some(v))
    }
}

impl From<Option<Decimal>> for SqlValue {
    fn from(v: Option<Decimal>) -> Self {
        SqlValue::Decimal(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(Some(v))
    }
}

pub fn bind_param_query<'q>(
    q: Query<'q, Postgres, PgArguments>,
    v: &SqlValue,
) -> Query<'q, Postgres, PgArguments> {
    match v.clone() {
        SqlValue::Text(s) => q.bind(s),
        SqlValue::Int(i) => q.bind(i),
        SqlValue::Decimal(d) => q.bind(d),
        SqlValue::Bool(b) => q.bind(b),
    }
}

pub fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    v: &SqlValue,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v.clone() {
        SqlValue::Text(s) => q.bind(s),
        SqlValue::Int(i) => q.bind(i),
        SqlValue::Decimal(d) => q.bind(d),
        SqlValue::Bool(b) => q.bind(b),
    }
}
