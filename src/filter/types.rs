use serde::Deserialize;

use crate::sql::SqlValue;

/// Company search criteria as they arrive on `GET /companies`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

/// Job search criteria as they arrive on `GET /jobs`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

/// Which columns a filtered listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Everything except the bounded quantity.
    Summary,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// No criteria at all; an empty result is a valid answer.
    Browse,
    /// At least one criterion; an empty result means nothing matched.
    Targeted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// Composed filter: predicate, bind parameters, ordering and projection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    pub projection: Projection,
    pub mode: SearchMode,
    /// Conjunction without the `WHERE` keyword; empty when unfiltered.
    pub where_clause: String,
    pub params: Vec<SqlValue>,
    pub order: Vec<FilterOrderInfo>,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlValue>,
}
