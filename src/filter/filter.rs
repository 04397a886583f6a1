use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{CompanyFilter, FilterQuery, JobFilter, Projection, SearchMode, SqlResult};

/// Builds a [`FilterQuery`] from independently optional criteria.
///
/// Each criterion contributes at most one clause; clauses are joined with AND
/// in the order the builder methods are called.
pub struct Filter {
    identity_column: &'static str,
    quantity_column: &'static str,
    summary_when_unbounded: bool,
    where_clause: FilterWhere,
    has_text: bool,
    has_min: bool,
    has_max: bool,
}

impl Filter {
    pub fn new(identity_column: &'static str, quantity_column: &'static str) -> Self {
        Self {
            identity_column,
            quantity_column,
            summary_when_unbounded: false,
            where_clause: FilterWhere::new(),
            has_text: false,
            has_min: false,
            has_max: false,
        }
    }

    /// Leave the bounded quantity out of the projection unless a bound is given.
    pub fn summary_when_unbounded(mut self) -> Self {
        self.summary_when_unbounded = true;
        self
    }

    pub fn contains(mut self, column: &str, needle: Option<&str>) -> Self {
        if let Some(needle) = needle {
            self.where_clause.contains(column, needle);
            self.has_text = true;
        }
        self
    }

    /// Inclusive bounds on the quantity column. Fails when both are given and min > max.
    pub fn bounds(
        mut self,
        (min_field, min): (&'static str, Option<i32>),
        (max_field, max): (&'static str, Option<i32>),
    ) -> Result<Self, FilterError> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(FilterError::MinExceedsMax { min_field, max_field });
            }
        }
        if let Some(min) = min {
            self.where_clause.gte(self.quantity_column, min);
            self.has_min = true;
        }
        if let Some(max) = max {
            self.where_clause.lte(self.quantity_column, max);
            self.has_max = true;
        }
        Ok(self)
    }

    /// Tri-state flag: `Some(true)` is `column > 0`, `Some(false)` is `column = 0`.
    pub fn positive(mut self, column: &str, flag: Option<bool>) -> Self {
        if let Some(flag) = flag {
            let op = if flag { ">" } else { "=" };
            self.where_clause.raw(format!("\"{}\" {} 0", column, op));
        }
        self
    }

    pub fn build(self) -> FilterQuery {
        let bounded = self.has_min || self.has_max;
        let mode = if self.where_clause.is_empty() { SearchMode::Browse } else { SearchMode::Targeted };
        let projection = if self.summary_when_unbounded && !bounded {
            Projection::Summary
        } else {
            Projection::Full
        };
        let direction = FilterOrder::decide(self.has_text, self.has_min, self.has_max);
        let order = FilterOrder::resolve(direction, self.quantity_column, self.identity_column);
        let (where_clause, params) = self.where_clause.generate();

        FilterQuery { projection, mode, where_clause, params, order }
    }
}

impl FilterQuery {
    pub fn is_targeted(&self) -> bool {
        self.mode == SearchMode::Targeted
    }

    /// Render the SELECT for `table` with the given select list.
    pub fn to_sql(&self, table: &str, columns: &str) -> SqlResult {
        let query = [
            format!("SELECT {}", columns),
            format!("FROM {}", table),
            if self.where_clause.is_empty() { String::new() } else { format!("WHERE {}", self.where_clause) },
            FilterOrder::generate(&self.order),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params: self.params.clone() }
    }
}

pub fn compose_company_filter(criteria: &CompanyFilter) -> Result<FilterQuery, FilterError> {
    let filter = Filter::new("handle", "num_employees")
        .summary_when_unbounded()
        .contains("name", criteria.name.as_deref())
        .bounds(
            ("minEmployees", criteria.min_employees),
            ("maxEmployees", criteria.max_employees),
        )?;
    Ok(filter.build())
}

pub fn compose_job_filter(criteria: &JobFilter) -> Result<FilterQuery, FilterError> {
    let filter = Filter::new("id", "salary")
        .contains("title", criteria.title.as_deref())
        .bounds(("minSalary", criteria.min_salary), ("maxSalary", criteria.max_salary))?
        .positive("equity", criteria.has_equity);
    Ok(filter.build())
}
