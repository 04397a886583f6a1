use crate::sql::SqlValue;

/// Accumulates conjunctive conditions and numbers their parameters.
pub struct FilterWhere {
    param_values: Vec<SqlValue>,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self {
            param_values: vec![],
            conditions: vec![],
        }
    }

    /// Case-insensitive substring match. `%`, `_` and `\` in `needle` match literally.
    pub fn contains(&mut self, column: &str, needle: &str) -> &mut Self {
        let pattern = format!("%{}%", Self::escape_like(needle));
        let placeholder = self.param(SqlValue::from(pattern));
        self.conditions.push(format!("\"{}\" ILIKE {}", column, placeholder));
        self
    }

    pub fn gte(&mut self, column: &str, value: i32) -> &mut Self {
        let placeholder = self.param(SqlValue::from(value));
        self.conditions.push(format!("\"{}\" >= {}", column, placeholder));
        self
    }

    pub fn lte(&mut self, column: &str, value: i32) -> &mut Self {
        let placeholder = self.param(SqlValue::from(value));
        self.conditions.push(format!("\"{}\" <= {}", column, placeholder));
        self
    }

    /// Parameterless predicate, e.g. `"equity" > 0`.
    pub fn raw(&mut self, condition: impl Into<String>) -> &mut Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn generate(self) -> (String, Vec<SqlValue>) {
        (self.conditions.join(" AND "), self.param_values)
    }

    fn param(&mut self, value: SqlValue) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }

    fn escape_like(needle: &str) -> String {
        let mut out = String::with_capacity(needle.len());
        for c in needle.chars() {
            if matches!(c, '%' | '_' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out
    }
}

impl Default for FilterWhere {
    fn default() -> Self {
        Self::new()
    }
}
