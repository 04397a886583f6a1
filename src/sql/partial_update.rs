use super::error::SqlError;
use super::value::SqlValue;

/// Ordered field-name to value mapping for a partial update.
///
/// Iteration order is insertion order; it decides the `$n` parameter indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateFields {
    entries: Vec<(String, SqlValue)>,
}

impl UpdateFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Re-setting an existing name replaces the value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// Output of [`sql_for_partial_update`].
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    /// `"col_a"=$1, "col_b"=$2`
    pub set_cols: String,
    pub values: Vec<SqlValue>,
}

impl PartialUpdate {
    /// Placeholder for the first parameter after the SET values, e.g. the WHERE key.
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.values.len() + 1)
    }
}

/// Compile a SET clause for the supplied fields.
///
/// `js_to_sql` maps external field names to column names; fields without an
/// entry are used verbatim. Fails on an empty field set.
pub fn sql_for_partial_update(
    data: &UpdateFields,
    js_to_sql: &[(&str, &str)],
) -> Result<PartialUpdate, SqlError> {
    if data.is_empty() {
        return Err(SqlError::NoData);
    }

    let mut cols = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (idx, (name, value)) in data.iter().enumerate() {
        let column = js_to_sql
            .iter()
            .find(|(js, _)| *js == name)
            .map(|(_, sql)| *sql)
            .unwrap_or(name);
        cols.push(format!("\"{}\"=${}", column, idx + 1));
        values.push(value.clone());
    }

    Ok(PartialUpdate { set_cols: cols.join(", "), values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_names_and_numbers_parameters_in_order() {
        let data = UpdateFields::new().with("firstName", "Aliya").with("age", 32);
        let result = sql_for_partial_update(&data, &[("firstName", "first_name")]).unwrap();

        assert_eq!(result.set_cols, "\"first_name\"=$1, \"age\"=$2");
        assert_eq!(result.values, vec![SqlValue::from("Aliya"), SqlValue::from(32)]);
        assert_eq!(result.next_placeholder(), "$3");
    }

    #[test]
    fn untranslated_key_is_used_verbatim() {
        let data = UpdateFields::new().with("age", 5);
        let result = sql_for_partial_update(&data, &[]).unwrap();
        assert_eq!(result.set_cols, "\"age\"=$1");
        assert_eq!(result.values, vec![SqlValue::Int(Some(5))]);
    }

    #[test]
    fn order_follows_insertion_not_name() {
        let data = UpdateFields::new()
            .with("logoUrl", "http://new.img")
            .with("description", "New")
            .with("numEmployees", 10);
        let result = sql_for_partial_update(
            &data,
            &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")],
        )
        .unwrap();
        assert_eq!(
            result.set_cols,
            "\"logo_url\"=$1, \"description\"=$2, \"num_employees\"=$3"
        );
        assert_eq!(result.values[0], SqlValue::from("http://new.img"));
        assert_eq!(result.values[2], SqlValue::from(10));
    }

    #[test]
    fn explicit_null_is_kept_as_typed_null() {
        let data = UpdateFields::new()
            .with("numEmployees", None::<i32>)
            .with("logoUrl", None::<String>);
        let result = sql_for_partial_update(&data, &[("numEmployees", "num_employees")]).unwrap();
        assert_eq!(result.set_cols, "\"num_employees\"=$1, \"logoUrl\"=$2");
        assert_eq!(result.values, vec![SqlValue::Int(None), SqlValue::Text(None)]);
        assert!(result.values.iter().all(SqlValue::is_null));
    }

    #[test]
    fn resetting_a_field_keeps_its_position() {
        let data = UpdateFields::new().with("a", 1).with("b", 2).with("a", 3);
        let result = sql_for_partial_update(&data, &[]).unwrap();
        assert_eq!(result.set_cols, "\"a\"=$1, \"b\"=$2");
        assert_eq!(result.values, vec![SqlValue::from(3), SqlValue::from(2)]);
    }

    #[test]
    fn empty_update_is_rejected() {
        let err = sql_for_partial_update(&UpdateFields::new(), &[("a", "b")]).unwrap_err();
        assert!(matches!(err, SqlError::NoData));
        assert_eq!(err.to_string(), "No data");
    }
}
