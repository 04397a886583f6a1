use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{double_option, FieldErrors, Job};
use crate::sql::UpdateFields;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Company without its employee count, returned by unbounded searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompanyListing {
    Summary(Vec<CompanySummary>),
    Full(Vec<Company>),
}

impl CompanyListing {
    pub fn len(&self) -> usize {
        match self {
            CompanyListing::Summary(rows) => rows.len(),
            CompanyListing::Full(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn handles(&self) -> Vec<&str> {
        match self {
            CompanyListing::Summary(rows) => rows.iter().map(|c| c.handle.as_str()).collect(),
            CompanyListing::Full(rows) => rows.iter().map(|c| c.handle.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = FieldErrors::new();
        errors.check_len("handle", &self.handle, 1, 25);
        if self.handle != self.handle.to_lowercase() {
            errors.add("handle", "must be lowercase");
        }
        errors.check_len("name", &self.name, 1, 255);
        errors.check_non_negative("numEmployees", self.num_employees);
        errors.into_result()
    }
}

/// Partial company update. The handle is not updatable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub num_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo_url: Option<Option<String>>,
}

impl CompanyUpdate {
    pub const JS_TO_SQL: &'static [(&'static str, &'static str)] =
        &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")];

    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = FieldErrors::new();
        errors.check_not_null("name", &self.name);
        errors.check_not_null("description", &self.description);
        if let Some(Some(name)) = &self.name {
            errors.check_len("name", name, 1, 255);
        }
        errors.check_non_negative("numEmployees", self.num_employees.flatten());
        errors.into_result()
    }

    /// Supplied fields only, in declaration order. Body key order is not
    /// kept, so `$n` numbering follows this struct rather than the request.
    pub fn to_fields(&self) -> UpdateFields {
        let mut fields = UpdateFields::new();
        if let Some(v) = &self.name {
            fields.set("name", v.clone());
        }
        if let Some(v) = &self.description {
            fields.set("description", v.clone());
        }
        if let Some(v) = self.num_employees {
            fields.set("numEmployees", v);
        }
        if let Some(v) = &self.logo_url {
            fields.set("logoUrl", v.clone());
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{sql_for_partial_update, SqlValue};

    #[test]
    fn update_rejects_handle_change() {
        let err = serde_json::from_str::<CompanyUpdate>(r#"{"handle": "c1-new"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn update_keeps_only_supplied_fields() {
        let update: CompanyUpdate =
            serde_json::from_str(r#"{"numEmployees": null, "name": "New"}"#).unwrap();
        let compiled = sql_for_partial_update(&update.to_fields(), CompanyUpdate::JS_TO_SQL).unwrap();
        assert_eq!(compiled.set_cols, "\"name\"=$1, \"num_employees\"=$2");
        assert_eq!(compiled.values, vec![SqlValue::from("New"), SqlValue::Int(None)]);
    }

    #[test]
    fn update_rejects_null_name() {
        let update: CompanyUpdate = serde_json::from_str(r#"{"name": null}"#).unwrap();
        let errors = update.validate().unwrap_err();
        assert_eq!(errors["name"], "cannot be null");
    }

    #[test]
    fn new_company_validation() {
        let company: NewCompany = serde_json::from_str(
            r#"{"handle": "New", "name": "New", "description": "d", "numEmployees": -1}"#,
        )
        .unwrap();
        let errors = company.validate().unwrap_err();
        assert!(errors.contains_key("handle"));
        assert!(errors.contains_key("numEmployees"));
    }

    #[test]
    fn summary_listing_serializes_without_employee_count() {
        let listing = CompanyListing::Summary(vec![CompanySummary {
            handle: "c1".into(),
            name: "C1".into(),
            description: "Desc1".into(),
            logo_url: Some("http://c1.img".into()),
        }]);
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "handle": "c1",
                "name": "C1",
                "description": "Desc1",
                "logoUrl": "http://c1.img"
            }])
        );
    }
}
