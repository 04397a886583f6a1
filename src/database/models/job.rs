use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{double_option, FieldErrors};
use crate::sql::UpdateFields;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

fn check_equity(errors: &mut FieldErrors, equity: Option<Decimal>) {
    if matches!(equity, Some(e) if e < Decimal::ZERO || e > Decimal::ONE) {
        errors.add("equity", "must be between 0 and 1");
    }
}

impl NewJob {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = FieldErrors::new();
        errors.check_len("title", &self.title, 1, 255);
        errors.check_len("companyHandle", &self.company_handle, 1, 25);
        errors.check_non_negative("salary", self.salary);
        check_equity(&mut errors, self.equity);
        errors.into_result()
    }
}

/// Partial job update. Neither the id nor the owning company can change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub equity: Option<Option<Decimal>>,
}

impl JobUpdate {
    pub const JS_TO_SQL: &'static [(&'static str, &'static str)] = &[];

    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = FieldErrors::new();
        errors.check_not_null("title", &self.title);
        if let Some(Some(title)) = &self.title {
            errors.check_len("title", title, 1, 255);
        }
        errors.check_non_negative("salary", self.salary.flatten());
        check_equity(&mut errors, self.equity.flatten());
        errors.into_result()
    }

    /// Supplied fields in declaration order, whatever order the body used.
    pub fn to_fields(&self) -> UpdateFields {
        let mut fields = UpdateFields::new();
        if let Some(v) = &self.title {
            fields.set("title", v.clone());
        }
        if let Some(v) = self.salary {
            fields.set("salary", v);
        }
        if let Some(v) = self.equity {
            fields.set("equity", v);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn equity_serializes_as_decimal_string() {
        let job = Job {
            id: 1,
            title: "j1".into(),
            salary: Some(100),
            equity: Some(Decimal::from_str("0.1").unwrap()),
            company_handle: "c1".into(),
        };
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["equity"], "0.1");
        assert_eq!(value["companyHandle"], "c1");
    }

    #[test]
    fn update_rejects_company_change() {
        assert!(serde_json::from_str::<JobUpdate>(r#"{"companyHandle": "c2"}"#).is_err());
        assert!(serde_json::from_str::<JobUpdate>(r#"{"id": 7}"#).is_err());
    }

    #[test]
    fn equity_out_of_range_is_invalid() {
        let job: NewJob = serde_json::from_str(
            r#"{"title": "t", "salary": 10, "equity": 1.5, "companyHandle": "c1"}"#,
        )
        .unwrap();
        let errors = job.validate().unwrap_err();
        assert_eq!(errors["equity"], "must be between 0 and 1");
    }

    #[test]
    fn update_to_fields_orders_title_salary_equity() {
        let update: JobUpdate = serde_json::from_str(r#"{"equity": null, "title": "New"}"#).unwrap();
        assert!(update.validate().is_ok());
        let fields = update.to_fields();
        let names: Vec<&str> = fields.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["title", "equity"]);
    }
}
