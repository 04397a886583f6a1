use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{double_option, FieldErrors, Job};
use crate::sql::UpdateFields;

/// A user as returned to callers. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

/// Stored user row including the password hash. Internal only.
#[derive(Clone, FromRow)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl UserRecord {
    pub fn into_user(self) -> User {
        User {
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            is_admin: self.is_admin,
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    /// Jobs the user applied to.
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplicationReceipt {
    pub applied: i32,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

const PASSWORD_MIN: usize = 5;
const PASSWORD_MAX: usize = 72;

impl NewUser {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = FieldErrors::new();
        errors.check_len("username", &self.username, 1, 25);
        errors.check_len("password", &self.password, PASSWORD_MIN, PASSWORD_MAX);
        errors.check_len("firstName", &self.first_name, 1, 30);
        errors.check_len("lastName", &self.last_name, 1, 30);
        errors.check_len("email", &self.email, 6, 60);
        errors.check_email("email", &self.email);
        errors.into_result()
    }
}

/// Partial user update. The username is not updatable.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    #[serde(default, deserialize_with = "double_option")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub password: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub is_admin: Option<Option<bool>>,
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

impl UserUpdate {
    pub const JS_TO_SQL: &'static [(&'static str, &'static str)] = &[
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("isAdmin", "is_admin"),
    ];

    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = FieldErrors::new();
        errors.check_not_null("firstName", &self.first_name);
        errors.check_not_null("lastName", &self.last_name);
        errors.check_not_null("password", &self.password);
        errors.check_not_null("email", &self.email);
        errors.check_not_null("isAdmin", &self.is_admin);
        if let Some(Some(v)) = &self.first_name {
            errors.check_len("firstName", v, 1, 30);
        }
        if let Some(Some(v)) = &self.last_name {
            errors.check_len("lastName", v, 1, 30);
        }
        if let Some(Some(v)) = &self.password {
            errors.check_len("password", v, PASSWORD_MIN, PASSWORD_MAX);
        }
        if let Some(Some(v)) = &self.email {
            errors.check_len("email", v, 6, 60);
            errors.check_email("email", v);
        }
        errors.into_result()
    }

    /// Supplied fields in declaration order, not body order. `password_hash` replaces the
    /// plaintext password when one was supplied.
    pub fn to_fields(&self, password_hash: Option<String>) -> UpdateFields {
        let mut fields = UpdateFields::new();
        if let Some(v) = &self.first_name {
            fields.set("firstName", v.clone());
        }
        if let Some(v) = &self.last_name {
            fields.set("lastName", v.clone());
        }
        if self.password.is_some() {
            fields.set("password", password_hash);
        }
        if let Some(v) = &self.email {
            fields.set("email", v.clone());
        }
        if let Some(Some(v)) = self.is_admin {
            fields.set("isAdmin", v);
        }
        fields
    }

    pub fn grants_admin(&self) -> bool {
        matches!(self.is_admin, Some(Some(true)))
    }
}
