use std::collections::HashMap;

use sqlx::{FromRow, PgConnection};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::error::{ServiceError, ServiceResult};
use crate::auth::{hash_password, verify_password};
use crate::config::SecurityConfig;
use crate::database::models::{ApplicationReceipt, Job, NewUser, User, UserDetail, UserRecord, UserUpdate};
use crate::database::query_builder;
use crate::sql::{sql_for_partial_update, SqlValue};

const TABLE: &str = "users";
const COLUMNS: &str = "username, first_name, last_name, email, is_admin";
const INVALID_CREDENTIALS: &str = "Invalid username/password";

/// Compared against when the username is unknown, so both failures cost one bcrypt check.
static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

/// A job row tagged with the applicant.
#[derive(FromRow)]
struct AppliedJob {
    username: String,
    #[sqlx(flatten)]
    job: Job,
}

/// User persistence and credential checks.
///
/// Built from the security configuration so the hash work factor is never
/// read from ambient state.
#[derive(Debug, Clone)]
pub struct UserService {
    work_factor: u32,
}

impl UserService {
    pub fn new(security: &SecurityConfig) -> Self {
        Self { work_factor: security.bcrypt_work_factor }
    }

    /// Check a username/password pair.
    ///
    /// Unknown user and wrong password fail identically.
    pub async fn authenticate(&self, conn: &mut PgConnection, username: &str, password: &str) -> ServiceResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!("SELECT password, {} FROM users WHERE username = $1", COLUMNS))
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?;

        let user = self.check_credentials(record, password).await;
        if user.is_err() {
            debug!(username, "Authentication failed");
        }
        user
    }

    async fn check_credentials(&self, record: Option<UserRecord>, password: &str) -> ServiceResult<User> {
        match record {
            Some(record) => {
                if verify_password(password, &record.password).await? {
                    return Ok(record.into_user());
                }
            }
            None => {
                let dummy = DUMMY_HASH
                    .get_or_try_init(|| hash_password("jobly-dummy-password", self.work_factor))
                    .await?;
                verify_password(password, dummy).await?;
            }
        }
        Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))
    }

    /// Create a user with a hashed password. `Conflict` if the username is taken.
    pub async fn register(&self, conn: &mut PgConnection, data: &NewUser) -> ServiceResult<User> {
        let duplicate = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
            .bind(&data.username)
            .fetch_optional(&mut *conn)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!("Duplicate username: {}", data.username)));
        }

        let hashed = hash_password(&data.password, self.work_factor).await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            COLUMNS
        ))
        .bind(&data.username)
        .bind(hashed)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(data.is_admin)
        .fetch_one(&mut *conn)
        .await?;

        info!(username = %user.username, is_admin = user.is_admin, "Registered user");
        Ok(user)
    }

    /// Every user with the jobs they applied to, ordered by username.
    pub async fn find_all(conn: &mut PgConnection) -> ServiceResult<Vec<UserDetail>> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users ORDER BY username", COLUMNS))
            .fetch_all(&mut *conn)
            .await?;

        let applied = sqlx::query_as::<_, AppliedJob>(
            "SELECT a.username, j.id, j.title, j.salary, j.equity, j.company_handle
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             ORDER BY j.id",
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut by_user: HashMap<String, Vec<Job>> = HashMap::new();
        for row in applied {
            by_user.entry(row.username).or_default().push(row.job);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let jobs = by_user.remove(&user.username).unwrap_or_default();
                UserDetail { user, jobs }
            })
            .collect())
    }

    pub async fn get(conn: &mut PgConnection, username: &str) -> ServiceResult<UserDetail> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE username = $1", COLUMNS))
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No user: {}", username)))?;

        let jobs = sqlx::query_as::<_, Job>(
            "SELECT j.id, j.title, j.salary, j.equity, j.company_handle
             FROM applications a
             JOIN jobs j ON j.id = a.job_id
             WHERE a.username = $1
             ORDER BY j.id",
        )
        .bind(username)
        .fetch_all(&mut *conn)
        .await?;

        Ok(UserDetail { user, jobs })
    }

    /// Partial update. A supplied password is hashed before it is stored.
    ///
    /// This can grant admin rights; callers decide who may do that.
    pub async fn update(&self, conn: &mut PgConnection, username: &str, data: &UserUpdate) -> ServiceResult<User> {
        let password_hash = match &data.password {
            Some(Some(password)) => Some(hash_password(password, self.work_factor).await?),
            _ => None,
        };

        let update = sql_for_partial_update(&data.to_fields(password_hash), UserUpdate::JS_TO_SQL)?;
        let user = query_builder::update_one::<User>(conn, TABLE, &update, "username", SqlValue::from(username), COLUMNS)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No user: {}", username)))?;

        info!(username = %user.username, fields = update.values.len(), "Updated user");
        Ok(user)
    }

    pub async fn remove(conn: &mut PgConnection, username: &str) -> ServiceResult<()> {
        let removed = query_builder::execute(conn, "DELETE FROM users WHERE username = $1", &[SqlValue::from(username)]).await?;
        if removed == 0 {
            return Err(ServiceError::NotFound(format!("No user: {}", username)));
        }
        info!(username, "Removed user");
        Ok(())
    }

    /// Record that `username` applied to `job_id`.
    ///
    /// User and job are looked up independently; when both are missing the
    /// error names both.
    pub async fn apply_for_job(conn: &mut PgConnection, username: &str, job_id: i32) -> ServiceResult<ApplicationReceipt> {
        let user_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&mut *conn)
            .await?;
        let job_exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1)")
            .bind(job_id)
            .fetch_one(&mut *conn)
            .await?;

        match (user_exists, job_exists) {
            (true, true) => {}
            (false, true) => return Err(ServiceError::NotFound(format!("No user: {}", username))),
            (true, false) => return Err(ServiceError::NotFound(format!("No job: {}", job_id))),
            (false, false) => {
                return Err(ServiceError::NotFound(format!("No user: {}; no job: {}", username, job_id)))
            }
        }

        let inserted = query_builder::execute(
            conn,
            "INSERT INTO applications (username, job_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            &[SqlValue::from(username), SqlValue::from(job_id)],
        )
        .await?;
        if inserted == 0 {
            return Err(ServiceError::Conflict(format!("{} already applied to job {}", username, job_id)));
        }

        info!(username, job_id, "Recorded application");
        Ok(ApplicationReceipt { applied: job_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::ErrorKind;

    fn record(password: String) -> UserRecord {
        UserRecord {
            username: "u1".to_string(),
            password,
            first_name: "U1F".to_string(),
            last_name: "U1L".to_string(),
            email: "u1@email.com".to_string(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn unknown_user_still_checks_a_hash() {
        let service = UserService::new(&AppConfig::test().security);
        let err = service.check_credentials(None, "password1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(DUMMY_HASH.get().is_some_and(|hash| hash.starts_with("$2b$")));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_read_the_same() {
        let service = UserService::new(&AppConfig::test().security);
        let hash = hash_password("password1", service.work_factor).await.unwrap();

        let user = service.check_credentials(Some(record(hash.clone())), "password1").await.unwrap();
        assert_eq!(user.username, "u1");

        let wrong = service.check_credentials(Some(record(hash)), "wrong").await.unwrap_err();
        let missing = service.check_credentials(None, "wrong").await.unwrap_err();
        assert_eq!(wrong.to_string(), missing.to_string());
    }
}
