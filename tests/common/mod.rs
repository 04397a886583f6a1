#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};
use tokio::sync::OnceCell;

use jobly_api::auth::hash_password;
use jobly_api::config::{AppConfig, MIN_BCRYPT_WORK_FACTOR};
use jobly_api::database::{init_schema, DatabaseManager};
use jobly_api::AppState;

static SCHEMA: OnceCell<()> = OnceCell::const_new();

/// Connect to the test database, or `None` when no database is configured.
///
/// `DATABASE_URL` names the server; the database itself is always `jobly_test`.
pub async fn test_pool() -> Option<PgPool> {
    let base = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set; skipping database test");
            return None;
        }
    };

    let url = match DatabaseManager::build_connection_string(&base, "jobly_test") {
        Ok(url) => url,
        Err(e) => {
            eprintln!("unusable DATABASE_URL ({}); skipping database test", e);
            return None;
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("cannot reach jobly_test ({}); skipping database test", e);
            return None;
        }
    };

    SCHEMA
        .get_or_try_init(|| async { init_schema(&pool).await })
        .await
        .expect("schema init");

    Some(pool)
}

/// Ids of the seeded jobs, in insertion order.
pub struct Seeded {
    pub job_ids: [i32; 3],
}

/// Replace all rows with the fixture set. Run inside a transaction that the
/// test drops, so nothing outlives the test.
///
/// Companies c1..c3 have 1..3 employees; users u1/u2 have passwords
/// password1/password2; jobs j1..j3 belong to c1..c3.
pub async fn seed(conn: &mut PgConnection) -> Result<Seeded> {
    sqlx::query("DELETE FROM applications").execute(&mut *conn).await?;
    sqlx::query("DELETE FROM jobs").execute(&mut *conn).await?;
    sqlx::query("DELETE FROM companies").execute(&mut *conn).await?;
    sqlx::query("DELETE FROM users").execute(&mut *conn).await?;

    sqlx::query(
        "INSERT INTO companies (handle, name, num_employees, description, logo_url)
         VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
                ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
                ('c3', 'C3', 3, 'Desc3', 'http://c3.img')",
    )
    .execute(&mut *conn)
    .await?;

    let password1 = hash_password("password1", MIN_BCRYPT_WORK_FACTOR).await?;
    let password2 = hash_password("password2", MIN_BCRYPT_WORK_FACTOR).await?;
    sqlx::query(
        "INSERT INTO users (username, password, first_name, last_name, email)
         VALUES ('u1', $1, 'U1F', 'U1L', 'u1@email.com'),
                ('u2', $2, 'U2F', 'U2L', 'u2@email.com')",
    )
    .bind(password1)
    .bind(password2)
    .execute(&mut *conn)
    .await?;

    let ids: Vec<i32> = sqlx::query_scalar(
        "INSERT INTO jobs (title, salary, equity, company_handle)
         VALUES ('j1', 100, 0.1, 'c1'),
                ('j2', 200, 0.2, 'c2'),
                ('j3', 300, 0, 'c3')
         RETURNING id",
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut job_ids = ids.clone();
    job_ids.sort_unstable();
    Ok(Seeded {
        job_ids: job_ids.try_into().map_err(|_| anyhow::anyhow!("expected three jobs, got {:?}", ids))?,
    })
}

/// App state over a pool that never connects unless a handler touches it.
pub fn lazy_state() -> AppState {
    let config = AppConfig::test();
    let db = DatabaseManager::connect_lazy(&config.database).expect("lazy pool");
    AppState::new(db, config)
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    /// Start the built binary on a free port.
    pub fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_jobly-api"))
            .env("JOBLY_API_PORT", port.to_string())
            .env("APP_ENV", "test")
            .env("DATABASE_CONNECTION_TIMEOUT", "2")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(format!("{}/", self.base_url)).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
