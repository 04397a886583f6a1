use sqlx::{Executor, PgPool};
use tracing::info;

use super::manager::DatabaseError;

/// The four relations backing the API. Idempotent.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS companies (
    handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
    name TEXT UNIQUE NOT NULL,
    num_employees INTEGER CHECK (num_employees >= 0),
    description TEXT NOT NULL,
    logo_url TEXT
);

CREATE TABLE IF NOT EXISTS jobs (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    salary INTEGER CHECK (salary >= 0),
    equity NUMERIC CHECK (equity <= 1.0 AND equity >= 0),
    company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS users (
    username VARCHAR(25) PRIMARY KEY,
    password TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL CHECK (position('@' IN email) > 1),
    is_admin BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE TABLE IF NOT EXISTS applications (
    username VARCHAR(25) REFERENCES users ON DELETE CASCADE,
    job_id INTEGER REFERENCES jobs ON DELETE CASCADE,
    PRIMARY KEY (username, job_id)
);
"#;

pub async fn init_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    // Simple-query protocol: several statements in one round trip
    pool.execute(SCHEMA_SQL).await?;
    info!("Database schema is in place");
    Ok(())
}
