use sqlx::PgConnection;
use tracing::info;

use super::error::{ServiceError, ServiceResult};
use crate::database::models::{Job, JobUpdate, NewJob};
use crate::database::query_builder;
use crate::filter::{compose_job_filter, FilterQuery, JobFilter};
use crate::sql::{sql_for_partial_update, SqlValue};

const TABLE: &str = "jobs";
const COLUMNS: &str = "id, title, salary, equity, company_handle";

pub struct JobService;

impl JobService {
    /// Insert a job under an existing company.
    pub async fn create(conn: &mut PgConnection, data: &NewJob) -> ServiceResult<Job> {
        let company = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.company_handle)
            .fetch_optional(&mut *conn)
            .await?;
        if company.is_none() {
            return Err(ServiceError::NotFound(format!("No company: {}", data.company_handle)));
        }

        let job = sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            COLUMNS
        ))
        .bind(&data.title)
        .bind(data.salary)
        .bind(data.equity)
        .bind(&data.company_handle)
        .fetch_one(&mut *conn)
        .await?;

        info!(id = job.id, company = %job.company_handle, "Created job");
        Ok(job)
    }

    /// Every job in insertion order.
    pub async fn find_all(conn: &mut PgConnection) -> ServiceResult<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs ORDER BY id", COLUMNS))
            .fetch_all(&mut *conn)
            .await?;
        Ok(jobs)
    }

    pub async fn filter(conn: &mut PgConnection, criteria: &JobFilter) -> ServiceResult<Vec<Job>> {
        let query = compose_job_filter(criteria)?;
        Self::find_matching(conn, &query).await
    }

    /// Run an already composed filter. A targeted search with no hits is `NotFound`.
    pub async fn find_matching(conn: &mut PgConnection, query: &FilterQuery) -> ServiceResult<Vec<Job>> {
        let jobs: Vec<Job> = query_builder::select_all(conn, &query.to_sql(TABLE, COLUMNS)).await?;
        if jobs.is_empty() && query.is_targeted() {
            return Err(ServiceError::NotFound("No jobs fit criteria".to_string()));
        }
        Ok(jobs)
    }

    pub async fn get(conn: &mut PgConnection, id: i32) -> ServiceResult<Job> {
        sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs WHERE id = $1", COLUMNS))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No job: {}", id)))
    }

    /// Partial update of title, salary and equity.
    pub async fn update(conn: &mut PgConnection, id: i32, data: &JobUpdate) -> ServiceResult<Job> {
        let update = sql_for_partial_update(&data.to_fields(), JobUpdate::JS_TO_SQL)?;
        let job = query_builder::update_one::<Job>(conn, TABLE, &update, "id", SqlValue::from(id), COLUMNS)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No job: {}", id)))?;

        info!(id = job.id, fields = update.values.len(), "Updated job");
        Ok(job)
    }

    pub async fn remove(conn: &mut PgConnection, id: i32) -> ServiceResult<()> {
        let removed = query_builder::execute(conn, "DELETE FROM jobs WHERE id = $1", &[SqlValue::from(id)]).await?;
        if removed == 0 {
            return Err(ServiceError::NotFound(format!("No job: {}", id)));
        }
        info!(id, "Removed job");
        Ok(())
    }
}
