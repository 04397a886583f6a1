use sqlx::PgConnection;
use tracing::info;

use super::error::{ServiceError, ServiceResult};
use crate::database::models::{Company, CompanyDetail, CompanyListing, CompanyUpdate, Job, NewCompany};
use crate::database::query_builder;
use crate::filter::{compose_company_filter, CompanyFilter, FilterQuery, Projection};
use crate::sql::{sql_for_partial_update, SqlValue};

const TABLE: &str = "companies";
const COLUMNS: &str = "handle, name, description, num_employees, logo_url";
const SUMMARY_COLUMNS: &str = "handle, name, description, logo_url";

pub struct CompanyService;

impl CompanyService {
    /// Insert a company. `Conflict` if the handle or the name is taken.
    pub async fn create(conn: &mut PgConnection, data: &NewCompany) -> ServiceResult<Company> {
        let duplicate = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(&mut *conn)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!("Duplicate company: {}", data.handle)));
        }
        Self::ensure_name_free(conn, &data.name, None).await?;

        let company = sqlx::query_as::<_, Company>(&format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            COLUMNS
        ))
        .bind(&data.handle)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.num_employees)
        .bind(&data.logo_url)
        .fetch_one(&mut *conn)
        .await?;

        info!(handle = %company.handle, "Created company");
        Ok(company)
    }

    /// Every company, ordered by name.
    pub async fn find_all(conn: &mut PgConnection) -> ServiceResult<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(&format!("SELECT {} FROM companies ORDER BY name", COLUMNS))
            .fetch_all(&mut *conn)
            .await?;
        Ok(companies)
    }

    pub async fn filter(conn: &mut PgConnection, criteria: &CompanyFilter) -> ServiceResult<CompanyListing> {
        let query = compose_company_filter(criteria)?;
        Self::find_matching(conn, &query).await
    }

    /// Run an already composed filter. A targeted search with no hits is `NotFound`.
    pub async fn find_matching(conn: &mut PgConnection, query: &FilterQuery) -> ServiceResult<CompanyListing> {
        let listing = match query.projection {
            Projection::Summary => {
                let sql = query.to_sql(TABLE, SUMMARY_COLUMNS);
                CompanyListing::Summary(query_builder::select_all(conn, &sql).await?)
            }
            Projection::Full => {
                let sql = query.to_sql(TABLE, COLUMNS);
                CompanyListing::Full(query_builder::select_all(conn, &sql).await?)
            }
        };

        if listing.is_empty() && query.is_targeted() {
            return Err(ServiceError::NotFound("No companies fit criteria".to_string()));
        }
        Ok(listing)
    }

    /// A company and its jobs.
    pub async fn get(conn: &mut PgConnection, handle: &str) -> ServiceResult<CompanyDetail> {
        let company = sqlx::query_as::<_, Company>(&format!("SELECT {} FROM companies WHERE handle = $1", COLUMNS))
            .bind(handle)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No company: {}", handle)))?;

        let jobs = sqlx::query_as::<_, Job>(
            "SELECT id, title, salary, equity, company_handle
             FROM jobs
             WHERE company_handle = $1
             ORDER BY id",
        )
        .bind(handle)
        .fetch_all(&mut *conn)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update; only supplied fields change.
    pub async fn update(conn: &mut PgConnection, handle: &str, data: &CompanyUpdate) -> ServiceResult<Company> {
        let update = sql_for_partial_update(&data.to_fields(), CompanyUpdate::JS_TO_SQL)?;
        if let Some(Some(name)) = &data.name {
            Self::ensure_name_free(conn, name, Some(handle)).await?;
        }
        let company = query_builder::update_one::<Company>(conn, TABLE, &update, "handle", SqlValue::from(handle), COLUMNS)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No company: {}", handle)))?;

        info!(handle = %company.handle, fields = update.values.len(), "Updated company");
        Ok(company)
    }

    /// Company names are unique. `owner` may already hold the name.
    async fn ensure_name_free(conn: &mut PgConnection, name: &str, owner: Option<&str>) -> ServiceResult<()> {
        let holder = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
        match holder {
            Some(holder) if Some(holder.as_str()) != owner => {
                Err(ServiceError::Conflict(format!("Duplicate company name: {}", name)))
            }
            _ => Ok(()),
        }
    }

    /// Delete a company; its jobs go with it.
    pub async fn remove(conn: &mut PgConnection, handle: &str) -> ServiceResult<()> {
        let removed = query_builder::execute(conn, "DELETE FROM companies WHERE handle = $1", &[SqlValue::from(handle)]).await?;
        if removed == 0 {
            return Err(ServiceError::NotFound(format!("No company: {}", handle)));
        }
        info!(handle, "Removed company");
        Ok(())
    }
}
