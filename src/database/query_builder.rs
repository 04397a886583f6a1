use sqlx::{postgres::PgRow, FromRow, PgConnection};

use crate::filter::SqlResult;
use crate::sql::value::{bind_param_query, bind_param_query_as};
use crate::sql::{PartialUpdate, SqlValue};

/// Run a composed SELECT and map every row.
pub async fn select_all<T>(conn: &mut PgConnection, sql_result: &SqlResult) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(query = %sql_result.query, params = sql_result.params.len(), "select");
    let mut q = sqlx::query_as::<_, T>(&sql_result.query);
    for p in sql_result.params.iter() {
        q = bind_param_query_as(q, p);
    }
    q.fetch_all(conn).await
}

/// `UPDATE <table> SET <compiled> WHERE "<key_column>" = $n RETURNING <returning>`.
///
/// The key is bound after the SET values, so its index is `values.len() + 1`.
pub async fn update_one<T>(
    conn: &mut PgConnection,
    table: &str,
    update: &PartialUpdate,
    key_column: &str,
    key: SqlValue,
    returning: &str,
) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = update_sql(table, update, key_column, returning);
    tracing::debug!(query = %sql, "update");

    let mut q = sqlx::query_as::<_, T>(&sql);
    for p in update.values.iter() {
        q = bind_param_query_as(q, p);
    }
    q = bind_param_query_as(q, &key);
    q.fetch_optional(conn).await
}

/// Execute a statement that returns no rows of interest; yields rows affected.
pub async fn execute(conn: &mut PgConnection, sql: &str, params: &[SqlValue]) -> Result<u64, sqlx::Error> {
    let mut q = sqlx::query(sql);
    for p in params {
        q = bind_param_query(q, p);
    }
    Ok(q.execute(conn).await?.rows_affected())
}

fn update_sql(table: &str, update: &PartialUpdate, key_column: &str, returning: &str) -> String {
    format!(
        "UPDATE {} SET {} WHERE \"{}\" = {} RETURNING {}",
        table,
        update.set_cols,
        key_column,
        update.next_placeholder(),
        returning
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{sql_for_partial_update, UpdateFields};

    #[test]
    fn key_placeholder_follows_set_values() {
        let fields = UpdateFields::new().with("name", "New").with("numEmployees", 10);
        let update = sql_for_partial_update(&fields, &[("numEmployees", "num_employees")]).unwrap();
        assert_eq!(
            update_sql("companies", &update, "handle", "handle"),
            "UPDATE companies SET \"name\"=$1, \"num_employees\"=$2 WHERE \"handle\" = $3 RETURNING handle"
        );
    }
}
