mod common;

use anyhow::Result;
use serde_json::json;

use jobly_api::config::AppConfig;
use jobly_api::database::models::{NewUser, UserUpdate};
use jobly_api::services::{ErrorKind, UserService};

fn service() -> UserService {
    UserService::new(&AppConfig::test().security)
}

#[tokio::test]
async fn authenticate_accepts_only_the_right_password() -> Result<()> {
    let Some(pool) = common::test_pool().await else { return Ok(()) };
    let mut tx = pool.begin().await?;
    common::seed(&mut tx).await?;

    let user = service().authenticate(&mut tx, "u1", "password1").await?;
    assert_eq!(user.first_name, "U1F");
    assert!(!user.is_admin);

    let wrong = service().authenticate(&mut tx, "u1", "wrong").await.unwrap_err();
    let missing = service().authenticate(&mut tx, "nope", "password1").await.unwrap_err();
    assert_eq!(wrong.kind(), ErrorKind::Unauthorized);
    assert_eq!(wrong.to_string(), missing.to_string());
    Ok(())
}

#[tokio::test]
async fn register_hashes_and_rejects_duplicates() -> Result<()> {
    let Some(pool) = common::test_pool().await else { return Ok(()) };
    let mut tx = pool.begin().await?;
    common::seed(&mut tx).await?;

    let new = NewUser {
        username: "new".into(),
        password: "password".into(),
        first_name: "Test".into(),
        last_name: "Tester".into(),
        email: "test@test.com".into(),
        is_admin: true,
    };
    let user = service().register(&mut tx, &new).await?;
    assert!(user.is_admin);

    let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE username = 'new'")
        .fetch_one(&mut *tx)
        .await?;
    assert!(stored.starts_with("$2b$"));

    let err = service().register(&mut tx, &new).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.to_string(), "Duplicate username: new");
    Ok(())
}

#[tokio::test]
async fn find_all_and_get_include_applications() -> Result<()> {
    let Some(pool) = common::test_pool().await else { return Ok(()) };
    let mut tx = pool.begin().await?;
    let seeded = common::seed(&mut tx).await?;

    UserService::apply_for_job(&mut tx, "u1", seeded.job_ids[1]).await?;

    let users = UserService::find_all(&mut tx).await?;
    let names: Vec<_> = users.iter().map(|u| u.user.username.as_str()).collect();
    assert_eq!(names, ["u1", "u2"]);
    assert_eq!(users[0].jobs.len(), 1);
    assert_eq!(users[0].jobs[0].title, "j2");
    assert!(users[1].jobs.is_empty());

    let detail = UserService::get(&mut tx, "u1").await?;
    assert_eq!(detail.user.email, "u1@email.com");
    assert_eq!(detail.jobs.len(), 1);

    let body = serde_json::to_value(&detail)?;
    assert!(body.get("password").is_none());
    assert_eq!(body["isAdmin"], false);

    assert_eq!(UserService::get(&mut tx, "nope").await.unwrap_err().kind(), ErrorKind::NotFound);
    Ok(())
}

#[tokio::test]
async fn update_rehashes_password() -> Result<()> {
    let Some(pool) = common::test_pool().await else { return Ok(()) };
    let mut tx = pool.begin().await?;
    common::seed(&mut tx).await?;

    let update: UserUpdate = serde_json::from_value(json!({ "firstName": "New", "password": "new-password" }))?;
    let user = service().update(&mut tx, "u1", &update).await?;
    assert_eq!(user.first_name, "New");

    service().authenticate(&mut tx, "u1", "new-password").await?;
    assert_eq!(
        service().authenticate(&mut tx, "u1", "password1").await.unwrap_err().kind(),
        ErrorKind::Unauthorized
    );

    let err = service().update(&mut tx, "nope", &update).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[tokio::test]
async fn remove_user() -> Result<()> {
    let Some(pool) = common::test_pool().await else { return Ok(()) };
    let mut tx = pool.begin().await?;
    common::seed(&mut tx).await?;

    UserService::remove(&mut tx, "u1").await?;
    assert_eq!(UserService::remove(&mut tx, "u1").await.unwrap_err().kind(), ErrorKind::NotFound);
    Ok(())
}

#[tokio::test]
async fn apply_for_job_checks_both_sides() -> Result<()> {
    let Some(pool) = common::test_pool().await else { return Ok(()) };
    let mut tx = pool.begin().await?;
    let seeded = common::seed(&mut tx).await?;
    let job = seeded.job_ids[0];

    let receipt = UserService::apply_for_job(&mut tx, "u1", job).await?;
    assert_eq!(receipt.applied, job);

    let err = UserService::apply_for_job(&mut tx, "u1", job).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = UserService::apply_for_job(&mut tx, "nope", job).await.unwrap_err();
    assert_eq!(err.to_string(), "No user: nope");

    let err = UserService::apply_for_job(&mut tx, "u1", -1).await.unwrap_err();
    assert_eq!(err.to_string(), "No job: -1");

    let err = UserService::apply_for_job(&mut tx, "nope", -1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "No user: nope; no job: -1");
    Ok(())
}
