use super::AuthError;

/// Hash `password` with bcrypt at `work_factor`.
///
/// bcrypt is deliberately slow, so the work runs on the blocking pool.
pub async fn hash_password(password: &str, work_factor: u32) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, work_factor))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Compare `password` with a stored bcrypt hash. A malformed hash never matches.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?;

    match verified {
        Ok(valid) => Ok(valid),
        Err(e) => {
            tracing::warn!("Stored password hash could not be parsed: {}", e);
            Ok(false)
        }
    }
}
