pub mod manager;
pub mod models;

/// True when `err` is a PostgreSQL unique violation on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err.as_database_error() {
        Some(db) => db.code().as_deref() == Some("23505") && db.constraint() == Some(constraint),
        None => false,
    }
}
