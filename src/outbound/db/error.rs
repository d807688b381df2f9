use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error with sqlx")]
    DatabaseError(#[from] sqlx::Error),

    #[error("the resource could not be found")]
    NotFound,

    #[error("the resource already exists")]
    OnConflict,

    #[error("a referenced resource does not exist ({0})")]
    InvalidReference(String),
}

impl Error {
    /// Classifies constraint violations raised by a write.
    pub fn from_write(err: sqlx::Error) -> Self {
        if let Some(database_error) = err.as_database_error() {
            if database_error.is_unique_violation() {
                return Self::OnConflict;
            }

            if database_error.is_foreign_key_violation() {
                return Self::InvalidReference(
                    database_error.constraint().unwrap_or_default().to_string(),
                );
            }
        }

        Self::DatabaseError(err)
    }
}
