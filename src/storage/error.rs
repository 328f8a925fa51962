use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No database connection! Connect to the database first.")]
    ConnectionNotOpen,

    #[error("Owner '{0}' doesn't exist")]
    OwnerNotFound(String),

    #[error("Failed to execute query: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored pet row is invalid: {0}")]
    CorruptRow(String),
}
