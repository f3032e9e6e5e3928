pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Parsing errors
    #[error("{0}")]
    ParsingError(String),
    // Email client errors
    #[error("Failed to send email: {0}")]
    SendEmail(#[source] reqwest::Error),
    // Database errors
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
