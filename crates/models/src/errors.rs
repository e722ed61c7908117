use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("database error: {0}")]
    Db(String),
    #[error("column `{column}` out of range: {value}")]
    OutOfRange { column: &'static str, value: i64 },
}
