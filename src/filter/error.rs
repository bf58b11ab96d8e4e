use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("page must be 1 or greater, got {0}")]
    InvalidPage(i64),

    #[error("page_size must be 1 or greater, got {0}")]
    InvalidPageSize(i64),
}
