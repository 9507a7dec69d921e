use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocGraphError {
    #[error("duplicate insertion: {0}")]
    DuplicateInsertion(String),
    #[error("not inserted: {0}")]
    NotInserted(String),
    #[error("dangling reference: {0}")]
    DanglingReference(String),
    #[error("invalid anchor: {0}")]
    InvalidAnchor(String),
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("malformed store: {0}")]
    MalformedStore(String),
    #[error("io error: {0}")]
    Io(String),
}

impl DocGraphError {
    pub fn duplicate_insertion<T: Into<String>>(msg: T) -> Self {
        DocGraphError::DuplicateInsertion(msg.into())
    }

    pub fn not_inserted<T: Into<String>>(msg: T) -> Self {
        DocGraphError::NotInserted(msg.into())
    }

    pub fn dangling<T: Into<String>>(msg: T) -> Self {
        DocGraphError::DanglingReference(msg.into())
    }

    pub fn invalid_anchor<T: Into<String>>(msg: T) -> Self {
        DocGraphError::InvalidAnchor(msg.into())
    }

    pub fn missing_element<T: Into<String>>(msg: T) -> Self {
        DocGraphError::MissingElement(msg.into())
    }

    pub fn malformed<T: Into<String>>(msg: T) -> Self {
        DocGraphError::MalformedStore(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        DocGraphError::Io(msg.into())
    }
}
