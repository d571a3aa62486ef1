#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl ReadError {
    /// Whether the error is caused by a store that could not be reached.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ReadError::Storage(StorageError::NoConnection))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_read_error_from_storage_error() {
        assert!(matches!(
            ReadError::from(StorageError::NoConnection),
            ReadError::Storage(StorageError::NoConnection)
        ));
        assert!(matches!(
            ReadError::from(StorageError::Other("foo".into())),
            ReadError::Storage(StorageError::Other(error)) if error.to_string() == "foo"
        ));
    }

    #[test]
    fn test_read_error_display() {
        assert_eq!(ReadError::NotFound.to_string(), "not found");
        assert_eq!(
            ReadError::from(StorageError::NoConnection).to_string(),
            "no connection"
        );
        assert_eq!(ReadError::Other("bar".into()).to_string(), "bar");
    }

    #[test]
    fn test_read_error_is_unreachable() {
        assert!(ReadError::from(StorageError::NoConnection).is_unreachable());
        assert!(!ReadError::from(StorageError::Other("foo".into())).is_unreachable());
        assert!(!ReadError::NotFound.is_unreachable());
    }
}
