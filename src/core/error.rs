use thiserror::Error;

/// Числовые коды ошибок, общие для роутера, логов и страниц ошибок
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidArgument,
    InvalidFormat,
    NotFoundPath,
    AccessDenied,
    NoConnection,
    NoSession,
    SessionInvalid,
    PostgresqlError,
    PostgresqlConnectionFailure,
    NotDefined,
    Failure,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::InvalidArgument => 1,
            Self::InvalidFormat => 2,
            Self::NotFoundPath => 4,
            Self::AccessDenied => 6,
            Self::NoConnection => 7,
            Self::NoSession => 9,
            Self::SessionInvalid => 10,
            Self::PostgresqlError => 12,
            Self::PostgresqlConnectionFailure => 13,
            Self::NotDefined => 15,
            Self::Failure => 16,
        }
    }
}

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Invalid argument '{0}'")]
    InvalidArgument(String),
    #[error("Invalid format of '{0}', expected {1}")]
    InvalidFormat(String, String),
    #[error("Path '{0}' not found")]
    NotFoundPath(String),
    #[error("Access denied to '{0}'")]
    AccessDenied(String),
    #[error("No database connection")]
    NoConnection,
    #[error("No session")]
    NoSession,
    #[error("Session is invalid: {0}")]
    SessionInvalid(String),
    #[error("Statement '{0}' is missing required clause '{1}'")]
    Incomplete(&'static str, &'static str),
    #[error("Failed to connect as '{user}': {reason}")]
    ConnectionFailure { user: String, reason: String },
    #[error("PostgreSQL error: {0}")]
    Postgresql(#[from] sqlx::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Not defined: {0}")]
    NotDefined(String),
}

impl SiteError {
    /// Код ошибки, по которому роутер выбирает страницу ошибки
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) | Self::Incomplete(..) => ErrorCode::InvalidArgument,
            Self::InvalidFormat(..) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::NotFoundPath(_) => ErrorCode::NotFoundPath,
            Self::AccessDenied(_) => ErrorCode::AccessDenied,
            Self::NoConnection => ErrorCode::NoConnection,
            Self::NoSession => ErrorCode::NoSession,
            Self::SessionInvalid(_) => ErrorCode::SessionInvalid,
            Self::ConnectionFailure { .. } => ErrorCode::PostgresqlConnectionFailure,
            Self::Postgresql(_) => ErrorCode::PostgresqlError,
            Self::NotDefined(_) => ErrorCode::NotDefined,
            Self::Io(_) | Self::Config(_) => ErrorCode::Failure,
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SiteError::NotFoundPath("u/view/x".into()).code(), ErrorCode::NotFoundPath);
        assert_eq!(SiteError::Incomplete("alter table", "name").code(), ErrorCode::InvalidArgument);
        assert_eq!(SiteError::NoConnection.code(), ErrorCode::NoConnection);
        assert_eq!(
            SiteError::ConnectionFailure { user: "u".into(), reason: "denied".into() }.code(),
            ErrorCode::PostgresqlConnectionFailure
        );
    }

    #[test]
    fn test_error_display() {
        let err = SiteError::Incomplete("alter rule", "table");
        assert_eq!(err.to_string(), "Statement 'alter rule' is missing required clause 'table'");
    }
}
