use thiserror::Error;

/// Failure of a remote call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("invalid response: {0}")]
    Decode(String),
}

/// Coarse classification used to pick user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    TooLarge,
    Server,
}

impl ApiError {
    pub fn status(status: u16) -> Self {
        ApiError::Status {
            status,
            message: None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.status_code() {
            None => ErrorKind::Transport,
            Some(400) => ErrorKind::BadRequest,
            Some(401) => ErrorKind::Unauthorized,
            Some(403) => ErrorKind::Forbidden,
            Some(404) => ErrorKind::NotFound,
            Some(413) => ErrorKind::TooLarge,
            Some(_) => ErrorKind::Server,
        }
    }

    /// Message the server attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_kinds() {
        assert_eq!(ApiError::status(400).kind(), ErrorKind::BadRequest);
        assert_eq!(ApiError::status(401).kind(), ErrorKind::Unauthorized);
        assert_eq!(ApiError::status(403).kind(), ErrorKind::Forbidden);
        assert_eq!(ApiError::status(404).kind(), ErrorKind::NotFound);
        assert_eq!(ApiError::status(413).kind(), ErrorKind::TooLarge);
        assert_eq!(ApiError::status(502).kind(), ErrorKind::Server);
        assert_eq!(
            ApiError::Network("offline".into()).kind(),
            ErrorKind::Transport
        );
    }

    #[test]
    fn blank_server_message_is_ignored() {
        let err = ApiError::Status {
            status: 400,
            message: Some("  ".into()),
        };
        assert_eq!(err.server_message(), None);
    }
}
