use serde::Deserialize;

/// Shown to users for every failure that is not a server-side validation error
pub const COMMUNICATION_FAILURE_MESSAGE: &str =
    "Failed to communicate with the server. Please try again later.";

/// Normalized failure of a backend call
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("server responded with status {status}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("entity has no identifier to address")]
    MissingId,

    #[error("invalid base url '{0}'")]
    InvalidBaseUrl(String),
}

/// Body sent by the backend alongside a 422 response
#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    errors: Vec<String>,
}

impl TransportError {
    /// HTTP status of the failed call, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response payload of a non-success status
    pub fn body(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.status() == Some(422)
    }

    /// Messages to show next to the form.
    ///
    /// A 422 carries the backend's own `errors` list; anything else, including a
    /// 422 whose body cannot be read or lists nothing, collapses into
    /// [`COMMUNICATION_FAILURE_MESSAGE`].
    pub fn server_messages(&self) -> Vec<String> {
        if self.is_validation() {
            let parsed = self
                .body()
                .and_then(|body| serde_json::from_str::<ServerErrorBody>(body).ok());
            if let Some(parsed) = parsed {
                if !parsed.errors.is_empty() {
                    return parsed.errors;
                }
            }
        }
        vec![COMMUNICATION_FAILURE_MESSAGE.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16, body: &str) -> TransportError {
        TransportError::Status {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_validation_error_exposes_server_messages() {
        let error = status_error(422, r#"{"errors":["name already exists"]}"#);

        assert!(error.is_validation());
        assert_eq!(error.server_messages(), vec!["name already exists".to_string()]);
    }

    #[test]
    fn test_unreadable_validation_body_falls_back_to_generic_message() {
        let error = status_error(422, "<html>oops</html>");
        assert_eq!(
            error.server_messages(),
            vec![COMMUNICATION_FAILURE_MESSAGE.to_string()]
        );

        let empty = status_error(422, r#"{"errors":[]}"#);
        assert_eq!(
            empty.server_messages(),
            vec![COMMUNICATION_FAILURE_MESSAGE.to_string()]
        );
    }

    #[test]
    fn test_other_statuses_use_generic_message() {
        let error = status_error(500, r#"{"errors":["boom"]}"#);

        assert_eq!(error.status(), Some(500));
        assert_eq!(error.body(), Some(r#"{"errors":["boom"]}"#));
        assert_eq!(
            error.server_messages(),
            vec![COMMUNICATION_FAILURE_MESSAGE.to_string()]
        );
    }

    #[test]
    fn test_missing_id_has_no_status() {
        let error = TransportError::MissingId;
        assert_eq!(error.status(), None);
        assert_eq!(error.body(), None);
        assert!(!error.is_validation());
    }
}
