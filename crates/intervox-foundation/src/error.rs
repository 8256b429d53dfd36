use thiserror::Error;

/// Session-level error taxonomy.
///
/// Every variant maps to a human-readable banner via [`SessionError::user_message`];
/// none of them abort the process. Retry is always user-initiated.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Permission denied for {resource}")]
    PermissionDenied { resource: String },

    #[error("Speech device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Response stream failed: {0}")]
    Stream(String),

    #[error("Malformed model response: {0}")]
    Parse(String),

    #[error("Invalid session configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    /// Banner-ready text for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::PermissionDenied { resource } => format!(
                "Access to the {resource} was denied. Please grant permission in your device settings and try again."
            ),
            SessionError::DeviceUnavailable(_) => {
                "Speech services are not available on this device right now.".to_string()
            }
            SessionError::Stream(_) => {
                "We couldn't reach the interview service. Check your connection and try again.".to_string()
            }
            SessionError::Parse(_) => {
                "The interview service returned an unexpected response. Please try again.".to_string()
            }
            SessionError::InvalidConfiguration(msg) => msg.clone(),
            SessionError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Whether the error leaves the session in its current resting phase
    /// with no partial mutation, as opposed to forcing the turn to end.
    pub fn keeps_resting_phase(&self) -> bool {
        matches!(
            self,
            SessionError::PermissionDenied { .. }
                | SessionError::DeviceUnavailable(_)
                | SessionError::InvalidConfiguration(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_are_nonempty() {
        let errors = [
            SessionError::PermissionDenied {
                resource: "microphone".into(),
            },
            SessionError::DeviceUnavailable("no recognizer".into()),
            SessionError::Stream("timeout".into()),
            SessionError::Parse("missing marker".into()),
            SessionError::InvalidConfiguration("job title is empty".into()),
            SessionError::Internal("invalid transition".into()),
        ];
        for e in errors {
            assert!(!e.user_message().is_empty());
        }
    }

    #[test]
    fn permission_errors_keep_resting_phase() {
        assert!(SessionError::PermissionDenied {
            resource: "microphone".into()
        }
        .keeps_resting_phase());
        assert!(!SessionError::Stream("boom".into()).keeps_resting_phase());
    }
}
