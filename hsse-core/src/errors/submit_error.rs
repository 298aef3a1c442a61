/// Errors from the remote write endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The connection could not be established; the request never left.
    #[error("remote unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("rejected by remote (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("payload could not be encoded: {reason}")]
    Encoding { reason: String },
}

impl SubmitError {
    /// Whether the same request may be sent again without risking a
    /// duplicate. Only true when it provably never reached the remote: a
    /// timeout, 5xx, or dropped connection may follow a committed write.
    pub fn is_safe_to_resend(&self) -> bool {
        matches!(self, SubmitError::Unreachable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unreachable_is_safe_to_resend() {
        assert!(SubmitError::Unreachable {
            reason: "connection refused".into()
        }
        .is_safe_to_resend());

        for e in [
            SubmitError::Rejected {
                status: 422,
                body: "missing project_id".into(),
            },
            SubmitError::Rejected {
                status: 503,
                body: String::new(),
            },
            SubmitError::Timeout,
            SubmitError::Network {
                reason: "connection reset".into(),
            },
        ] {
            assert!(!e.is_safe_to_resend(), "{e}");
        }
    }
}
