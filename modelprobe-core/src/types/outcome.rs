/// Transport-level failure classes. Anything that did not produce an HTTP
/// status line ends up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportFailureKind {
    Timeout,
    Connect,
    Tls,
    /// The peer answered but the exchange was not valid HTTP.
    Protocol,
    Other,
}

impl TransportFailureKind {
    /// Stable code used in result statuses (`exception/<code>`).
    pub fn code(&self) -> &'static str {
        match self {
            TransportFailureKind::Timeout => "timeout",
            TransportFailureKind::Connect => "connection_error",
            TransportFailureKind::Tls => "ssl_error",
            TransportFailureKind::Protocol => "protocol_error",
            TransportFailureKind::Other => "unknown",
        }
    }
}

/// Result of a single network call, as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success { status: u16, body: String },
    ProtocolError { status: u16, body: String },
    TransportError { kind: TransportFailureKind, message: String },
}

impl AttemptOutcome {
    pub fn from_response(status: u16, body: String) -> Self {
        if (200..300).contains(&status) {
            AttemptOutcome::Success { status, body }
        } else {
            AttemptOutcome::ProtocolError { status, body }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success { .. })
    }
}
