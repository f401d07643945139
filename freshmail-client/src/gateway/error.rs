//! FreshMail client error types.

/// Errors from the FreshMail gateway.
#[derive(Debug, thiserror::Error)]
pub enum FreshMailError {
    /// The API answered 401 (missing or invalid bearer token).
    #[error("request unauthorized")]
    Unauthorized,

    /// The API rejected the request with a 4xx/5xx status other than 401.
    #[error("client error{}: {message}", code_suffix(.code))]
    Client {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// The request never reached the API.
    #[error("connection error{}: {message}", code_suffix(.code))]
    Connection { code: Option<i64>, message: String },

    /// Success status, but the body is not usable JSON.
    #[error("unable to parse response from server, raw response: {raw}")]
    ServerResponse { raw: String },

    /// The default HTTP transport could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

fn code_suffix(code: &Option<i64>) -> String {
    code.map(|c| format!(" {c}")).unwrap_or_default()
}

impl FreshMailError {
    /// Vendor error code, when the API reported one.
    pub fn code(&self) -> Option<i64> {
        match self {
            FreshMailError::Client { code, .. } | FreshMailError::Connection { code, .. } => *code,
            _ => None,
        }
    }

    /// Resolved human-readable message for client and connection errors.
    pub fn message(&self) -> Option<&str> {
        match self {
            FreshMailError::Client { message, .. } | FreshMailError::Connection { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }
}

/// Result type alias for FreshMail operations.
pub type Result<T> = std::result::Result<T, FreshMailError>;
