use serde_json::Value;

/// Wire-visible error codes for failures produced by the dispatch
/// pipeline itself (handlers define their own typed errors on top).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Path-addressed request whose URL does not match the configured root.
    InvalidPath,
    /// Addressing-mode mismatch or unresolved RPC path.
    ReqCantBeResolved,
    /// No registration entry for the resolved path.
    PtlNotFound,
    /// Request body failed schema validation.
    InvalidReqParam,
    /// Handler raised an untyped error.
    UnhandledApiError,
}

impl ErrorCode {
    /// Machine-readable code string carried in the error envelope's info.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPath => "INVALID_PATH",
            ErrorCode::ReqCantBeResolved => "REQ_CANT_BE_RESOLVED",
            ErrorCode::PtlNotFound => "PTL_NOT_FOUND",
            ErrorCode::InvalidReqParam => "INVALID_REQ_PARAM",
            ErrorCode::UnhandledApiError => "UNHANDLED_API_ERROR",
        }
    }

    /// Client-visible message used when no more specific one applies.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPath => "invalid request path",
            ErrorCode::ReqCantBeResolved => "request cannot be resolved",
            ErrorCode::PtlNotFound => "service not found",
            ErrorCode::InvalidReqParam => "invalid request parameters",
            ErrorCode::UnhandledApiError => "internal server error",
        }
    }
}

/// A typed error raised intentionally by a handler.
///
/// Typed errors are a trusted contract between handler and client:
/// message and info are forwarded verbatim in the error envelope.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub info: Value,
}

impl ApiError {
    pub fn new(message: impl Into<String>, info: Value) -> Self {
        Self {
            message: message.into(),
            info,
        }
    }
}

/// How a handler can fail.
#[derive(Debug)]
pub enum HandlerError {
    /// Expected condition meant for the client, passed through verbatim.
    Api(ApiError),
    /// Anything else. Logged with full detail server-side, reduced to a
    /// generic `UNHANDLED_API_ERROR` envelope for the client.
    Internal(anyhow::Error),
}

impl From<ApiError> for HandlerError {
    fn from(e: ApiError) -> Self {
        HandlerError::Api(e)
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(e: anyhow::Error) -> Self {
        HandlerError::Internal(e)
    }
}
