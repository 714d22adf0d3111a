use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::TxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorCode {
    // HTTP 基础错误码
    BadRequest,
    NotFound,
    Internal,

    // 业务错误码
    InvalidMnemonic,
    IndexOutOfRange,
    KeyNotFound,
    AccountNotFound,
    SigningFailed,
    EncodingUnavailable,
    ClassificationFailed,
    RpcError,
}

impl AppErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppErrorCode::BadRequest => "bad_request",
            AppErrorCode::NotFound => "not_found",
            AppErrorCode::Internal => "internal",
            AppErrorCode::InvalidMnemonic => "invalid_mnemonic",
            AppErrorCode::IndexOutOfRange => "index_out_of_range",
            AppErrorCode::KeyNotFound => "key_not_found",
            AppErrorCode::AccountNotFound => "account_not_found",
            AppErrorCode::SigningFailed => "signing_failed",
            AppErrorCode::EncodingUnavailable => "encoding_unavailable",
            AppErrorCode::ClassificationFailed => "classification_failed",
            AppErrorCode::RpcError => "rpc_error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub code: AppErrorCode,
    pub message: String,
    pub status: StatusCode,
    pub trace_id: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<&'a str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code.as_str(),
            message: &self.message,
            trace_id: self.trace_id.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    fn new(code: AppErrorCode, status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            status,
            trace_id: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::BadRequest, StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::NotFound, StatusCode::NOT_FOUND, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::Internal, StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn rpc_error(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::RpcError, StatusCode::BAD_GATEWAY, msg)
    }

    /// 设置追踪ID
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

impl From<TxError> for AppError {
    fn from(err: TxError) -> Self {
        let message = err.to_string();
        match err {
            TxError::InvalidMnemonic(_) => Self::new(
                AppErrorCode::InvalidMnemonic,
                StatusCode::BAD_REQUEST,
                message,
            ),
            TxError::IndexOutOfRange(_) => Self::new(
                AppErrorCode::IndexOutOfRange,
                StatusCode::BAD_REQUEST,
                message,
            ),
            TxError::InvalidInput(_) => Self::bad_request(message),
            TxError::KeyNotFound(_) => {
                Self::new(AppErrorCode::KeyNotFound, StatusCode::NOT_FOUND, message)
            }
            TxError::NotFound(_) => Self::not_found(message),
            TxError::AccountNotFound(_) => Self::new(
                AppErrorCode::AccountNotFound,
                StatusCode::NOT_FOUND,
                message,
            ),
            TxError::Signing(_) => Self::new(
                AppErrorCode::SigningFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
                message,
            ),
            TxError::KeyStore(_) => Self::internal(message),
            TxError::EncodingUnavailable(_) => Self::new(
                AppErrorCode::EncodingUnavailable,
                StatusCode::BAD_GATEWAY,
                message,
            ),
            TxError::Classification { .. } => Self::new(
                AppErrorCode::ClassificationFailed,
                StatusCode::BAD_GATEWAY,
                message,
            ),
            TxError::Transport(_) | TxError::InvalidResponse(_) => Self::rpc_error(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tx_error_status_mapping() {
        let cases = [
            (TxError::InvalidMnemonic("x".into()), StatusCode::BAD_REQUEST),
            (TxError::IndexOutOfRange(1 << 31), StatusCode::BAD_REQUEST),
            (TxError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (TxError::KeyNotFound("hot".into()), StatusCode::NOT_FOUND),
            (TxError::AccountNotFound("mdse1".into()), StatusCode::NOT_FOUND),
            (TxError::Signing("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (TxError::EncodingUnavailable("x".into()), StatusCode::BAD_GATEWAY),
            (TxError::Transport("x".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn test_classification_error_keeps_raw_response() {
        let err = AppError::from(TxError::Classification {
            raw: json!({"error": "timed out"}),
        });
        assert_eq!(err.code, AppErrorCode::ClassificationFailed);
        assert!(err.message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::not_found("missing").with_trace_id("t-1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["message"], "missing");
        assert_eq!(body["trace_id"], "t-1");
    }
}
