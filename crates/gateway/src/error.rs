//! # Gateway エラー型
//!
//! 呼び出し元に返すメッセージとサーバーログに残す詳細を分離する。
//! `Internal` / `Storage` の詳細はログにのみ出力し、レスポンスには固定文言を返す。

use axum::http::StatusCode;
use axum::Json;
use upload_auth_types::ErrorResponse;

/// 内部エラー時にクライアントへ返す固定メッセージ
pub const GENERIC_ERROR_MESSAGE: &str = "Error generating upload URL";

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト（必須項目の欠落、未登録のappName）
    #[error("{0}")]
    InvalidRequest(String),
    /// 設定不備（登録済みappNameにバケットが未設定）
    #[error("{0}")]
    Configuration(String),
    /// ストレージ操作に失敗
    #[error("ストレージ操作に失敗: {0}")]
    Storage(String),
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl GatewayError {
    /// レスポンスのHTTPステータスコード
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Configuration(_)
            | GatewayError::Storage(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// クライアントに返すエラーメッセージ。
    /// Storage / Internal は原因を含めない。
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::InvalidRequest(msg) | GatewayError::Configuration(msg) => msg.clone(),
            GatewayError::Storage(_) | GatewayError::Internal(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            GatewayError::InvalidRequest(msg) => {
                tracing::debug!(reason = %msg, "リクエストを拒否");
            }
            GatewayError::Configuration(msg) => {
                tracing::error!(reason = %msg, "バケット設定の不備");
            }
            GatewayError::Storage(_) | GatewayError::Internal(_) => {
                tracing::error!(error = %self, "アップロードURLの生成に失敗");
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
