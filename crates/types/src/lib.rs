//! # Upload Authorization 共有型定義
//!
//! `/upload-url` のリクエスト・レスポンスをRust構造体として提供する。
//!
//! ## フィールド命名
//! - JSON上のフィールド名はクライアント（ブラウザ）の慣習に合わせてcamelCase
//! - URL系フィールドは `uploadURL` / `fileURL` のように末尾を大文字で表記

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /upload-url
// ---------------------------------------------------------------------------

/// /upload-url リクエスト。
///
/// 必須項目の有無はGateway側のバリデーションで判定するため、
/// パース段階では全フィールドを任意とする。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadUrlRequest {
    /// アップロードするファイル名
    #[serde(rename = "fileName", default)]
    pub file_name: Option<String>,
    /// コンテンツのMIMEタイプ
    #[serde(rename = "fileType", default)]
    pub file_type: Option<String>,
    /// アップロード元アプリケーション名（マルチアプリ構成で必須）
    #[serde(rename = "appName", default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    /// アプリ名前空間配下のサブパス（例: "2024/midterm"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

/// /upload-url レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadUrlResponse {
    /// 署名付きアップロードURL（PUT）
    #[serde(rename = "uploadURL")]
    pub upload_url: String,
    /// バケット内のオブジェクトキー
    #[serde(rename = "fileKey")]
    pub file_key: String,
    /// アップロード先バケット名
    #[serde(rename = "bucketName")]
    pub bucket_name: String,
    /// アップロード後の公開形式URL（それ自体は認証情報を含まない）
    #[serde(rename = "fileURL")]
    pub file_url: String,
    /// リクエストされたアプリ名（マルチアプリ構成のみ）
    #[serde(rename = "appName", default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
}

/// エラーレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
