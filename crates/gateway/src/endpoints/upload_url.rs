//! # POST /upload-url
//!
//! ストレージへの署名付きPUT URL発行。
//!
//! 入力検証 → バケット解決 → オブジェクトキー生成 → 署名付きURL発行 の順に処理する。
//! 検証は上から順に評価し、最初に失敗した項目のエラーを返す。

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use upload_auth_types::{UploadUrlRequest, UploadUrlResponse};

use crate::config::{GatewayState, UploadLayout, PRESIGN_EXPIRY_SECS};
use crate::error::GatewayError;
use crate::object_key;

/// POST /upload-url — 署名付きURL発行。
///
/// ボディは生バイト列として受け取る。空ボディは `{}` とみなし（必須項目欠落で400）、
/// UTF-8やJSONとして解釈できないボディは内部エラー（500）とする。
pub async fn handle_upload_url(
    State(state): State<Arc<GatewayState>>,
    body: Bytes,
) -> Result<Json<UploadUrlResponse>, GatewayError> {
    let request = parse_request(&body)?;

    let unix_millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| GatewayError::Internal(format!("時刻取得失敗: {e}")))?
        .as_millis();

    let response = authorize_upload(&state, &request, unix_millis).await?;
    Ok(Json(response))
}

/// リクエストボディをパースする。
fn parse_request(body: &[u8]) -> Result<UploadUrlRequest, GatewayError> {
    if body.is_empty() {
        return Ok(UploadUrlRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::Internal(format!("リクエストボディのパースに失敗: {e}")))
}

/// アップロード先（バケット・キー）の解決結果
#[derive(Debug, PartialEq, Eq)]
struct UploadTarget<'a> {
    bucket: &'a str,
    key: String,
    file_type: &'a str,
    app_name: Option<&'a str>,
}

/// 空文字を未指定と同一視する
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// 入力検証とバケット・キーの解決。
fn resolve_target<'a>(
    layout: &'a UploadLayout,
    request: &'a UploadUrlRequest,
    unix_millis: u128,
) -> Result<UploadTarget<'a>, GatewayError> {
    let file_name = non_empty(&request.file_name);
    let file_type = non_empty(&request.file_type);

    match layout {
        UploadLayout::Single { bucket } => {
            let (Some(file_name), Some(file_type)) = (file_name, file_type) else {
                return Err(GatewayError::InvalidRequest(
                    "fileName and fileType are required".to_string(),
                ));
            };
            if bucket.is_empty() {
                return Err(GatewayError::Configuration(
                    "Bucket not configured".to_string(),
                ));
            }
            Ok(UploadTarget {
                bucket,
                key: object_key::single_bucket_key(unix_millis, file_name),
                file_type,
                app_name: None,
            })
        }
        UploadLayout::MultiApp(registry) => {
            let app_name = non_empty(&request.app_name);
            let (Some(file_name), Some(file_type), Some(app_name)) =
                (file_name, file_type, app_name)
            else {
                return Err(GatewayError::InvalidRequest(
                    "fileName, fileType, and appName are required".to_string(),
                ));
            };

            let bucket = registry.resolve(app_name).ok_or_else(|| {
                GatewayError::InvalidRequest(format!(
                    "Invalid appName: {app_name}. Allowed values: {}",
                    registry.app_names().join(", ")
                ))
            })?;
            if bucket.is_empty() {
                return Err(GatewayError::Configuration(format!(
                    "Bucket not configured for appName: {app_name}"
                )));
            }

            Ok(UploadTarget {
                bucket,
                key: object_key::app_scoped_key(
                    unix_millis,
                    app_name,
                    non_empty(&request.folder),
                    file_name,
                ),
                file_type,
                app_name: Some(app_name),
            })
        }
    }
}

/// 検証済みリクエストに対して署名付きURLを発行し、レスポンスを組み立てる。
pub(crate) async fn authorize_upload(
    state: &GatewayState,
    request: &UploadUrlRequest,
    unix_millis: u128,
) -> Result<UploadUrlResponse, GatewayError> {
    let target = resolve_target(&state.layout, request, unix_millis)?;

    let upload_url = state
        .signer
        .presign_put(target.bucket, &target.key, target.file_type, PRESIGN_EXPIRY_SECS)
        .await?;

    // バケット名はログに出さない
    tracing::info!(
        key = %target.key,
        app = target.app_name.unwrap_or("-"),
        "署名付きアップロードURLを発行"
    );

    let file_url = format!(
        "https://{}.{}/{}",
        target.bucket, state.public_host, target.key
    );

    Ok(UploadUrlResponse {
        upload_url,
        file_key: target.key,
        bucket_name: target.bucket.to_string(),
        file_url,
        app_name: target.app_name.map(str::to_string),
    })
}
