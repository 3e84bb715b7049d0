//! # S3互換 Upload Signer 実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用する署名付きURL発行。

use http02::{header::CONTENT_TYPE, HeaderMap, HeaderValue};

use super::UploadSigner;
use crate::config::StorageConfig;
use crate::error::GatewayError;

/// S3互換ストレージによるUploadSigner実装。
///
/// リージョンと認証情報は起動時に固定し、バケットはリクエストごとに切り替える
/// （アプリごとに異なるバケットへ振り分けるため）。
pub struct S3UploadSigner {
    region: s3::Region,
    credentials: s3::creds::Credentials,
    /// カスタムエンドポイント（MinIO等）ではパス形式のURLを使う
    path_style: bool,
}

impl S3UploadSigner {
    pub fn new(region: s3::Region, credentials: s3::creds::Credentials, path_style: bool) -> Self {
        Self {
            region,
            credentials,
            path_style,
        }
    }

    /// ストレージ設定から構築する。
    ///
    /// - `endpoint` 指定時は `Region::Custom` + パス形式
    /// - アクセスキー未指定時は `AWS_ACCESS_KEY_ID` 等の環境変数から認証情報を取得
    pub fn from_config(config: &StorageConfig) -> anyhow::Result<Self> {
        let (region, path_style) = match &config.endpoint {
            Some(endpoint) => {
                tracing::info!(s3_endpoint = %endpoint, "カスタムS3エンドポイントを使用");
                (
                    s3::Region::Custom {
                        region: config.region.clone(),
                        endpoint: endpoint.clone(),
                    },
                    true,
                )
            }
            None => {
                let region = config
                    .region
                    .parse::<s3::Region>()
                    .map_err(|e| anyhow::anyhow!("不正なリージョン {}: {e}", config.region))?;
                (region, false)
            }
        };

        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => s3::creds::Credentials::new(
                Some(access_key),
                Some(secret_key),
                None,
                None,
                None,
            )?,
            _ => s3::creds::Credentials::from_env()?,
        };

        Ok(Self::new(region, credentials, path_style))
    }

    fn open_bucket(&self, bucket_name: &str) -> Result<Box<s3::Bucket>, GatewayError> {
        let bucket = s3::Bucket::new(bucket_name, self.region.clone(), self.credentials.clone())
            .map_err(|e| GatewayError::Storage(format!("バケット初期化失敗: {e}")))?;
        if self.path_style {
            Ok(bucket.with_path_style())
        } else {
            Ok(bucket)
        }
    }
}

#[async_trait::async_trait]
impl UploadSigner for S3UploadSigner {
    /// Content-Typeを署名対象ヘッダに含めた署名付きPUT URLを生成する。
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        expiry_secs: u32,
    ) -> Result<String, GatewayError> {
        let bucket = self.open_bucket(bucket)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(content_type)
                .map_err(|e| GatewayError::Internal(format!("不正なContent-Type: {e}")))?,
        );

        bucket
            .presign_put(key, expiry_secs, Some(headers), None)
            .await
            .map_err(|e| GatewayError::Storage(format!("署名付きアップロードURL生成失敗: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signer(path_style: bool) -> S3UploadSigner {
        let region = if path_style {
            s3::Region::Custom {
                region: "us-east-1".to_string(),
                endpoint: "http://localhost:9000".to_string(),
            }
        } else {
            s3::Region::UsEast1
        };
        let credentials =
            s3::creds::Credentials::new(Some("AKIDEXAMPLE"), Some("secret"), None, None, None)
                .unwrap();
        S3UploadSigner::new(region, credentials, path_style)
    }

    /// 署名はローカル計算のみで、ネットワーク接続なしにURLが得られる
    #[tokio::test]
    async fn test_presign_put_builds_signed_url() {
        let signer = test_signer(false);
        let url = signer
            .presign_put("exam-bucket", "exam/uploads/1-report.pdf", "application/pdf", 300)
            .await
            .unwrap();

        assert!(url.contains("exam-bucket"));
        assert!(url.contains("exam/uploads/1-report.pdf"));
        assert!(url.contains("X-Amz-Expires=300"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn test_presign_put_path_style_endpoint() {
        let signer = test_signer(true);
        let url = signer
            .presign_put("uploads-bucket", "uploads/1-a.txt", "text/plain", 300)
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:9000/uploads-bucket/"));
    }

    #[tokio::test]
    async fn test_invalid_content_type_rejected() {
        let signer = test_signer(false);
        let result = signer
            .presign_put("b", "k", "text/plain\nx-injected: 1", 300)
            .await;
        assert!(matches!(result, Err(GatewayError::Internal(_))));
    }
}
