//! # Upload Signer
//!
//! 署名付きPUT URLを発行するオブジェクトストレージの抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュールを参照。

#[cfg(feature = "vendor-aws")]
pub mod s3;

#[cfg(feature = "vendor-aws")]
pub use self::s3::S3UploadSigner;

use crate::error::GatewayError;

/// 署名付きPUT URL発行の抽象インターフェース。
///
/// 署名アルゴリズム自体はストレージプロバイダ側の責務で、Gatewayは
/// バケット・キー・Content-Type・有効期限を渡すだけ。
#[async_trait::async_trait]
pub trait UploadSigner: Send + Sync {
    /// `bucket/key` への1回のPUTを許可する署名付きURLを生成する。
    ///
    /// - `content_type`: 署名対象に含めるContent-Type（アップロード時に一致が必要）
    /// - `expiry_secs`: 発行時刻からの有効期限（秒）
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        expiry_secs: u32,
    ) -> Result<String, GatewayError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::UploadSigner;
    use crate::error::GatewayError;

    /// モックに渡された引数
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PresignCall {
        pub bucket: String,
        pub key: String,
        pub content_type: String,
        pub expiry_secs: u32,
    }

    /// テスト用のモックUploadSigner。
    /// S3への接続なしで署名付きURLのダミーを返し、呼び出しを記録する。
    #[derive(Default)]
    pub struct MockUploadSigner {
        pub calls: Mutex<Vec<PresignCall>>,
    }

    impl MockUploadSigner {
        pub fn calls(&self) -> Vec<PresignCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl UploadSigner for MockUploadSigner {
        async fn presign_put(
            &self,
            bucket: &str,
            key: &str,
            content_type: &str,
            expiry_secs: u32,
        ) -> Result<String, GatewayError> {
            self.calls.lock().unwrap().push(PresignCall {
                bucket: bucket.to_string(),
                key: key.to_string(),
                content_type: content_type.to_string(),
                expiry_secs,
            });
            Ok(format!(
                "http://mock-storage/{bucket}/{key}?X-Amz-Expires={expiry_secs}&sig=test"
            ))
        }
    }

    /// 常に失敗するUploadSigner（ストレージ障害の再現用）
    pub struct FailingUploadSigner;

    #[async_trait::async_trait]
    impl UploadSigner for FailingUploadSigner {
        async fn presign_put(
            &self,
            bucket: &str,
            _key: &str,
            _content_type: &str,
            _expiry_secs: u32,
        ) -> Result<String, GatewayError> {
            Err(GatewayError::Storage(format!(
                "AccessDenied: credentials rejected for {bucket}"
            )))
        }
    }
}
