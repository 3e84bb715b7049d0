//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! 設定は起動時に一度だけ読み込み、以後は変更しない。

use std::str::FromStr;

use crate::registry::BucketRegistry;
use crate::storage::UploadSigner;

/// 署名付きURLの有効期限（秒）
pub const PRESIGN_EXPIRY_SECS: u32 = 300;

/// `fileURL` の組み立てに使うストレージホストの既定値
pub const DEFAULT_PUBLIC_HOST: &str = "s3.amazonaws.com";

/// マルチアプリ構成の既定アプリ名
pub const DEFAULT_APP_NAMES: &str = "question,exam,books";

/// バケット解決とキー構成の方式。
#[derive(Debug, Clone)]
pub enum UploadLayout {
    /// 単一バケット。キーは `uploads/<millis>-<fileName>`
    Single { bucket: String },
    /// appNameでバケットを振り分ける。キーは `<appName>/...`
    MultiApp(BucketRegistry),
}

/// `UPLOAD_LAYOUT` の値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Single,
    MultiApp,
}

impl FromStr for LayoutKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single" => Ok(LayoutKind::Single),
            "multi-app" => Ok(LayoutKind::MultiApp),
            other => Err(anyhow::anyhow!(
                "UPLOAD_LAYOUTは \"single\" または \"multi-app\" である必要があります: {other}"
            )),
        }
    }
}

/// S3互換ストレージの接続設定
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub region: String,
    /// カスタムエンドポイント（MinIO, R2等）
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

/// 起動時に読み込むGateway設定
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: String,
    pub layout: UploadLayout,
    pub public_host: String,
    pub storage: StorageConfig,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の変数ソースから構築する。空文字の変数は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = var("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let kind = var("UPLOAD_LAYOUT")
            .map(|v| v.parse::<LayoutKind>())
            .transpose()?
            .unwrap_or(LayoutKind::MultiApp);

        let layout = match kind {
            LayoutKind::Single => UploadLayout::Single {
                bucket: var("BUCKET_NAME").unwrap_or_default(),
            },
            LayoutKind::MultiApp => {
                let app_names: Vec<String> = var("APP_NAMES")
                    .unwrap_or_else(|| DEFAULT_APP_NAMES.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if app_names.is_empty() {
                    anyhow::bail!("APP_NAMESにアプリ名が1つも指定されていません");
                }
                UploadLayout::MultiApp(BucketRegistry::from_lookup(&app_names, &lookup))
            }
        };

        Ok(Self {
            listen_addr,
            layout,
            public_host: var("STORAGE_PUBLIC_HOST")
                .unwrap_or_else(|| DEFAULT_PUBLIC_HOST.to_string()),
            storage: StorageConfig {
                region: var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                endpoint: var("S3_ENDPOINT"),
                access_key: var("S3_ACCESS_KEY"),
                secret_key: var("S3_SECRET_KEY"),
            },
        })
    }
}

/// Gatewayの共有状態。
/// リクエスト間で共有されるのは読み取り専用の設定と署名実装のみ。
pub struct GatewayState {
    /// バケット解決とキー構成の方式
    pub layout: UploadLayout,
    /// 署名付きURL発行（S3互換等、トレイトで抽象化）
    pub signer: Box<dyn UploadSigner>,
    /// `fileURL` に使うストレージホスト（例: "s3.amazonaws.com"）
    pub public_host: String,
}
