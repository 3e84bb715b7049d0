//! # Upload Authorization Gateway
//!
//! クライアントがオブジェクトストレージへ直接アップロードするための
//! 署名付きPUT URLを発行する。
//!
//! ## 役割
//! - 入力検証（fileName / fileType / appName）
//! - appNameによるバケットの振り分け
//! - アプリ・フォルダで名前空間を分けたオブジェクトキーの生成
//! - ストレージへの署名付きURL発行（有効期限300秒）
//!
//! ## API エンドポイント
//! - `POST /upload-url` — 署名付きURL発行
//! - `GET /health` — 死活監視

mod config;
mod endpoints;
mod error;
mod object_key;
mod registry;
mod storage;

use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::{GatewayConfig, GatewayState, UploadLayout};
use endpoints::{handle_health, handle_upload_url};

/// ルーターを構築する。
///
/// CORSはワイルドカード許可。プリフライトを含む全レスポンスに
/// `Access-Control-Allow-Origin: *` が付与される。
fn build_router(state: Arc<GatewayState>) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    axum::Router::new()
        .route("/upload-url", axum::routing::post(handle_upload_url))
        .route("/health", axum::routing::get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(feature = "vendor-aws")]
fn build_signer(config: &GatewayConfig) -> anyhow::Result<Box<dyn storage::UploadSigner>> {
    Ok(Box::new(storage::S3UploadSigner::from_config(&config.storage)?))
}

#[cfg(not(feature = "vendor-aws"))]
fn build_signer(_config: &GatewayConfig) -> anyhow::Result<Box<dyn storage::UploadSigner>> {
    anyhow::bail!("ストレージ実装が有効化されていません（feature \"vendor-aws\" が必要）")
}

// ---------------------------------------------------------------------------
// エントリポイント
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;

    // バケット名そのものはログに出さない（リクエスト処理時も同様）
    match &config.layout {
        UploadLayout::Single { bucket } => {
            if bucket.is_empty() {
                tracing::warn!("BUCKET_NAMEが未設定です。リクエストは設定エラーになります");
            }
            tracing::info!(layout = "single", "アップロード構成");
        }
        UploadLayout::MultiApp(registry) => {
            for app in registry.app_names() {
                if registry.resolve(app).is_some_and(str::is_empty) {
                    tracing::warn!(
                        app,
                        env = %registry::bucket_env_var(app),
                        "バケットが未設定です"
                    );
                }
            }
            tracing::info!(
                layout = "multi-app",
                apps = %registry.app_names().join(","),
                "アップロード構成"
            );
        }
    }

    let signer = build_signer(&config)?;

    let state = Arc::new(GatewayState {
        layout: config.layout,
        signer,
        public_host: config.public_host,
    });

    let app = build_router(state);

    tracing::info!("Gatewayを {} で起動します", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
