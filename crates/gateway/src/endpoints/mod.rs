//! # Gatewayエンドポイント
//!
//! 全レスポンスはJSON。CORSヘッダはルーター側の `CorsLayer` で付与する。

pub mod health;
pub mod upload_url;

pub use health::handle_health;
pub use upload_url::handle_upload_url;
