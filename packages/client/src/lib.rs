//! # Tollgate クライアント
//!
//! バックエンド HTTP API を呼び出すクライアント群。
//!
//! ## モジュール構成
//!
//! - [`auth`]: ログイン、トークン更新
//! - [`payments`]: 決済、返金
//! - [`user`]: プロフィールの取得・更新、メールアドレス検証
//! - [`api`]: 汎用リクエストとミドルウェア、ドメインクライアントを包むハンドラ
//! - [`utils`]: 待機、JSON パース、リトライ、通貨フォーマット
//!
//! 各操作は失敗を呼び出し境界で一度だけ分類してログ出力し、
//! ドメインごとの型付きエラー（`AuthError` など）として返す。

pub mod api;
pub mod auth;
mod client_impl;
pub mod config;
pub mod payments;
mod response;
pub mod user;
pub mod utils;

pub use api::{ApiError, ApiErrorCode, ApiRequest, ApiResponse, HttpMethod};
pub use auth::{AuthClient, AuthError, AuthErrorCode};
pub use client_impl::{BackendClient, TollgateClient};
pub use config::{ClientConfig, ConfigError};
pub use payments::{PaymentClient, PaymentError, PaymentErrorCode};
pub use user::{UserClient, UserError, UserErrorCode, validate_email};
pub use utils::{RetryPolicy, UtilityError, UtilityErrorCode};
