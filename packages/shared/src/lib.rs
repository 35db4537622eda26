//! # Tollgate 共有ユーティリティ
//!
//! 各ドメインのクライアントモジュールから共通で使う、エラー分類・エラーログ・
//! 成否エンベロープ・トレーシング初期化を提供する。
//!
//! ## 設計方針
//!
//! - ドメインごとに重複しがちなエラー型・分類関数・ロガーを、
//!   コード `enum` をパラメータに取る 1 つのジェネリックな部品に集約する
//! - HTTP やドメインモデルには依存しない

mod macros;

pub mod error;
pub mod error_log;
pub mod observability;
pub mod outcome;

pub use error::{BoxError, Cause, ClassifyExt, DomainError, ErrorCode, Failure};
pub use error_log::LogEntry;
pub use outcome::Outcome;
