//! # 認証ユーザー
//!
//! ログイン API が返すユーザーと、パスワードポリシー。

use serde::{Deserialize, Serialize};

/// パスワードの最小文字数
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// 認証済みユーザー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
   pub id:            String,
   pub email:         String,
   pub password_hash: String,
}

/// パスワードがポリシーを満たすか判定する
///
/// 文字数（バイト数ではない）が [`MIN_PASSWORD_LENGTH`] 以上であること。
pub fn validate_password(password: &str) -> bool {
   password.chars().count() >= MIN_PASSWORD_LENGTH
}
