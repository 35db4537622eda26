//! # ユーザープロフィール
//!
//! プロフィール API のデータ構造と、メールアドレス形式の判定。

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// メールアドレスの形式（`local@domain.tld`、空白と `@` の重複を含まない）
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_REGEX: LazyLock<Result<Regex, regex::Error>> =
   LazyLock::new(|| Regex::new(EMAIL_PATTERN));

/// ユーザープロフィール
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
   pub id:          String,
   pub name:        String,
   pub email:       String,
   #[serde(default)]
   pub preferences: Map<String, Value>,
}

/// プロフィールの部分更新（`PUT /api/users/{id}` のボディ）
///
/// 値が `None` のフィールドは送信しない。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserProfileUpdate {
   #[serde(skip_serializing_if = "Option::is_none")]
   pub name:        Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub email:       Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub preferences: Option<Map<String, Value>>,
}

/// メールアドレスが [`EMAIL_PATTERN`] に一致するか判定する
///
/// パターンのコンパイルに失敗した場合はエラーを返す（パニックしない）。
pub fn is_valid_email(email: &str) -> Result<bool, regex::Error> {
   match &*EMAIL_REGEX {
      Ok(regex) => Ok(regex.is_match(email)),
      Err(err) => Err(err.clone()),
   }
}
