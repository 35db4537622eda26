//! # 汎用ユーティリティ
//!
//! 待機、JSON パース、リトライ、通貨フォーマット。
//! 失敗はすべて [`UtilityError`] に分類してログ出力する。

pub mod currency;
pub mod retry;

use std::time::Duration;

use serde::de::DeserializeOwned;
use tollgate_shared::{ClassifyExt, DomainError, define_error_code};

pub use self::{
   currency::format_currency,
   retry::{DEFAULT_BASE_DELAY, RetryPolicy, retry, retry_with_policy},
};

define_error_code! {
   /// ユーティリティのエラーコード
   pub enum UtilityErrorCode("utils", "UtilityError") {
      /// 待機時間が負
      InvalidDelayMs => "INVALID_DELAY_MS",
      /// JSON をパースできない
      JsonParseError => "JSON_PARSE_ERROR",
      /// リトライ対象の処理が失敗した
      RetryFailed => "RETRY_FAILED",
      /// 試行回数が正の整数でない
      RetryInvalidAttempts => "RETRY_INVALID_ATTEMPTS",
      /// 通貨をフォーマットできない
      FormatCurrencyError => "FORMAT_CURRENCY_ERROR",
   }
}

/// ユーティリティエラー
pub type UtilityError = DomainError<UtilityErrorCode>;

/// 指定ミリ秒だけ待機する
///
/// 負の値は `INVALID_DELAY_MS` で失敗する。キャンセルには対応しない。
pub async fn delay(ms: i64) -> Result<(), UtilityError> {
   let Ok(ms) = u64::try_from(ms) else {
      let err = UtilityError::new(
         UtilityErrorCode::InvalidDelayMs,
         "Delay duration must be a non-negative number",
      );
      err.log();
      return Err(err);
   };

   tokio::time::sleep(Duration::from_millis(ms)).await;
   Ok(())
}

/// JSON 文字列を `T` にパースする
pub fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T, UtilityError> {
   serde_json::from_str(json)
      .classify_and_log(UtilityErrorCode::JsonParseError, "Failed to parse JSON")
}
