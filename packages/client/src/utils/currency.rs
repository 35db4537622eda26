//! 通貨フォーマット（en-US 表記）
//!
//! 主要な ISO 4217 コードは記号で、それ以外はコードと NBSP を前置する。
//! 整数部は 3 桁ごとに `,` で区切り、小数部の桁数は通貨ごとに決まる。

use std::iter;

use tollgate_shared::ClassifyExt;

use super::{UtilityError, UtilityErrorCode};

/// 通貨ごとの表示記号と小数桁数
fn currency_format(code: &str) -> (String, usize) {
   match code {
      "USD" => ("$".to_string(), 2),
      "EUR" => ("€".to_string(), 2),
      "GBP" => ("£".to_string(), 2),
      "JPY" => ("¥".to_string(), 0),
      "CAD" => ("CA$".to_string(), 2),
      "AUD" => ("A$".to_string(), 2),
      "CNY" => ("CN¥".to_string(), 2),
      "INR" => ("₹".to_string(), 2),
      "KRW" => ("₩".to_string(), 0),
      other => (format!("{other}\u{a0}"), 2),
   }
}

/// 金額を通貨表記の文字列にする
///
/// ```
/// use tollgate_client::utils::format_currency;
///
/// assert_eq!(format_currency(1234.5, "USD").unwrap(), "$1,234.50");
/// assert_eq!(format_currency(-1234.0, "JPY").unwrap(), "-¥1,234");
/// ```
///
/// # エラー
///
/// 通貨コードが英字 3 文字でない、または金額が有限値でない場合は
/// `FORMAT_CURRENCY_ERROR`。
pub fn format_currency(amount: f64, currency: &str) -> Result<String, UtilityError> {
   format_amount(amount, currency)
      .classify_and_log(UtilityErrorCode::FormatCurrencyError, "Failed to format currency")
}

fn format_amount(amount: f64, currency: &str) -> Result<String, UtilityError> {
   if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_alphabetic()) {
      return Err(UtilityError::new(
         UtilityErrorCode::FormatCurrencyError,
         format!("Invalid currency code: {currency}"),
      ));
   }
   if !amount.is_finite() {
      return Err(UtilityError::new(
         UtilityErrorCode::FormatCurrencyError,
         "Amount must be a finite number",
      ));
   }

   let code = currency.to_ascii_uppercase();
   let (symbol, digits) = currency_format(&code);

   let (integer, fraction) = round_half_away(amount.abs(), digits);

   let sign = if amount < 0.0 { "-" } else { "" };
   let mut formatted = format!("{sign}{symbol}{}", group_thousands(&integer));
   if let Some(fraction) = fraction {
      formatted.push('.');
      formatted.push_str(&fraction);
   }
   Ok(formatted)
}

/// 非負の金額を小数 `digits` 桁に丸め、整数部と小数部の数字列に分ける
///
/// 最短表現の 10 進文字列に対して丸めるため、端数がちょうど半分なら
/// 0 から遠い方へ丸まる（`0.125` は `0.13`）。
fn round_half_away(amount: f64, digits: usize) -> (String, Option<String>) {
   let repr = amount.to_string();
   let (integer, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

   let mut kept: Vec<u8> = integer
      .bytes()
      .chain(fraction.bytes().chain(iter::repeat(b'0')).take(digits))
      .collect();
   if fraction.as_bytes().get(digits).is_some_and(|&next| next >= b'5') {
      carry_up(&mut kept);
   }

   let split = kept.len() - digits;
   let integer = String::from_utf8_lossy(&kept[..split]).into_owned();
   let fraction = (digits > 0).then(|| String::from_utf8_lossy(&kept[split..]).into_owned());
   (integer, fraction)
}

/// ASCII 数字列を末尾から 1 繰り上げる
fn carry_up(digits: &mut Vec<u8>) {
   for digit in digits.iter_mut().rev() {
      if *digit == b'9' {
         *digit = b'0';
      } else {
         *digit += 1;
         return;
      }
   }
   digits.insert(0, b'1');
}

/// 整数部の数字列を 3 桁ごとに `,` で区切る
fn group_thousands(digits: &str) -> String {
   let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
   for (i, ch) in digits.chars().enumerate() {
      if i > 0 && (digits.len() - i) % 3 == 0 {
         grouped.push(',');
      }
      grouped.push(ch);
   }
   grouped
}
