//! # 決済
//!
//! 決済 API のリクエスト・レスポンスと手数料計算。
//!
//! ## 手数料
//!
//! 決済額に対して 2.9% + 0.30 の手数料がかかる。
//!
//! ```
//! use tollgate_domain::calculate_fee;
//!
//! let fee = calculate_fee(100.0);
//! assert!((fee - 3.2).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// 手数料率
pub const FEE_RATE: f64 = 0.029;

/// 固定手数料
pub const FIXED_FEE: f64 = 0.30;

/// 決済ステータス
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
   Pending,
   Completed,
   Failed,
}

/// 決済
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
   pub id:       String,
   pub amount:   f64,
   pub currency: String,
   pub status:   PaymentStatus,
}

/// 決済リクエスト（`POST /api/payments/process` のボディ）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
   pub user_id:  String,
   pub amount:   f64,
   pub currency: String,
}

/// 決済額に対する手数料を計算する
pub fn calculate_fee(amount: f64) -> f64 {
   amount * FEE_RATE + FIXED_FEE
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case(100.0, 3.2)]
   #[case(0.0, 0.30)]
   #[case(1000.0, 29.3)]
   #[case(10.0, 0.59)]
   fn test_calculate_fee(#[case] amount: f64, #[case] expected: f64) {
      let fee = calculate_fee(amount);
      assert!((fee - expected).abs() < 1e-9, "fee = {fee}");
   }

   #[test]
   fn test_payment_requestはcamel_caseでシリアライズされる() {
      let request = PaymentRequest {
         user_id:  "u-1".to_string(),
         amount:   12.5,
         currency: "USD".to_string(),
      };

      let json = serde_json::to_value(&request).unwrap();

      assert_eq!(
         json,
         serde_json::json!({ "userId": "u-1", "amount": 12.5, "currency": "USD" })
      );
   }

   #[test]
   fn test_paymentのステータスは小文字でデシリアライズされる() {
      let json = r#"{"id":"p-1","amount":10.0,"currency":"USD","status":"completed"}"#;

      let payment: Payment = serde_json::from_str(json).unwrap();

      assert_eq!(payment.status, PaymentStatus::Completed);
      assert_eq!(payment.status.to_string(), "completed");
   }
}
