//! # 決済クライアント
//!
//! 決済処理と返金を担当する。
//!
//! ## エンドポイント
//!
//! - `POST /api/payments/process` - 決済
//! - `POST /api/payments/{id}/refund` - 返金

use async_trait::async_trait;
pub use tollgate_domain::{Payment, PaymentRequest, PaymentStatus, calculate_fee};
use tollgate_shared::{ClassifyExt, DomainError, Failure, define_error_code};

use crate::{
   client_impl::{TollgateClient, path_segment},
   response::handle_response,
};

define_error_code! {
   /// 決済ドメインのエラーコード
   pub enum PaymentErrorCode("payments", "PaymentError") {
      /// 決済が拒否された（非 2xx）
      Declined => "PAYMENT_DECLINED",
      /// 通信に失敗した
      NetworkError => "PAYMENT_NETWORK_ERROR",
      /// レスポンスを解釈できない
      InvalidResponse => "PAYMENT_INVALID_RESPONSE",
      /// 返金に失敗した（非 2xx）
      RefundFailed => "PAYMENT_REFUND_FAILED",
      /// 入力が不正（送信前に検出）
      InvalidRequest => "PAYMENT_INVALID_REQUEST",
   }
}

/// 決済クライアントエラー
pub type PaymentError = DomainError<PaymentErrorCode>;

/// 決済クライアントトレイト
#[async_trait]
pub trait PaymentClient: Send + Sync {
   /// 決済を実行する
   ///
   /// 通貨コードは検証のみ行い、渡された値のまま送信する。
   ///
   /// # エラー
   ///
   /// - `PAYMENT_INVALID_REQUEST`: ユーザー ID が空、金額が正の有限値でない、
   ///   または通貨コードが英字 3 文字でない
   /// - `PAYMENT_DECLINED`: バックエンドが非 2xx を返した
   /// - `PAYMENT_NETWORK_ERROR`: 通信やデコードの失敗
   async fn process_payment(
      &self,
      user_id: &str,
      amount: f64,
      currency: &str,
   ) -> Result<Payment, PaymentError>;

   /// 決済を返金する
   ///
   /// # エラー
   ///
   /// - `PAYMENT_INVALID_REQUEST`: 決済 ID が空
   /// - `PAYMENT_REFUND_FAILED`: バックエンドが非 2xx を返した
   /// - `PAYMENT_INVALID_RESPONSE`: 通信やデコードの失敗
   async fn refund_payment(&self, payment_id: &str) -> Result<Payment, PaymentError>;
}

#[async_trait]
impl PaymentClient for TollgateClient {
   #[tracing::instrument(skip_all, level = "debug", fields(%currency))]
   async fn process_payment(
      &self,
      user_id: &str,
      amount: f64,
      currency: &str,
   ) -> Result<Payment, PaymentError> {
      process(self, user_id, amount, currency)
         .await
         .classify_and_log(PaymentErrorCode::NetworkError, "Payment request failed")
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%payment_id))]
   async fn refund_payment(&self, payment_id: &str) -> Result<Payment, PaymentError> {
      refund(self, payment_id)
         .await
         .classify_and_log(PaymentErrorCode::InvalidResponse, "Refund request failed")
   }
}

/// 決済リクエストを組み立てる（送信前の検証を含む）
fn payment_request(
   user_id: &str,
   amount: f64,
   currency: &str,
) -> Result<PaymentRequest, PaymentError> {
   if user_id.is_empty() {
      return Err(invalid("User ID is required"));
   }
   if !amount.is_finite() || amount <= 0.0 {
      return Err(invalid("Amount must be a positive number"));
   }
   if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_alphabetic()) {
      return Err(invalid("Currency must be a 3-letter code"));
   }

   Ok(PaymentRequest {
      user_id: user_id.to_string(),
      amount,
      currency: currency.to_string(),
   })
}

fn invalid(message: &str) -> PaymentError {
   PaymentError::new(PaymentErrorCode::InvalidRequest, message)
}

async fn process(
   client: &TollgateClient,
   user_id: &str,
   amount: f64,
   currency: &str,
) -> Result<Payment, Failure> {
   let request = payment_request(user_id, amount, currency)?;

   let response = client
      .client
      .post(client.url("/api/payments/process"))
      .json(&request)
      .send()
      .await?;

   handle_response(response, |_| {
      PaymentError::new(PaymentErrorCode::Declined, "Payment processing failed")
   })
   .await
}

async fn refund(client: &TollgateClient, payment_id: &str) -> Result<Payment, Failure> {
   if payment_id.is_empty() {
      return Err(invalid("Payment ID is required").into());
   }

   let path = format!("/api/payments/{}/refund", path_segment(payment_id));
   let response = client.client.post(client.url(&path)).send().await?;

   handle_response(response, |_| {
      PaymentError::new(PaymentErrorCode::RefundFailed, "Payment refund failed")
   })
   .await
}
