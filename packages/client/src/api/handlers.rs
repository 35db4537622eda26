//! # API ハンドラ
//!
//! 各ドメインクライアントの呼び出しを API 境界で包む。
//! ドメインエラーは `API_HANDLER_FAILED` の原因として保持される。

use tollgate_domain::{Payment, User, UserProfile};
use tollgate_shared::ClassifyExt;

use super::{ApiError, ApiErrorCode};
use crate::{auth::AuthClient, payments::PaymentClient, user::UserClient};

/// 決済ハンドラが使う通貨
pub const HANDLER_CURRENCY: &str = "USD";

/// 認証ハンドラ
#[tracing::instrument(skip_all, level = "debug")]
pub async fn handle_auth(
   client: &dyn AuthClient,
   email: &str,
   password: &str,
) -> Result<User, ApiError> {
   client
      .authenticate_user(email, password)
      .await
      .classify_and_log(ApiErrorCode::HandlerFailed, "Authentication handler failed")
}

/// 決済ハンドラ（通貨は [`HANDLER_CURRENCY`] 固定）
#[tracing::instrument(skip_all, level = "debug")]
pub async fn handle_payment(
   client: &dyn PaymentClient,
   user_id: &str,
   amount: f64,
) -> Result<Payment, ApiError> {
   client
      .process_payment(user_id, amount, HANDLER_CURRENCY)
      .await
      .classify_and_log(ApiErrorCode::HandlerFailed, "Payment handler failed")
}

/// プロフィール取得ハンドラ
#[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
pub async fn handle_user_profile(
   client: &dyn UserClient,
   user_id: &str,
) -> Result<UserProfile, ApiError> {
   client
      .get_user_profile(user_id)
      .await
      .classify_and_log(ApiErrorCode::HandlerFailed, "User profile handler failed")
}

#[cfg(test)]
mod tests {
   use std::sync::Mutex;

   use async_trait::async_trait;
   use pretty_assertions::assert_eq;
   use tollgate_domain::PaymentStatus;

   use super::*;
   use crate::{
      auth::{AuthError, AuthErrorCode},
      payments::PaymentError,
      user::UserError,
   };

   /// 認証が常に失敗するスタブ
   struct RejectingAuthClient;

   #[async_trait]
   impl AuthClient for RejectingAuthClient {
      async fn authenticate_user(&self, _: &str, _: &str) -> Result<User, AuthError> {
         Err(AuthError::new(AuthErrorCode::Failed, "Authentication failed"))
      }

      async fn refresh_token(&self, _: &str) -> Result<String, AuthError> {
         Err(AuthError::new(AuthErrorCode::TokenRefreshFailed, "Token refresh failed"))
      }
   }

   /// 受け取った通貨を記録する決済スタブ
   #[derive(Default)]
   struct RecordingPaymentClient {
      currencies: Mutex<Vec<String>>,
   }

   #[async_trait]
   impl PaymentClient for RecordingPaymentClient {
      async fn process_payment(
         &self,
         _: &str,
         amount: f64,
         currency: &str,
      ) -> Result<Payment, PaymentError> {
         self.currencies.lock().unwrap().push(currency.to_string());
         Ok(Payment {
            id: "p-1".to_string(),
            amount,
            currency: currency.to_string(),
            status: PaymentStatus::Completed,
         })
      }

      async fn refund_payment(&self, _: &str) -> Result<Payment, PaymentError> {
         unreachable!("ハンドラは返金を呼ばない")
      }
   }

   struct FixedUserClient;

   #[async_trait]
   impl UserClient for FixedUserClient {
      async fn get_user_profile(&self, user_id: &str) -> Result<UserProfile, UserError> {
         Ok(UserProfile {
            id:          user_id.to_string(),
            name:        "Alice".to_string(),
            email:       "alice@example.com".to_string(),
            preferences: Default::default(),
         })
      }

      async fn update_user_profile(
         &self,
         _: &str,
         _: &tollgate_domain::UserProfileUpdate,
      ) -> Result<UserProfile, UserError> {
         unreachable!("ハンドラは更新を呼ばない")
      }
   }

   #[tokio::test]
   async fn test_認証失敗はhandler_failedで原因を保持する() {
      let err = handle_auth(&RejectingAuthClient, "a@b.com", "password")
         .await
         .unwrap_err();

      assert_eq!(err.code(), ApiErrorCode::HandlerFailed);
      assert_eq!(err.message(), "Authentication failed");
      let cause = err
         .cause()
         .and_then(|cause| cause.downcast_ref::<AuthError>())
         .expect("原因に認証エラーが保持されること");
      assert_eq!(cause.code(), AuthErrorCode::Failed);
   }

   #[tokio::test]
   async fn test_決済ハンドラはusdで決済する() {
      let client = RecordingPaymentClient::default();

      let payment = handle_payment(&client, "u-1", 25.0).await.unwrap();

      assert_eq!(payment.currency, "USD");
      assert_eq!(*client.currencies.lock().unwrap(), vec!["USD".to_string()]);
   }

   #[tokio::test]
   async fn test_プロフィールハンドラは結果をそのまま返す() {
      let profile = handle_user_profile(&FixedUserClient, "u-9").await.unwrap();

      assert_eq!(profile.id, "u-9");
   }
}
