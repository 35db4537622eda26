//! # ユーザープロフィールクライアント
//!
//! プロフィールの取得・更新と、メールアドレス形式の検証を担当する。
//!
//! ## エンドポイント
//!
//! - `GET /api/users/{id}` - プロフィール取得
//! - `PUT /api/users/{id}` - プロフィール部分更新

use async_trait::async_trait;
pub use tollgate_domain::{UserProfile, UserProfileUpdate};
use tollgate_shared::{ClassifyExt, DomainError, Failure, define_error_code};

use crate::{
   client_impl::{TollgateClient, path_segment},
   response::handle_response,
};

define_error_code! {
   /// ユーザードメインのエラーコード
   pub enum UserErrorCode("user", "ValidationError") {
      /// 入力検証エラー
      Validation => "VALIDATION_ERROR",
      /// プロフィール取得に失敗した（非 2xx）
      FetchFailed => "USER_FETCH_FAILED",
      /// プロフィール更新に失敗した（非 2xx）
      UpdateFailed => "USER_UPDATE_FAILED",
      /// 通信やデコードの失敗
      InvalidResponse => "USER_INVALID_RESPONSE",
   }
}

/// ユーザークライアントエラー
pub type UserError = DomainError<UserErrorCode>;

/// ユーザープロフィールクライアントトレイト
#[async_trait]
pub trait UserClient: Send + Sync {
   /// プロフィールを取得する
   ///
   /// # エラー
   ///
   /// - `VALIDATION_ERROR`: ユーザー ID が空白のみ
   /// - `USER_FETCH_FAILED`: バックエンドが非 2xx を返した
   /// - `USER_INVALID_RESPONSE`: 通信やデコードの失敗
   async fn get_user_profile(&self, user_id: &str) -> Result<UserProfile, UserError>;

   /// プロフィールを部分更新する
   ///
   /// # エラー
   ///
   /// - `VALIDATION_ERROR`: ユーザー ID が空白のみ、またはメールアドレスの形式が不正
   /// - `USER_UPDATE_FAILED`: バックエンドが非 2xx を返した
   /// - `USER_INVALID_RESPONSE`: 通信やデコードの失敗
   async fn update_user_profile(
      &self,
      user_id: &str,
      update: &UserProfileUpdate,
   ) -> Result<UserProfile, UserError>;
}

#[async_trait]
impl UserClient for TollgateClient {
   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn get_user_profile(&self, user_id: &str) -> Result<UserProfile, UserError> {
      fetch_profile(self, user_id)
         .await
         .classify_and_log(UserErrorCode::InvalidResponse, "User profile request failed")
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn update_user_profile(
      &self,
      user_id: &str,
      update: &UserProfileUpdate,
   ) -> Result<UserProfile, UserError> {
      update_profile(self, user_id, update)
         .await
         .classify_and_log(UserErrorCode::InvalidResponse, "User update request failed")
   }
}

/// メールアドレスの形式が正しいか判定する
///
/// 判定自体に失敗した場合は `VALIDATION_ERROR` としてログ出力し、`false` を返す。
/// エラーを伝播させない唯一の操作。
pub fn validate_email(email: &str) -> bool {
   email_check(tollgate_domain::is_valid_email(email))
}

/// パターン照合の結果を判定値にする（照合自体の失敗は `false`）
fn email_check(result: Result<bool, regex::Error>) -> bool {
   result
      .classify_and_log(UserErrorCode::Validation, "Email validation failed")
      .unwrap_or(false)
}

fn require_user_id(user_id: &str) -> Result<(), UserError> {
   if user_id.trim().is_empty() {
      return Err(UserError::new(UserErrorCode::Validation, "User ID is required"));
   }
   Ok(())
}

async fn fetch_profile(client: &TollgateClient, user_id: &str) -> Result<UserProfile, Failure> {
   require_user_id(user_id)?;

   let path = format!("/api/users/{}", path_segment(user_id));
   let response = client.client.get(client.url(&path)).send().await?;

   handle_response(response, |_| {
      UserError::new(UserErrorCode::FetchFailed, "Failed to fetch user profile")
   })
   .await
}

async fn update_profile(
   client: &TollgateClient,
   user_id: &str,
   update: &UserProfileUpdate,
) -> Result<UserProfile, Failure> {
   require_user_id(user_id)?;
   if let Some(email) = &update.email
      && !validate_email(email)
   {
      return Err(UserError::new(UserErrorCode::Validation, "Invalid email format").into());
   }

   let path = format!("/api/users/{}", path_segment(user_id));
   let response = client.client.put(client.url(&path)).json(update).send().await?;

   handle_response(response, |_| {
      UserError::new(UserErrorCode::UpdateFailed, "Failed to update user profile")
   })
   .await
}
