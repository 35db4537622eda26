//! # 認証クライアント
//!
//! ログインとトークン更新を担当する。
//!
//! ## エンドポイント
//!
//! - `POST /api/auth/login` - パスワード認証
//! - `POST /api/auth/refresh` - トークン更新（`Authorization: Bearer`）

use async_trait::async_trait;
use serde::Serialize;
pub use tollgate_domain::{User, validate_password};
use tollgate_shared::{ClassifyExt, DomainError, Failure, define_error_code};

use crate::{client_impl::TollgateClient, response::handle_response};

define_error_code! {
   /// 認証ドメインのエラーコード
   pub enum AuthErrorCode("auth", "AuthError") {
      /// 認証に失敗した（非 2xx）
      Failed => "AUTH_FAILED",
      /// 通信に失敗した
      NetworkError => "AUTH_NETWORK_ERROR",
      /// レスポンスを解釈できない
      InvalidResponse => "AUTH_INVALID_RESPONSE",
      /// トークン更新に失敗した（非 2xx）
      TokenRefreshFailed => "AUTH_TOKEN_REFRESH_FAILED",
      /// 入力が不正（送信前に検出）
      InvalidRequest => "AUTH_INVALID_REQUEST",
   }
}

/// 認証クライアントエラー
pub type AuthError = DomainError<AuthErrorCode>;

/// 認証クライアントトレイト
#[async_trait]
pub trait AuthClient: Send + Sync {
   /// メールアドレスとパスワードで認証する
   ///
   /// # エラー
   ///
   /// - `AUTH_INVALID_REQUEST`: メールアドレスまたはパスワードが空
   /// - `AUTH_FAILED`: バックエンドが非 2xx を返した
   /// - `AUTH_NETWORK_ERROR`: 通信やデコードの失敗
   async fn authenticate_user(&self, email: &str, password: &str) -> Result<User, AuthError>;

   /// トークンを更新し、新しいトークンを返す
   ///
   /// # エラー
   ///
   /// - `AUTH_INVALID_REQUEST`: トークンが空
   /// - `AUTH_TOKEN_REFRESH_FAILED`: バックエンドが非 2xx を返した
   /// - `AUTH_INVALID_RESPONSE`: 通信やデコードの失敗
   async fn refresh_token(&self, token: &str) -> Result<String, AuthError>;
}

/// ログインリクエスト
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
   email:    &'a str,
   password: &'a str,
}

#[async_trait]
impl AuthClient for TollgateClient {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn authenticate_user(&self, email: &str, password: &str) -> Result<User, AuthError> {
      login(self, email, password)
         .await
         .classify_and_log(AuthErrorCode::NetworkError, "Authentication request failed")
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn refresh_token(&self, token: &str) -> Result<String, AuthError> {
      refresh(self, token)
         .await
         .classify_and_log(AuthErrorCode::InvalidResponse, "Token refresh request failed")
   }
}

async fn login(client: &TollgateClient, email: &str, password: &str) -> Result<User, Failure> {
   if email.is_empty() || password.is_empty() {
      return Err(AuthError::new(
         AuthErrorCode::InvalidRequest,
         "Email and password are required",
      )
      .into());
   }

   let response = client
      .client
      .post(client.url("/api/auth/login"))
      .json(&LoginRequest { email, password })
      .send()
      .await?;

   handle_response(response, |_| {
      AuthError::new(AuthErrorCode::Failed, "Authentication failed")
   })
   .await
}

async fn refresh(client: &TollgateClient, token: &str) -> Result<String, Failure> {
   if token.is_empty() {
      return Err(AuthError::new(AuthErrorCode::InvalidRequest, "Token is required").into());
   }

   let response = client
      .client
      .post(client.url("/api/auth/refresh"))
      .bearer_auth(token)
      .send()
      .await?;

   handle_response(response, |_| {
      AuthError::new(AuthErrorCode::TokenRefreshFailed, "Token refresh failed")
   })
   .await
}
