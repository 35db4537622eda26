//! # リクエストミドルウェア
//!
//! 送信前のリクエストを変換するステップ。失敗するとパイプライン全体が打ち切られる。
//!
//! `Fn(ApiRequest) -> Result<ApiRequest, BoxError>` を満たすクロージャはそのまま
//! ミドルウェアとして使える。

use async_trait::async_trait;
use tollgate_shared::BoxError;
use uuid::Uuid;

use super::ApiRequest;

/// リクエスト ID ヘッダー名
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// リクエスト変換ステップ
#[async_trait]
pub trait Middleware: Send + Sync {
   /// リクエストを変換する
   async fn apply(&self, request: ApiRequest) -> Result<ApiRequest, BoxError>;
}

#[async_trait]
impl<F> Middleware for F
where
   F: Fn(ApiRequest) -> Result<ApiRequest, BoxError> + Send + Sync,
{
   async fn apply(&self, request: ApiRequest) -> Result<ApiRequest, BoxError> {
      self(request)
   }
}

/// `X-Request-Id` に UUID v7 を付与する
///
/// 既に設定されている場合は上書きしない。
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestId;

#[async_trait]
impl Middleware for RequestId {
   async fn apply(&self, mut request: ApiRequest) -> Result<ApiRequest, BoxError> {
      let exists = request
         .headers
         .keys()
         .any(|name| name.eq_ignore_ascii_case(REQUEST_ID_HEADER));
      if !exists {
         request
            .headers
            .insert(REQUEST_ID_HEADER.to_string(), Uuid::now_v7().to_string());
      }
      Ok(request)
   }
}

/// `Authorization: Bearer <token>` を付与する
#[derive(Debug, Clone)]
pub struct BearerAuth {
   token: String,
}

impl BearerAuth {
   pub fn new(token: impl Into<String>) -> Self {
      Self {
         token: token.into(),
      }
   }
}

#[async_trait]
impl Middleware for BearerAuth {
   async fn apply(&self, request: ApiRequest) -> Result<ApiRequest, BoxError> {
      if self.token.trim().is_empty() {
         return Err("Bearer token is empty".into());
      }
      Ok(request.with_header("Authorization", format!("Bearer {}", self.token)))
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;
   use crate::api::HttpMethod;

   fn request() -> ApiRequest {
      ApiRequest::new(HttpMethod::Get, "/api/ping")
   }

   #[tokio::test]
   async fn test_request_idを付与する() {
      let request = RequestId.apply(request()).await.unwrap();

      let id = request.headers.get(REQUEST_ID_HEADER).expect("ヘッダーが付与されること");
      let uuid = Uuid::parse_str(id).unwrap();
      assert_eq!(uuid.get_version_num(), 7);
   }

   #[tokio::test]
   async fn test_既存のrequest_idは上書きしない() {
      let original = request().with_header("x-request-id", "fixed");

      let request = RequestId.apply(original).await.unwrap();

      assert_eq!(request.headers.len(), 1);
      assert_eq!(request.headers["x-request-id"], "fixed");
   }

   #[tokio::test]
   async fn test_bearerトークンを付与する() {
      let request = BearerAuth::new("t0ken").apply(request()).await.unwrap();

      assert_eq!(request.headers["Authorization"], "Bearer t0ken");
   }

   #[tokio::test]
   async fn test_空のbearerトークンは失敗する() {
      let result = BearerAuth::new("  ").apply(request()).await;

      assert_eq!(
         result.map_err(|err| err.to_string()),
         Err("Bearer token is empty".to_string())
      );
   }
}
