//! # 汎用 API ラッパー
//!
//! 任意のエンドポイントへのリクエストを、ミドルウェアパイプラインを通して送信する。
//!
//! ## 処理の流れ
//!
//! 1. ミドルウェアを登録順に適用する（いずれかが失敗したら送信せずに
//!    `API_MIDDLEWARE_FAILED` で終了）
//! 2. リクエストを送信する（`Content-Type: application/json` を既定で付与）
//! 3. 非 2xx は `API_REQUEST_FAILED`、それ以外の失敗は `API_INVALID_RESPONSE`
//!
//! [`TollgateClient::safe_api_request`] は失敗を [`Outcome`] として返す。

pub mod handlers;
pub mod middleware;

use std::{collections::BTreeMap, future::Future};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use strum::IntoStaticStr;
use tollgate_shared::{ClassifyExt, DomainError, Failure, Outcome, define_error_code};

pub use self::{
   handlers::{handle_auth, handle_payment, handle_user_profile},
   middleware::{BearerAuth, Middleware, RequestId},
};
use crate::client_impl::TollgateClient;

define_error_code! {
   /// API ラッパーのエラーコード
   pub enum ApiErrorCode("api", "ApiError") {
      /// バックエンドが非 2xx を返した
      RequestFailed => "API_REQUEST_FAILED",
      /// 通信やデコードの失敗
      InvalidResponse => "API_INVALID_RESPONSE",
      /// ミドルウェアが失敗した
      MiddlewareFailed => "API_MIDDLEWARE_FAILED",
      /// ハンドラが失敗した
      HandlerFailed => "API_HANDLER_FAILED",
   }
}

/// API ラッパーエラー
pub type ApiError = DomainError<ApiErrorCode>;

/// [`with_global_error_handling`] の既定コード
pub const DEFAULT_HANDLER_CODE: ApiErrorCode = ApiErrorCode::HandlerFailed;

/// HTTP メソッド
#[derive(
   Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
   Get,
   Post,
   Put,
   Delete,
}

impl From<HttpMethod> for reqwest::Method {
   fn from(method: HttpMethod) -> Self {
      match method {
         HttpMethod::Get => Self::GET,
         HttpMethod::Post => Self::POST,
         HttpMethod::Put => Self::PUT,
         HttpMethod::Delete => Self::DELETE,
      }
   }
}

/// 送信前のリクエスト
///
/// `endpoint` が `http://` または `https://` で始まる場合はそのまま使い、
/// それ以外はクライアントのベース URL に結合する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
   pub endpoint: String,
   pub method:   HttpMethod,
   /// JSON ボディ（`None` または `null` の場合は送信しない）
   #[serde(default, skip_serializing_if = "Option::is_none")]
   pub body:     Option<Value>,
   #[serde(default)]
   pub headers:  BTreeMap<String, String>,
}

impl ApiRequest {
   pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
      Self {
         endpoint: endpoint.into(),
         method,
         body: None,
         headers: BTreeMap::new(),
      }
   }

   pub fn with_body(mut self, body: Value) -> Self {
      self.body = Some(body);
      self
   }

   pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
      self.headers.insert(name.into(), value.into());
      self
   }
}

/// レスポンス
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
   pub data:    T,
   pub status:  u16,
   pub headers: BTreeMap<String, String>,
}

impl TollgateClient {
   /// ミドルウェアを適用してリクエストを送信し、レスポンスボディを `T` にデコードする
   ///
   /// 失敗はこの境界で分類し、一度だけログ出力する。
   #[tracing::instrument(
      skip_all,
      level = "debug",
      fields(method = %request.method, endpoint = %request.endpoint)
   )]
   pub async fn api_request<T: DeserializeOwned>(
      &self,
      request: ApiRequest,
      middlewares: &[&dyn Middleware],
   ) -> Result<ApiResponse<T>, ApiError> {
      dispatch(self, request, middlewares)
         .await
         .classify_and_log(ApiErrorCode::InvalidResponse, "API request handling failed")
   }

   /// [`api_request`](Self::api_request) の失敗を値として返す版
   ///
   /// 失敗時はステータス 500、空のヘッダーで [`Outcome::Failed`] を返す。
   pub async fn safe_api_request<T: DeserializeOwned>(
      &self,
      request: ApiRequest,
      middlewares: &[&dyn Middleware],
   ) -> ApiResponse<Outcome<T, ApiError>> {
      match self.api_request(request, middlewares).await {
         Ok(response) => ApiResponse {
            data:    Outcome::Success(response.data),
            status:  response.status,
            headers: response.headers,
         },
         // api_request でログ出力済み
         Err(err) => ApiResponse {
            data:    Outcome::Failed(err),
            status:  500,
            headers: BTreeMap::new(),
         },
      }
   }

   /// エンドポイントを送信先 URL に解決する
   pub(crate) fn resolve(&self, endpoint: &str) -> String {
      if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
         endpoint.to_string()
      } else if endpoint.starts_with('/') {
         self.url(endpoint)
      } else {
         self.url(&format!("/{endpoint}"))
      }
   }
}

/// 実行中の処理の失敗を分類・ログ出力し、[`Outcome`] として返す
///
/// この関数自体は失敗しない。コードの既定値は [`DEFAULT_HANDLER_CODE`]。
pub async fn with_global_error_handling<T, E, F>(
   code: ApiErrorCode,
   future: F,
) -> Outcome<T, ApiError>
where
   F: Future<Output = Result<T, E>>,
   E: Into<Failure>,
{
   future
      .await
      .classify_and_log(code, "Global handler captured an error")
      .into()
}

async fn dispatch<T: DeserializeOwned>(
   client: &TollgateClient,
   request: ApiRequest,
   middlewares: &[&dyn Middleware],
) -> Result<ApiResponse<T>, Failure> {
   let request = apply_middlewares(request, middlewares).await?;

   let mut builder = client
      .client
      .request(request.method.into(), client.resolve(&request.endpoint))
      .headers(build_headers(&request.headers)?);
   if let Some(body) = request.body.as_ref().filter(|body| !body.is_null()) {
      builder = builder.body(serde_json::to_vec(body)?);
   }

   let response = builder.send().await?;
   let status = response.status();
   if !status.is_success() {
      return Err(ApiError::new(
         ApiErrorCode::RequestFailed,
         format!("API request failed with status {}", status.as_u16()),
      )
      .into());
   }

   let headers = capture_headers(response.headers());
   let data = response.json::<T>().await?;

   Ok(ApiResponse {
      data,
      status: status.as_u16(),
      headers,
   })
}

/// ミドルウェアを登録順に適用する（最初の失敗で打ち切る）
async fn apply_middlewares(
   mut request: ApiRequest,
   middlewares: &[&dyn Middleware],
) -> Result<ApiRequest, ApiError> {
   for middleware in middlewares {
      request = middleware.apply(request).await.map_err(|err| {
         ApiError::classify(
            Failure::error(err),
            ApiErrorCode::MiddlewareFailed,
            "API middleware execution failed",
         )
      })?;
   }
   Ok(request)
}

/// 送信ヘッダーを組み立てる
///
/// `Content-Type: application/json` を既定とし、リクエストのヘッダーで上書きできる。
fn build_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap, Failure> {
   let mut map = HeaderMap::new();
   map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
   for (name, value) in headers {
      map.insert(
         HeaderName::from_bytes(name.as_bytes())?,
         HeaderValue::from_str(value)?,
      );
   }
   Ok(map)
}

/// レスポンスヘッダーを文字列のマップとして取り出す（非 ASCII の値は除く）
fn capture_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
   headers
      .iter()
      .filter_map(|(name, value)| {
         value
            .to_str()
            .ok()
            .map(|value| (name.as_str().to_string(), value.to_string()))
      })
      .collect()
}
