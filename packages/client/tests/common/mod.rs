//! 統合テスト用のスタブバックエンド
//!
//! `127.0.0.1:0` で in-process の axum サーバーを起動し、
//! クライアントが呼び出す各エンドポイントを固定の振る舞いで応答する。
//! 受け付けたリクエストは `"METHOD /path"` 単位で数える。
//!
//! ## 振る舞い
//!
//! - `POST /api/auth/login`: パスワードが [`VALID_PASSWORD`] なら 200、それ以外は 401
//! - `POST /api/auth/refresh`: `Bearer valid-token` なら新トークン、
//!   `Bearer garbled-token` なら JSON でないボディ、それ以外は 401
//! - `POST /api/payments/process`: 金額が [`DECLINE_ABOVE`] を超えると 402
//! - `POST /api/payments/{id}/refund`: `p-missing` は 404、`p-garbled` は不正なボディ
//! - `GET /api/users/{id}`: `u-missing` は 404、`u-flaky` は最初の 2 回だけ 503
//! - `PUT /api/users/{id}`: `u-locked` は 409、それ以外は更新内容を反映して返す
//! - `ANY /api/echo`: メソッド・ヘッダー・ボディをそのまま返す（`x-stub: 1` 付き）
//! - `GET /api/status/{code}`: 指定ステータスで `{}` を返す

#![allow(dead_code)]

use std::{
   collections::HashMap,
   io,
   sync::{Arc, Mutex},
};

use axum::{
   Json,
   Router,
   body::Bytes,
   extract::{Path, State},
   http::{HeaderMap, Method, StatusCode, header::AUTHORIZATION},
   response::{IntoResponse, Response},
   routing::{any, get, post},
};
use serde_json::{Value, json};

/// ログインが成功するパスワード
pub const VALID_PASSWORD: &str = "correct-password";

/// これを超える金額の決済は拒否される
pub const DECLINE_ABOVE: f64 = 10_000.0;

/// 起動中のスタブサーバー
pub struct StubServer {
   pub base_url: String,
   state:        Arc<StubState>,
}

impl StubServer {
   /// `"METHOD /path"` への到達回数
   pub fn hits(&self, key: &str) -> usize {
      self.state.hits(key)
   }

   /// 全エンドポイントへの到達回数の合計
   pub fn total_hits(&self) -> usize {
      self.state.hits.lock().unwrap().values().sum()
   }
}

#[derive(Default)]
struct StubState {
   hits: Mutex<HashMap<String, usize>>,
}

impl StubState {
   /// 到達を記録し、記録後の回数を返す
   fn record(&self, method: &Method, path: &str) -> usize {
      let mut hits = self.hits.lock().unwrap();
      let count = hits.entry(format!("{method} {path}")).or_insert(0);
      *count += 1;
      *count
   }

   fn hits(&self, key: &str) -> usize {
      self.hits.lock().unwrap().get(key).copied().unwrap_or(0)
   }
}

type Shared = State<Arc<StubState>>;

/// スタブサーバーを起動する
pub async fn start() -> StubServer {
   let state = Arc::new(StubState::default());
   let app = Router::new()
      .route("/api/auth/login", post(login))
      .route("/api/auth/refresh", post(refresh))
      .route("/api/payments/process", post(process_payment))
      .route("/api/payments/{id}/refund", post(refund_payment))
      .route("/api/users/{id}", get(get_user).put(update_user))
      .route("/api/echo", any(echo))
      .route("/api/status/{code}", get(status))
      .with_state(Arc::clone(&state));

   let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
   let addr = listener.local_addr().unwrap();
   tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
   });

   StubServer {
      base_url: format!("http://{addr}"),
      state,
   }
}

async fn login(State(state): Shared, Json(body): Json<Value>) -> Response {
   state.record(&Method::POST, "/api/auth/login");

   if body["password"] != VALID_PASSWORD {
      return StatusCode::UNAUTHORIZED.into_response();
   }
   Json(json!({
      "id": "u-1",
      "email": body["email"],
      "passwordHash": "$argon2id$stub",
   }))
   .into_response()
}

async fn refresh(State(state): Shared, headers: HeaderMap) -> Response {
   state.record(&Method::POST, "/api/auth/refresh");

   match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
      Some("Bearer valid-token") => Json(json!("refreshed-token")).into_response(),
      Some("Bearer garbled-token") => (StatusCode::OK, "not-json").into_response(),
      _ => StatusCode::UNAUTHORIZED.into_response(),
   }
}

async fn process_payment(State(state): Shared, Json(body): Json<Value>) -> Response {
   state.record(&Method::POST, "/api/payments/process");

   let amount = body["amount"].as_f64().unwrap_or_default();
   if amount > DECLINE_ABOVE {
      return (StatusCode::PAYMENT_REQUIRED, Json(json!({ "reason": "limit" }))).into_response();
   }
   Json(json!({
      "id": "p-1",
      "amount": amount,
      "currency": body["currency"],
      "status": "completed",
   }))
   .into_response()
}

async fn refund_payment(State(state): Shared, Path(id): Path<String>) -> Response {
   state.record(&Method::POST, &format!("/api/payments/{id}/refund"));

   match id.as_str() {
      "p-missing" => StatusCode::NOT_FOUND.into_response(),
      "p-garbled" => (StatusCode::OK, "{").into_response(),
      _ => Json(json!({
         "id": id,
         "amount": 10.0,
         "currency": "USD",
         "status": "pending",
      }))
      .into_response(),
   }
}

fn profile(id: &str) -> Value {
   json!({
      "id": id,
      "name": "Alice",
      "email": "alice@example.com",
      "preferences": { "theme": "dark" },
   })
}

async fn get_user(State(state): Shared, Path(id): Path<String>) -> Response {
   let count = state.record(&Method::GET, &format!("/api/users/{id}"));

   match id.as_str() {
      "u-missing" => StatusCode::NOT_FOUND.into_response(),
      "u-flaky" if count <= 2 => StatusCode::SERVICE_UNAVAILABLE.into_response(),
      _ => Json(profile(&id)).into_response(),
   }
}

async fn update_user(
   State(state): Shared,
   Path(id): Path<String>,
   Json(update): Json<Value>,
) -> Response {
   state.record(&Method::PUT, &format!("/api/users/{id}"));

   if id == "u-locked" {
      return StatusCode::CONFLICT.into_response();
   }
   let mut current = profile(&id);
   if let (Some(current), Some(update)) = (current.as_object_mut(), update.as_object()) {
      for (key, value) in update {
         current.insert(key.clone(), value.clone());
      }
   }
   Json(current).into_response()
}

async fn echo(State(state): Shared, method: Method, headers: HeaderMap, body: Bytes) -> Response {
   state.record(&method, "/api/echo");

   let headers: HashMap<String, String> = headers
      .iter()
      .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
      .collect();
   let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

   (
      [("x-stub", "1")],
      Json(json!({
         "method": method.as_str(),
         "headers": headers,
         "body": body,
      })),
   )
      .into_response()
}

async fn status(State(state): Shared, Path(code): Path<u16>) -> Response {
   state.record(&Method::GET, &format!("/api/status/{code}"));

   let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
   (status, Json(json!({}))).into_response()
}

/// ERROR レベルのログを JSON 行として捕捉する
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
   /// 現在のスレッドの subscriber として設定する
   ///
   /// `#[tokio::test]` は current_thread ランタイムで動くため、テスト本体の
   /// await 中のログもすべて捕捉される。
   pub fn install(&self) -> tracing::subscriber::DefaultGuard {
      let writer = self.clone();
      let subscriber = tracing_subscriber::fmt()
         .json()
         .flatten_event(true)
         .with_max_level(tracing::Level::ERROR)
         .with_writer(move || writer.clone())
         .finish();
      tracing::subscriber::set_default(subscriber)
   }

   pub fn records(&self) -> Vec<Value> {
      let buf = self.0.lock().unwrap();
      String::from_utf8_lossy(&buf)
         .lines()
         .filter_map(|line| serde_json::from_str(line).ok())
         .collect()
   }

   /// 指定コードのエラーログの件数
   pub fn count_kind(&self, kind: &str) -> usize {
      self
         .records()
         .iter()
         .filter(|record| record["error.kind"] == kind)
         .count()
   }
}

impl io::Write for CapturedLogs {
   fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
   }

   fn flush(&mut self) -> io::Result<()> {
      Ok(())
   }
}
