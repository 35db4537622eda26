//! サブコマンドの実行
//!
//! 各コマンドの結果は `{ "ok": ..., ... }` の JSON として出力する。
//! ネットワークを使うコマンドは [`with_global_error_handling`] の中で実行するため、
//! 失敗はパニックやエラー終了ではなく `ok: false` の値になる。

use serde::Serialize;
use serde_json::{Map, Value, json};
use tollgate_client::{
   ApiError,
   ApiRequest,
   AuthClient,
   ClientConfig,
   PaymentClient,
   TollgateClient,
   UserClient,
   api::{BearerAuth, DEFAULT_HANDLER_CODE, Middleware, RequestId, with_global_error_handling},
   user::UserProfileUpdate,
   utils::{format_currency, parse_json, retry_with_policy},
   validate_email,
};
use tollgate_domain::calculate_fee;
use tollgate_shared::{Failure, Outcome};

use crate::cli::Command;

/// コマンドの実行結果
#[derive(Debug)]
pub struct Report {
   /// 出力する JSON
   pub body:    Value,
   pub success: bool,
}

impl Report {
   fn from_outcome<T: Serialize, E: Serialize>(outcome: &Outcome<T, E>) -> anyhow::Result<Self> {
      Ok(Self {
         body:    serde_json::to_value(outcome)?,
         success: outcome.is_success(),
      })
   }
}

/// コマンドを実行する
///
/// 接続先の設定はネットワークを使うコマンドでのみ読み込む。
pub async fn run(command: Command) -> anyhow::Result<Report> {
   match command {
      Command::Fee { amount } => {
         let outcome: Outcome<Value, ApiError> =
            Outcome::Success(json!({ "amount": amount, "fee": calculate_fee(amount) }));
         Report::from_outcome(&outcome)
      }
      Command::ValidateEmail { email } => {
         let outcome: Outcome<bool, ApiError> = Outcome::Success(validate_email(&email));
         Report::from_outcome(&outcome)
      }
      Command::FormatCurrency { amount, currency } => {
         Report::from_outcome(&Outcome::from(format_currency(amount, &currency)))
      }
      Command::Login { email, password } => {
         let (_, client) = connect()?;
         let outcome = with_global_error_handling(
            DEFAULT_HANDLER_CODE,
            client.authenticate_user(&email, &password),
         )
         .await;
         Report::from_outcome(&outcome)
      }
      Command::Refresh { token } => {
         let (_, client) = connect()?;
         let outcome =
            with_global_error_handling(DEFAULT_HANDLER_CODE, client.refresh_token(&token)).await;
         Report::from_outcome(&outcome)
      }
      Command::Pay {
         user_id,
         amount,
         currency,
      } => {
         let (_, client) = connect()?;
         let outcome = with_global_error_handling(
            DEFAULT_HANDLER_CODE,
            client.process_payment(&user_id, amount, &currency),
         )
         .await;
         Report::from_outcome(&outcome)
      }
      Command::Refund { payment_id } => {
         let (_, client) = connect()?;
         let outcome =
            with_global_error_handling(DEFAULT_HANDLER_CODE, client.refund_payment(&payment_id))
               .await;
         Report::from_outcome(&outcome)
      }
      Command::Profile { user_id } => {
         let (config, client) = connect()?;
         let outcome = with_global_error_handling(
            DEFAULT_HANDLER_CODE,
            retry_with_policy(
               config.retry,
               || client.get_user_profile(&user_id),
               tokio::time::sleep,
            ),
         )
         .await;
         Report::from_outcome(&outcome)
      }
      Command::UpdateProfile {
         user_id,
         name,
         email,
         preferences,
      } => {
         let (_, client) = connect()?;
         let outcome = with_global_error_handling(DEFAULT_HANDLER_CODE, async {
            let preferences = preferences
               .as_deref()
               .map(parse_json::<Map<String, Value>>)
               .transpose()?;
            let update = UserProfileUpdate {
               name,
               email,
               preferences,
            };
            client
               .update_user_profile(&user_id, &update)
               .await
               .map_err(Failure::from)
         })
         .await;
         Report::from_outcome(&outcome)
      }
      Command::Request {
         method,
         endpoint,
         body,
         headers,
         bearer,
      } => {
         let (_, client) = connect()?;
         let body = match body.as_deref().map(parse_json::<Value>).transpose() {
            Ok(body) => body,
            Err(err) => return Report::from_outcome(&Outcome::<Value, _>::Failed(err)),
         };

         let mut request = ApiRequest::new(method, endpoint);
         request.body = body;
         request.headers.extend(headers);

         let auth = bearer.map(BearerAuth::new);
         let mut middlewares: Vec<&dyn Middleware> = vec![&RequestId];
         if let Some(auth) = &auth {
            middlewares.push(auth);
         }

         let response = client.safe_api_request::<Value>(request, &middlewares).await;
         Ok(Report {
            success: response.data.is_success(),
            body:    serde_json::to_value(&response)?,
         })
      }
   }
}

/// 環境変数から接続先を読み込み、クライアントを作成する
fn connect() -> anyhow::Result<(ClientConfig, TollgateClient)> {
   let config = ClientConfig::from_env()?;
   let client = TollgateClient::from_config(&config);
   tracing::debug!(base_url = client.base_url(), "バックエンドに接続します");
   Ok((config, client))
}
