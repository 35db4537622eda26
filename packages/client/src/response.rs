//! バックエンドレスポンスの共通ハンドリング

use serde::de::DeserializeOwned;
use tollgate_shared::{DomainError, ErrorCode, Failure};

/// バックエンドレスポンスの共通ハンドリング
///
/// 成功（2xx）時はレスポンスボディを `T` にデシリアライズする。
/// それ以外はボディの内容に関わらず、`on_failure` が返すドメインエラーで失敗する。
///
/// # 引数
///
/// - `response`: バックエンドからの HTTP レスポンス
/// - `on_failure`: 非 2xx のときにステータスコードからエラーを作る関数
pub(crate) async fn handle_response<T, C>(
   response: reqwest::Response,
   on_failure: impl FnOnce(reqwest::StatusCode) -> DomainError<C>,
) -> Result<T, Failure>
where
   T: DeserializeOwned,
   C: ErrorCode,
{
   let status = response.status();

   if !status.is_success() {
      return Err(on_failure(status).into());
   }

   let body = response.json::<T>().await?;
   Ok(body)
}
