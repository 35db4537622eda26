//! 線形バックオフ付きリトライ
//!
//! 失敗した試行ごとにエラーを `RETRY_FAILED` として分類・ログ出力し、
//! `基準時間 × 試行番号` だけ待ってから次の試行に進む。最後の試行の後は待たない。

use std::{future::Future, time::Duration};

use tollgate_shared::Failure;

use super::{UtilityError, UtilityErrorCode};

/// 既定のバックオフ基準時間
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// リトライ方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
   /// 最大試行回数（初回を含む）
   pub max_attempts: u32,
   /// バックオフ基準時間
   pub base_delay:   Duration,
}

impl RetryPolicy {
   pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
      Self {
         max_attempts,
         base_delay,
      }
   }

   /// `attempt` 回目の失敗後に待つ時間
   pub fn backoff(&self, attempt: u32) -> Duration {
      self.base_delay.saturating_mul(attempt)
   }
}

impl Default for RetryPolicy {
   fn default() -> Self {
      Self::new(3, DEFAULT_BASE_DELAY)
   }
}

/// 処理を最大 `max_attempts` 回試行する（基準時間 1000ms）
///
/// # エラー
///
/// - `RETRY_INVALID_ATTEMPTS`: `max_attempts` が 0（処理は一度も呼ばれない）
/// - 最後の試行のエラー（他に分類済みでなければ `RETRY_FAILED`）
pub async fn retry<T, E, F, Fut>(operation: F, max_attempts: u32) -> Result<T, UtilityError>
where
   F: FnMut() -> Fut,
   Fut: Future<Output = Result<T, E>>,
   E: Into<Failure>,
{
   retry_with_policy(
      RetryPolicy::new(max_attempts, DEFAULT_BASE_DELAY),
      operation,
      tokio::time::sleep,
   )
   .await
}

/// 方針と待機関数を指定してリトライする
pub async fn retry_with_policy<T, E, F, Fut, S, SleepFut>(
   policy: RetryPolicy,
   mut operation: F,
   mut sleep: S,
) -> Result<T, UtilityError>
where
   F: FnMut() -> Fut,
   Fut: Future<Output = Result<T, E>>,
   E: Into<Failure>,
   S: FnMut(Duration) -> SleepFut,
   SleepFut: Future<Output = ()>,
{
   if policy.max_attempts == 0 {
      let err = UtilityError::new(
         UtilityErrorCode::RetryInvalidAttempts,
         "max_attempts must be a positive integer",
      );
      err.log();
      return Err(err);
   }

   let mut attempt = 1;
   loop {
      let failure = match operation().await {
         Ok(value) => return Ok(value),
         Err(failure) => failure,
      };

      let err = UtilityError::classify(
         failure,
         UtilityErrorCode::RetryFailed,
         format!("Attempt {attempt} failed"),
      );
      err.log();

      if attempt >= policy.max_attempts {
         return Err(err);
      }

      let wait = policy.backoff(attempt);
      tracing::debug!(
         attempt,
         max_attempts = policy.max_attempts,
         delay_ms = delay_ms(wait),
         "リトライを待機"
      );
      sleep(wait).await;
      attempt += 1;
   }
}

/// ログ用のミリ秒表記（`u64` に収まらない場合は飽和させる）
fn delay_ms(wait: Duration) -> u64 {
   u64::try_from(wait.as_millis()).unwrap_or(u64::MAX)
}
