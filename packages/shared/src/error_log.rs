//! # エラーログ
//!
//! 分類済みの [`DomainError`] を構造化ログとして出力する。
//!
//! 出力先は `tracing` の ERROR レベル。フィールドはドット記法で、
//! JSON 出力ではフラットなキーになる:
//!
//! | フィールド | 内容 |
//! |-----------|------|
//! | `error.category` | ドメイン名（`auth`, `payments` など） |
//! | `error.kind` | エラーコード（`AUTH_FAILED` など） |
//! | `error.timestamp` | ログ出力時刻（RFC 3339） |
//! | `error.stack` | エラー生成時の SpanTrace（キャプチャできた場合のみ） |
//! | `error.cause` | 原因の表示文字列（ある場合のみ） |
//!
//! エラー処理の途中で呼ばれるため、ログ出力は失敗しない。
//! 同じエラー（とそのクローン）は一度だけ出力される。

use std::sync::atomic::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing_error::SpanTraceStatus;

use crate::error::{DomainError, ErrorCode};

/// エラーログの 1 レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
   pub timestamp: DateTime<Utc>,
   pub category:  &'static str,
   pub code:      &'static str,
   pub message:   String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub stack:     Option<String>,
}

impl LogEntry {
   /// エラーから現在時刻のログレコードを作成する
   pub fn from_error<C: ErrorCode>(error: &DomainError<C>) -> Self {
      let span_trace = error.span_trace();
      let stack = (span_trace.status() == SpanTraceStatus::CAPTURED)
         .then(|| span_trace.to_string())
         .filter(|stack| !stack.is_empty());

      Self {
         timestamp: Utc::now(),
         category: C::CATEGORY,
         code: error.code().as_str(),
         message: error.message().to_string(),
         stack,
      }
   }
}

impl<C: ErrorCode> DomainError<C> {
   /// エラーログを出力する
   ///
   /// 既に出力済みのエラーでは何もしない。
   pub fn log(&self) {
      if self.logged.swap(true, Ordering::AcqRel) {
         return;
      }

      let entry = LogEntry::from_error(self);
      let cause = self.cause().map(ToString::to_string);

      tracing::error!(
         error.category = entry.category,
         error.kind = entry.code,
         error.timestamp = %entry.timestamp.to_rfc3339(),
         error.stack = entry.stack.as_deref(),
         error.cause = cause.as_deref(),
         "{}",
         entry.message
      );
   }

   /// ログ出力済みかどうか
   pub fn is_logged(&self) -> bool {
      self.logged.load(Ordering::Acquire)
   }
}
