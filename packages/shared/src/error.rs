//! # ドメインエラー基盤
//!
//! auth / payments / user / api / utils の各ドメインで共通に使う、コード付きエラー型と
//! 分類（classification）のロジックを提供する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + kind パターンを採用:
//! - [`ErrorCode`]: ドメインごとの閉じたコード集合（`enum`）が実装するトレイト
//! - [`DomainError`]: コード・メッセージ・原因・[`SpanTrace`] を保持するジェネリックなエラー
//! - [`Failure`]: 分類の入力。エラー型として表現できる失敗と、そうでない任意の値を区別する
//!
//! ## 分類ルール
//!
//! [`DomainError::classify`] は次の順に判定する:
//!
//! 1. 同じドメインの `DomainError` ならそのまま返す（二重ラップしない）
//! 2. その他のエラーなら、そのメッセージとフォールバックコードで新しいエラーを作り、元のエラーを原因に持つ
//! 3. エラーでない値なら、フォールバックメッセージとフォールバックコードで作り、値を原因に持つ
//!
//! ```
//! use tollgate_shared::{DomainError, Failure, define_error_code};
//!
//! define_error_code! {
//!     enum DemoCode("demo", "DemoError") {
//!         Broken => "DEMO_BROKEN",
//!     }
//! }
//!
//! let err = DomainError::classify(Failure::opaque(42), DemoCode::Broken, "demo failed");
//! assert_eq!(err.code(), DemoCode::Broken);
//! assert_eq!(err.message(), "demo failed");
//! ```

use std::{
   error::Error as StdError,
   fmt,
   sync::{Arc, atomic::AtomicBool},
};

use derive_more::Display;
use serde::{Serialize, Serializer, ser::SerializeStruct};
use tracing_error::SpanTrace;

/// 任意のエラーを保持するボックス型
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// ドメインごとのエラーコード集合
///
/// 各ドメインは閉じた `enum` でこのトレイトを実装する。
/// コード文字列は SCREAMING_SNAKE_CASE で、ログや API レスポンスに出力される安定した値。
pub trait ErrorCode: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
   /// ドメイン名（ログの `error.category` に出力）
   const CATEGORY: &'static str;

   /// エラー型の名前（`AuthError` など）
   const ERROR_NAME: &'static str;

   /// 安定したコード文字列を返す
   fn as_str(self) -> &'static str;
}

/// エラーの原因
#[derive(Clone)]
pub enum Cause {
   /// エラー型として表現できる原因
   Error(Arc<dyn StdError + Send + Sync>),
   /// エラー型ではない外部由来の値
   Opaque(Arc<dyn fmt::Debug + Send + Sync>),
}

impl Cause {
   /// 原因がエラー型の場合、指定した型へのダウンキャストを試みる
   pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
      match self {
         Self::Error(err) => err.downcast_ref::<E>(),
         Self::Opaque(_) => None,
      }
   }
}

impl fmt::Debug for Cause {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Self::Error(err) => f.debug_tuple("Error").field(err).finish(),
         Self::Opaque(value) => f.debug_tuple("Opaque").field(value).finish(),
      }
   }
}

impl fmt::Display for Cause {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Self::Error(err) => write!(f, "{err}"),
         Self::Opaque(value) => write!(f, "{value:?}"),
      }
   }
}

/// 分類前の失敗値
///
/// `?` で任意のエラー型から変換できる。エラー型でない値は [`Failure::opaque`] で包む。
#[derive(Debug)]
pub enum Failure {
   /// エラー型として表現できる失敗
   Error(BoxError),
   /// エラー型ではない任意の値
   Opaque(Arc<dyn fmt::Debug + Send + Sync>),
}

impl Failure {
   /// エラー（またはボックス化済みのエラー、メッセージ文字列）から作成する
   pub fn error(err: impl Into<BoxError>) -> Self {
      Self::Error(err.into())
   }

   /// エラー型ではない値から作成する
   pub fn opaque<T: fmt::Debug + Send + Sync + 'static>(value: T) -> Self {
      Self::Opaque(Arc::new(value))
   }
}

impl<E: StdError + Send + Sync + 'static> From<E> for Failure {
   fn from(err: E) -> Self {
      Self::Error(Box::new(err))
   }
}

/// ドメイン固有のコード付きエラー
///
/// 生成時点のスパン情報（[`SpanTrace`]）を自動的にキャプチャする。
/// クローンはログ済みフラグを共有するため、同じエラーが二重にログ出力されることはない。
#[derive(Clone, Display)]
#[display("{message}")]
pub struct DomainError<C: ErrorCode> {
   code:              C,
   message:           String,
   cause:             Option<Cause>,
   span_trace:        SpanTrace,
   pub(crate) logged: Arc<AtomicBool>,
}

impl<C: ErrorCode> DomainError<C> {
   /// 原因を持たないエラーを作成する
   pub fn new(code: C, message: impl Into<String>) -> Self {
      Self::build(code, message.into(), None)
   }

   /// 原因付きのエラーを作成する
   pub fn with_cause(code: C, message: impl Into<String>, cause: Cause) -> Self {
      Self::build(code, message.into(), Some(cause))
   }

   fn build(code: C, message: String, cause: Option<Cause>) -> Self {
      Self {
         code,
         message,
         cause,
         span_trace: SpanTrace::capture(),
         logged: Arc::new(AtomicBool::new(false)),
      }
   }

   /// 任意の失敗値をこのドメインのエラーに分類する
   ///
   /// 同じドメインのエラーは変更せずに返す（冪等）。
   pub fn classify(
      failure: impl Into<Failure>,
      fallback_code: C,
      fallback_message: impl Into<String>,
   ) -> Self {
      match failure.into() {
         Failure::Error(err) => match err.downcast::<Self>() {
            Ok(same) => *same,
            Err(other) => {
               let message = other.to_string();
               Self::build(fallback_code, message, Some(Cause::Error(Arc::from(other))))
            }
         },
         Failure::Opaque(value) => Self::build(
            fallback_code,
            fallback_message.into(),
            Some(Cause::Opaque(value)),
         ),
      }
   }

   /// エラーコードを取得する
   pub fn code(&self) -> C {
      self.code
   }

   /// メッセージを取得する
   pub fn message(&self) -> &str {
      &self.message
   }

   /// 原因を取得する
   pub fn cause(&self) -> Option<&Cause> {
      self.cause.as_ref()
   }

   /// SpanTrace を取得する
   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }
}

impl<C: ErrorCode> fmt::Debug for DomainError<C> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct(C::ERROR_NAME)
         .field("code", &self.code.as_str())
         .field("message", &self.message)
         .field("cause", &self.cause)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl<C: ErrorCode> StdError for DomainError<C> {
   fn source(&self) -> Option<&(dyn StdError + 'static)> {
      match &self.cause {
         Some(Cause::Error(err)) => {
            let err: &(dyn StdError + 'static) = err.as_ref();
            Some(err)
         }
         _ => None,
      }
   }
}

impl<C: ErrorCode> Serialize for DomainError<C> {
   fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
      let mut state = serializer.serialize_struct(C::ERROR_NAME, 2)?;
      state.serialize_field("code", self.code.as_str())?;
      state.serialize_field("message", &self.message)?;
      state.end()
   }
}

/// `Result` のエラーを境界で分類するための拡張トレイト
pub trait ClassifyExt<T> {
   /// エラーを分類する（ログ出力はしない）
   fn classify_err<C: ErrorCode>(self, code: C, message: &str) -> Result<T, DomainError<C>>;

   /// エラーを分類してログ出力する
   ///
   /// 呼び出し境界で一度だけ使う。
   fn classify_and_log<C: ErrorCode>(self, code: C, message: &str)
   -> Result<T, DomainError<C>>;
}

impl<T, E: Into<Failure>> ClassifyExt<T> for Result<T, E> {
   fn classify_err<C: ErrorCode>(self, code: C, message: &str) -> Result<T, DomainError<C>> {
      self.map_err(|err| DomainError::classify(err, code, message))
   }

   fn classify_and_log<C: ErrorCode>(
      self,
      code: C,
      message: &str,
   ) -> Result<T, DomainError<C>> {
      self.map_err(|err| {
         let err = DomainError::classify(err, code, message);
         err.log();
         err
      })
   }
}
