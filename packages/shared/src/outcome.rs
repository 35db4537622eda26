//! # 成否エンベロープ
//!
//! 失敗を呼び出し元に伝播させず、値として返すための型。
//! JSON では `{ "ok": true, "data": T }` または `{ "ok": false, "error": E }` になる。

use serde::{Serialize, Serializer, ser::SerializeStruct};

/// 成功値または分類済みエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
   /// 成功
   Success(T),
   /// 失敗
   Failed(E),
}

impl<T, E> Outcome<T, E> {
   pub fn is_success(&self) -> bool {
      matches!(self, Self::Success(_))
   }

   /// 成功値への参照を取得する
   pub fn data(&self) -> Option<&T> {
      match self {
         Self::Success(data) => Some(data),
         Self::Failed(_) => None,
      }
   }

   /// エラーへの参照を取得する
   pub fn error(&self) -> Option<&E> {
      match self {
         Self::Success(_) => None,
         Self::Failed(error) => Some(error),
      }
   }

   pub fn into_result(self) -> Result<T, E> {
      self.into()
   }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
   fn from(result: Result<T, E>) -> Self {
      match result {
         Ok(data) => Self::Success(data),
         Err(error) => Self::Failed(error),
      }
   }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
   fn from(outcome: Outcome<T, E>) -> Self {
      match outcome {
         Outcome::Success(data) => Ok(data),
         Outcome::Failed(error) => Err(error),
      }
   }
}

impl<T: Serialize, E: Serialize> Serialize for Outcome<T, E> {
   fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
      let mut state = serializer.serialize_struct("Outcome", 2)?;
      match self {
         Self::Success(data) => {
            state.serialize_field("ok", &true)?;
            state.serialize_field("data", data)?;
         }
         Self::Failed(error) => {
            state.serialize_field("ok", &false)?;
            state.serialize_field("error", error)?;
         }
      }
      state.end()
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;
   use crate::{DomainError, error::test_codes::SampleCode};

   #[test]
   fn test_成功はokとdataにシリアライズされる() {
      let outcome: Outcome<&str, String> = Outcome::Success("hello");

      let json = serde_json::to_value(&outcome).unwrap();

      assert_eq!(json, serde_json::json!({ "ok": true, "data": "hello" }));
   }

   #[test]
   fn test_失敗はokとerrorにシリアライズされる() {
      let outcome: Outcome<(), DomainError<SampleCode>> =
         Outcome::Failed(DomainError::new(SampleCode::SampleFailed, "失敗"));

      let json = serde_json::to_value(&outcome).unwrap();

      assert_eq!(
         json,
         serde_json::json!({
            "ok": false,
            "error": { "code": "SAMPLE_FAILED", "message": "失敗" }
         })
      );
   }

   #[test]
   fn test_resultとの相互変換() {
      let outcome: Outcome<i32, String> = Ok(3).into();
      assert!(outcome.is_success());
      assert_eq!(outcome.data(), Some(&3));
      assert_eq!(outcome.into_result(), Ok(3));

      let outcome: Outcome<i32, String> = Err("x".to_string()).into();
      assert!(!outcome.is_success());
      assert_eq!(outcome.error().map(String::as_str), Some("x"));
   }
}
