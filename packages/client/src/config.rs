//! # クライアント設定
//!
//! 環境変数からバックエンドの接続先とリトライ方針を読み込む。

use std::{env, time::Duration};

use thiserror::Error;

use crate::utils::RetryPolicy;

/// 既定の最大試行回数
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;

/// 既定のバックオフ基準時間（ミリ秒）
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   /// 必須の環境変数が未設定
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   /// 値をパースできない
   #[error("{name} の値が不正です: {value:?}")]
   Invalid { name: &'static str, value: String },
}

/// クライアント設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
   /// バックエンドのベース URL（例: `http://localhost:8080`）
   pub base_url: String,
   /// リトライ方針
   pub retry:    RetryPolicy,
}

impl ClientConfig {
   /// 環境変数から設定を読み込む
   ///
   /// - `TOLLGATE_BASE_URL`（必須）
   /// - `TOLLGATE_RETRY_MAX_ATTEMPTS`（既定: 3）
   /// - `TOLLGATE_RETRY_BASE_DELAY_MS`（既定: 1000）
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の読み取り関数から設定を組み立てる
   ///
   /// テストでプロセスの環境変数を汚さないために分離している。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let base_url = lookup("TOLLGATE_BASE_URL")
         .filter(|value| !value.trim().is_empty())
         .ok_or(ConfigError::Missing("TOLLGATE_BASE_URL"))?;

      let max_attempts = parse_or(
         &lookup,
         "TOLLGATE_RETRY_MAX_ATTEMPTS",
         DEFAULT_RETRY_MAX_ATTEMPTS,
      )?;
      let base_delay_ms = parse_or(
         &lookup,
         "TOLLGATE_RETRY_BASE_DELAY_MS",
         DEFAULT_RETRY_BASE_DELAY_MS,
      )?;

      Ok(Self {
         base_url,
         retry: RetryPolicy::new(max_attempts, Duration::from_millis(base_delay_ms)),
      })
   }
}

fn parse_or<T: std::str::FromStr>(
   lookup: &impl Fn(&str) -> Option<String>,
   name: &'static str,
   default: T,
) -> Result<T, ConfigError> {
   match lookup(name) {
      None => Ok(default),
      Some(value) => value
         .trim()
         .parse()
         .map_err(|_| ConfigError::Invalid { name, value }),
   }
}
