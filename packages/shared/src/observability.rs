//! # ログ出力の初期化
//!
//! `tollgate` バイナリが起動時に一度だけ呼ぶ。出力先は stderr で、
//! 標準出力はコマンド結果の JSON 専用にしておく。
//! `ErrorLayer` を登録するので、スパン内で生成した
//! [`DomainError`](crate::DomainError) はエラーログの `error.stack` を持つ。

/// ログ出力形式（`LOG_FORMAT`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
   /// 1 行 1 レコードの JSON
   Json,
   /// 端末向けのテキスト
   #[default]
   Pretty,
}

impl LogFormat {
   /// `LOG_FORMAT` の値を解釈する
   ///
   /// 未設定なら `Pretty`。`json` / `pretty` 以外は警告を出して `Pretty` にする。
   pub fn from_value(value: Option<&str>) -> Self {
      match value {
         None | Some("pretty") => Self::Pretty,
         Some("json") => Self::Json,
         Some(other) => {
            eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
            Self::Pretty
         }
      }
   }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
   /// ルートスパン `app` の `service` フィールド
   pub service_name: String,
   pub log_format:   LogFormat,
}

impl TracingConfig {
   /// プロセスの環境変数から組み立てる
   pub fn from_env(service_name: impl Into<String>) -> Self {
      Self::from_lookup(service_name, |name| std::env::var(name).ok())
   }

   /// 任意の参照関数から組み立てる
   pub fn from_lookup(
      service_name: impl Into<String>,
      lookup: impl Fn(&str) -> Option<String>,
   ) -> Self {
      Self {
         service_name: service_name.into(),
         log_format:   LogFormat::from_value(lookup("LOG_FORMAT").as_deref()),
      }
   }
}

/// グローバル subscriber を登録する
///
/// フィルタは `RUST_LOG`、未設定なら `info,tollgate=debug`。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
   use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

   let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| "info,tollgate=debug".into());

   let fmt_layer = match config.log_format {
      LogFormat::Json => tracing_subscriber::fmt::layer()
         .json()
         .flatten_event(true)
         .with_target(true)
         .with_current_span(true)
         .with_span_list(false)
         .with_writer(std::io::stderr)
         .boxed(),
      LogFormat::Pretty => tracing_subscriber::fmt::layer()
         .with_writer(std::io::stderr)
         .boxed(),
   };

   tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt_layer)
      .with(tracing_error::ErrorLayer::default())
      .init();
}
