//! # Tollgate CLI
//!
//! バックエンド API を呼び出すコマンドラインクライアント。
//! 1 回の起動で 1 つのサブコマンドを実行し、結果を JSON で標準出力に書く。
//!
//! ## 環境変数
//!
//! `.env` ファイルがあれば読み込む。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `TOLLGATE_BASE_URL` | ネットワークを使うコマンドのみ | バックエンドのベース URL |
//! | `TOLLGATE_RETRY_MAX_ATTEMPTS` | No | `profile` の最大試行回数（デフォルト: 3） |
//! | `TOLLGATE_RETRY_BASE_DELAY_MS` | No | バックオフ基準時間（デフォルト: 1000） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログレベル（デフォルト: `info,tollgate=debug`） |
//!
//! ## 使用例
//!
//! ```bash
//! tollgate login --email alice@example.com --password secret
//! tollgate pay --user-id u-1 --amount 49.99 --currency EUR
//! tollgate request --method POST --endpoint /api/echo --body '{"n":1}'
//! tollgate format-currency --amount 1234.5 --currency JPY
//! ```
//!
//! 結果が `ok: false` の場合は終了コード 1 で終了する。

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use tollgate_shared::observability::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   let cli = Cli::parse();

   let tracing_config = TracingConfig::from_env("tollgate-cli");
   init_tracing(&tracing_config);
   let _tracing_guard =
      tracing::info_span!("app", service = %tracing_config.service_name).entered();

   let report = commands::run(cli.command).await?;
   println!("{}", serde_json::to_string_pretty(&report.body)?);

   Ok(if report.success {
      ExitCode::SUCCESS
   } else {
      ExitCode::FAILURE
   })
}
