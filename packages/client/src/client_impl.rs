//! バックエンドへの HTTP クライアント実装の構造体

use crate::{auth::AuthClient, config::ClientConfig, payments::PaymentClient, user::UserClient};

/// バックエンド API クライアントトレイト（スーパートレイト）
///
/// 認証・決済・ユーザーの各サブトレイトを束ねる。
/// テスト時にはサブトレイト単位でスタブを使用できる。
pub trait BackendClient: AuthClient + PaymentClient + UserClient {}

impl<T> BackendClient for T where T: AuthClient + PaymentClient + UserClient {}

/// バックエンド API クライアント実装
///
/// タイムアウトは設定しない。応答がないリクエストは完了するまで待つ。
#[derive(Debug, Clone)]
pub struct TollgateClient {
   pub(crate) base_url: String,
   pub(crate) client:   reqwest::Client,
}

impl TollgateClient {
   /// 新しいクライアントを作成する
   ///
   /// # 引数
   ///
   /// - `base_url`: バックエンドのベース URL（例: `http://localhost:8080`）
   pub fn new(base_url: &str) -> Self {
      Self {
         base_url: base_url.trim_end_matches('/').to_string(),
         client:   reqwest::Client::new(),
      }
   }

   /// 設定からクライアントを作成する
   pub fn from_config(config: &ClientConfig) -> Self {
      Self::new(&config.base_url)
   }

   /// ベース URL を取得する
   pub fn base_url(&self) -> &str {
      &self.base_url
   }

   /// パスをベース URL に結合する
   pub(crate) fn url(&self, path: &str) -> String {
      format!("{}{}", self.base_url, path)
   }
}

/// パスセグメントに埋め込む値をパーセントエンコードする
pub(crate) fn path_segment(value: &str) -> String {
   urlencoding::encode(value).into_owned()
}
