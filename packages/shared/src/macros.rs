/// ドメインのエラーコード `enum` を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - `derive(Debug, Clone, Copy, PartialEq, Eq, Hash)` 付きの `enum`
/// - [`ErrorCode`](crate::ErrorCode) の実装（カテゴリ、エラー型名、コード文字列）
/// - `Display`（コード文字列を出力）
/// - `ALL`: 全コードのスライス
///
/// # 使用例
///
/// ```rust
/// use tollgate_shared::{ErrorCode, define_error_code};
///
/// define_error_code! {
///     /// 在庫ドメインのエラーコード
///     pub enum StockErrorCode("stock", "StockError") {
///         /// 在庫切れ
///         OutOfStock => "STOCK_OUT_OF_STOCK",
///         /// 通信失敗
///         Network => "STOCK_NETWORK_ERROR",
///     }
/// }
///
/// assert_eq!(StockErrorCode::OutOfStock.as_str(), "STOCK_OUT_OF_STOCK");
/// assert_eq!(StockErrorCode::Network.to_string(), "STOCK_NETWORK_ERROR");
/// assert_eq!(StockErrorCode::ALL.len(), 2);
/// ```
#[macro_export]
macro_rules! define_error_code {
   (
      $(#[$meta:meta])*
      $vis:vis enum $Name:ident($category:literal, $error_name:literal) {
         $(
            $(#[$variant_meta:meta])*
            $Variant:ident => $code:literal
         ),+ $(,)?
      }
   ) => {
      $(#[$meta])*
      #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
      $vis enum $Name {
         $(
            $(#[$variant_meta])*
            $Variant,
         )+
      }

      impl $Name {
         /// 全コード
         #[allow(dead_code)]
         pub const ALL: &'static [Self] = &[$(Self::$Variant),+];
      }

      impl $crate::ErrorCode for $Name {
         const CATEGORY: &'static str = $category;
         const ERROR_NAME: &'static str = $error_name;

         fn as_str(self) -> &'static str {
            match self {
               $(Self::$Variant => $code,)+
            }
         }
      }

      impl ::std::fmt::Display for $Name {
         fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
            f.write_str($crate::ErrorCode::as_str(*self))
         }
      }
   };
}
