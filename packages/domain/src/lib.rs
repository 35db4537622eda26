//! # Tollgate ドメインモデル
//!
//! バックエンド API がやり取りするデータ構造と、ネットワークを伴わない純粋なルールを定義する。
//!
//! ## モジュール構成
//!
//! - [`user`] - 認証ユーザー、パスワードポリシー
//! - [`payment`] - 決済、手数料計算
//! - [`profile`] - ユーザープロフィール、メールアドレス形式

pub mod payment;
pub mod profile;
pub mod user;

pub use payment::{Payment, PaymentRequest, PaymentStatus, calculate_fee};
pub use profile::{EMAIL_PATTERN, UserProfile, UserProfileUpdate, is_valid_email};
pub use user::{MIN_PASSWORD_LENGTH, User, validate_password};
