//! 決済クライアントの統合テスト

mod common;

use pretty_assertions::assert_eq;
use tollgate_client::{PaymentClient, PaymentErrorCode, TollgateClient, payments::PaymentStatus};

#[tokio::test]
async fn test_決済が完了する() {
   let server = common::start().await;
   let client = TollgateClient::new(&server.base_url);

   let payment = client.process_payment("u-1", 49.99, "eur").await.unwrap();

   assert_eq!(payment.id, "p-1");
   assert_eq!(payment.currency, "eur");
   assert_eq!(payment.status, PaymentStatus::Completed);
   assert!((payment.amount - 49.99).abs() < 1e-9);
}

#[tokio::test]
async fn test_上限を超える決済はdeclined() {
   let server = common::start().await;
   let client = TollgateClient::new(&server.base_url);

   let err = client
      .process_payment("u-1", common::DECLINE_ABOVE + 1.0, "USD")
      .await
      .unwrap_err();

   assert_eq!(err.code(), PaymentErrorCode::Declined);
   assert_eq!(err.message(), "Payment processing failed");
}

#[tokio::test]
async fn test_不正な金額はリクエストを送らない() {
   let server = common::start().await;
   let client = TollgateClient::new(&server.base_url);

   let err = client.process_payment("u-1", -1.0, "USD").await.unwrap_err();

   assert_eq!(err.code(), PaymentErrorCode::InvalidRequest);
   assert_eq!(server.total_hits(), 0);
}

#[tokio::test]
async fn test_返金できる() {
   let server = common::start().await;
   let client = TollgateClient::new(&server.base_url);

   let payment = client.refund_payment("p-1").await.unwrap();

   assert_eq!(payment.id, "p-1");
   assert_eq!(payment.status, PaymentStatus::Pending);
}

#[tokio::test]
async fn test_決済idはパスセグメントとしてエンコードされる() {
   let server = common::start().await;
   let client = TollgateClient::new(&server.base_url);

   let payment = client.refund_payment("p/2 x").await.unwrap();

   assert_eq!(payment.id, "p/2 x");
   assert_eq!(server.hits("POST /api/payments/p/2 x/refund"), 1);
}

#[tokio::test]
async fn test_存在しない決済の返金はrefund_failed() {
   let server = common::start().await;
   let client = TollgateClient::new(&server.base_url);

   let err = client.refund_payment("p-missing").await.unwrap_err();

   assert_eq!(err.code(), PaymentErrorCode::RefundFailed);
   assert_eq!(err.message(), "Payment refund failed");
}

#[tokio::test]
async fn test_返金レスポンスが壊れているとinvalid_response() {
   let server = common::start().await;
   let client = TollgateClient::new(&server.base_url);

   let err = client.refund_payment("p-garbled").await.unwrap_err();

   assert_eq!(err.code(), PaymentErrorCode::InvalidResponse);
}

#[tokio::test]
async fn test_接続できない決済はnetwork_error() {
   let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
   let addr = listener.local_addr().unwrap();
   drop(listener);
   let client = TollgateClient::new(&format!("http://{addr}"));

   let err = client.process_payment("u-1", 10.0, "USD").await.unwrap_err();

   assert_eq!(err.code(), PaymentErrorCode::NetworkError);
}
