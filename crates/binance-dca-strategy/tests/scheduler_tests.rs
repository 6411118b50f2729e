/*
[INPUT]:  Mock exchange responses and temporary rule files
[OUTPUT]: Test results for the recurring scheduling loop
[POS]:    Integration tests - scheduler end to end
[UPDATE]: When scheduling or persistence behavior changes
*/

use std::time::Duration;

use binance_dca_strategy::config::{Amount, PurchaseRule, RuleBook};
use binance_dca_strategy::{SchedulerLoop, StateStore};

use binance_dca_adapter::{BinanceClient, ClientConfig, Credentials, Side};
use rust_decimal::Decimal;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_against(server: &MockServer) -> BinanceClient {
    let mut client =
        BinanceClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client against mock server");
    client.set_credentials(Credentials::new("test-api-key", "test-api-secret"));
    client
}

fn rule(interval_seconds: u64, last_executed_at: f64) -> PurchaseRule {
    PurchaseRule {
        symbol: "BTCUSDT".to_string(),
        side: Side::Buy,
        amount: Amount::Fixed(Decimal::from(25)),
        interval_seconds,
        last_executed_at,
    }
}

async fn mount_metadata(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v3/exchangeInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"symbols": [{"symbol": "BTCUSDT", "filters": [
                {"filterType": "LOT_SIZE", "minQty": "0.00001000",
                 "maxQty": "9000.00000000", "stepSize": "0.00001000"}]}]}"#,
            "application/json",
        ))
        .mount(server)
        .await;
}

async fn mount_account(server: &MockServer, usdt_free: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v3/account"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"{{"balances": [{{"asset": "USDT", "free": "{usdt_free}", "locked": "0.00000000"}}]}}"#
            ),
            "application/json",
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_due_rule_fills_and_persists_timestamp() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_account(&server, "50.00000000").await;

    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"symbol": "BTCUSDT", "orderId": 1, "status": "FILLED"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("tickers.json"));
    let book = RuleBook {
        tickers: vec![rule(3600, 0.0)],
    };
    store.persist(&book).await.unwrap();

    let reload = StateStore::new(store.path().to_path_buf());
    let mut scheduler = SchedulerLoop::new(
        client_against(&server),
        store,
        book,
        Duration::from_secs(10),
        CancellationToken::new(),
    );

    let now = 1_700_000_000.0;
    scheduler.scan_once(now).await.unwrap();

    let doc = reload.load_document().await.unwrap();
    assert_eq!(doc["tickers"][0]["last_purchase_time"], now);
}

#[tokio::test]
async fn test_rule_within_interval_is_skipped() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_account(&server, "50.00000000").await;

    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("tickers.json"));
    let now = 1_700_000_000.0;
    let book = RuleBook {
        tickers: vec![rule(3600, now - 100.0)],
    };
    store.persist(&book).await.unwrap();

    let mut scheduler = SchedulerLoop::new(
        client_against(&server),
        store,
        book,
        Duration::from_secs(10),
        CancellationToken::new(),
    );

    scheduler.scan_once(now).await.unwrap();
}

#[tokio::test]
async fn test_rejected_order_leaves_state_unchanged() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_account(&server, "50.00000000").await;

    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(400).set_body_raw(
            r#"{"code": -1013, "msg": "Filter failure: NOTIONAL"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("tickers.json"));
    let book = RuleBook {
        tickers: vec![rule(3600, 0.0)],
    };
    store.persist(&book).await.unwrap();

    let reload = StateStore::new(store.path().to_path_buf());
    let mut scheduler = SchedulerLoop::new(
        client_against(&server),
        store,
        book,
        Duration::from_secs(10),
        CancellationToken::new(),
    );

    scheduler.scan_once(1_700_000_000.0).await.unwrap();

    // The timestamp update happens only on a fill.
    let doc = reload.load_document().await.unwrap();
    assert_eq!(doc["tickers"][0]["last_purchase_time"], 0.0);
}

#[tokio::test]
async fn test_insufficient_funds_skips_submission() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_account(&server, "1.00000000").await;

    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("tickers.json"));
    let book = RuleBook {
        tickers: vec![rule(3600, 0.0)],
    };
    store.persist(&book).await.unwrap();

    let reload = StateStore::new(store.path().to_path_buf());
    let mut scheduler = SchedulerLoop::new(
        client_against(&server),
        store,
        book,
        Duration::from_secs(10),
        CancellationToken::new(),
    );

    scheduler.scan_once(1_700_000_000.0).await.unwrap();

    let doc = reload.load_document().await.unwrap();
    assert_eq!(doc["tickers"][0]["last_purchase_time"], 0.0);
}

#[tokio::test]
async fn test_cancellation_suppresses_new_submissions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/exchangeInfo"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("tickers.json"));
    let book = RuleBook {
        tickers: vec![rule(0, 0.0)],
    };
    store.persist(&book).await.unwrap();

    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let mut scheduler = SchedulerLoop::new(
        client_against(&server),
        store,
        book,
        Duration::from_secs(10),
        shutdown,
    );

    scheduler.scan_once(1_700_000_000.0).await.unwrap();
}

#[tokio::test]
async fn test_run_exits_promptly_on_cancellation() {
    let server = MockServer::start().await;
    mount_metadata(&server).await;
    mount_account(&server, "50.00000000").await;

    Mock::given(method("POST"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"symbol": "BTCUSDT", "orderId": 1, "status": "FILLED"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = StateStore::new(dir.path().join("tickers.json"));
    let book = RuleBook {
        tickers: vec![rule(3600, 0.0)],
    };
    store.persist(&book).await.unwrap();

    let shutdown = CancellationToken::new();
    let scheduler = SchedulerLoop::new(
        client_against(&server),
        store,
        book,
        Duration::from_secs(3600),
        shutdown.clone(),
    );

    let handle = tokio::spawn(scheduler.run());
    tokio::time::sleep(Duration::from_millis(200)).await;
    shutdown.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler should exit before the sleep quantum elapses")
        .expect("join");
    result.unwrap();
}
