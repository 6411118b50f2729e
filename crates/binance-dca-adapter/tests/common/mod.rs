/*
[INPUT]:  Test configuration needs
[OUTPUT]: Shared helpers for adapter integration tests
[POS]:    Integration test support
[UPDATE]: When test setup changes
*/

use binance_dca_adapter::{BinanceClient, ClientConfig, Credentials};
use wiremock::MockServer;

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_credentials() -> Credentials {
    Credentials::new("test-api-key", "test-api-secret")
}

pub fn client_against(server: &MockServer) -> BinanceClient {
    let mut client =
        BinanceClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init");
    client.set_credentials(test_credentials());
    client
}
