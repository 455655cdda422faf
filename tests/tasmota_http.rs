// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the Tasmota HTTP plug using wiremock.

#![cfg(feature = "tasmota")]

use std::sync::Arc;
use std::time::Duration;

use psucontrol_plug::{
    ConnectionError, Connector, DeviceClient, DeviceError, HostShutdown, PluginConfig, PsuControl,
    TasmotaConnector,
};
use secrecy::SecretString;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

fn connector() -> TasmotaConnector {
    TasmotaConnector::new().with_timeout(Duration::from_secs(2))
}

async fn mount_power(server: &MockServer, cmnd: &str, state: &str) {
    Mock::given(method("GET"))
        .and(path("/cm"))
        .and(query_param("cmnd", cmnd))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "POWER": state
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Connecting
// ============================================================================

mod connect {
    use super::*;

    #[tokio::test]
    async fn connect_queries_power_with_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("cmnd", "Power"))
            .and(query_param("user", "admin"))
            .and(query_param("password", "s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "POWER": "ON"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let plug = connector()
            .connect(&server.uri(), "admin", &secret("s3cret"))
            .await
            .unwrap();

        assert!(plug.get_status().await.unwrap());
    }

    #[tokio::test]
    async fn password_without_username_authenticates_as_admin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("user", "admin"))
            .and(query_param("password", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "POWER": "OFF"
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .with_priority(2)
            .mount(&server)
            .await;

        let plug = connector()
            .connect(&server.uri(), "", &secret("secret"))
            .await
            .unwrap();

        assert!(!plug.get_status().await.unwrap());
    }

    #[tokio::test]
    async fn unauthorized_is_authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = connector()
            .connect(&server.uri(), "admin", &secret("wrong"))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ConnectionError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn server_error_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = connector()
            .connect(&server.uri(), "", &secret(""))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ConnectionError::Unreachable(_)));
    }

    #[tokio::test]
    async fn empty_address_is_rejected() {
        let err = connector()
            .connect("", "", &secret(""))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, ConnectionError::InvalidAddress(_)));
    }
}

// ============================================================================
// Device operations
// ============================================================================

mod operations {
    use super::*;

    #[tokio::test]
    async fn set_status_switches_relay() {
        let server = MockServer::start().await;
        mount_power(&server, "Power", "ON").await;
        mount_power(&server, "Power OFF", "OFF").await;

        let plug = connector()
            .connect(&server.uri(), "", &secret(""))
            .await
            .unwrap();

        plug.set_status(false).await.unwrap();
    }

    #[tokio::test]
    async fn set_status_rejects_unchanged_relay() {
        let server = MockServer::start().await;
        mount_power(&server, "Power", "OFF").await;
        mount_power(&server, "Power ON", "OFF").await;

        let plug = connector()
            .connect(&server.uri(), "", &secret(""))
            .await
            .unwrap();

        let err = plug.set_status(true).await.unwrap_err();
        assert!(matches!(err, DeviceError::CommandRejected(_)));
    }

    #[tokio::test]
    async fn unparseable_status_is_device_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("cmnd", "Power"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let plug = connector()
            .connect(&server.uri(), "", &secret(""))
            .await
            .unwrap();

        assert!(matches!(
            plug.get_status().await.unwrap_err(),
            DeviceError::Parse(_)
        ));
    }

    #[tokio::test]
    async fn delayed_off_is_sent_as_backlog() {
        let server = MockServer::start().await;
        mount_power(&server, "Power", "ON").await;
        Mock::given(method("GET"))
            .and(query_param("cmnd", "Backlog Delay 50; Power OFF"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Delay": 50
            })))
            .expect(1)
            .mount(&server)
            .await;

        let plug = connector()
            .connect(&server.uri(), "", &secret(""))
            .await
            .unwrap();

        plug.set_status_delayed(5).await.unwrap();
    }

    #[tokio::test]
    async fn oversized_delay_is_not_sent() {
        let server = MockServer::start().await;
        mount_power(&server, "Power", "ON").await;

        let plug = connector()
            .connect(&server.uri(), "", &secret(""))
            .await
            .unwrap();

        let err = plug.set_status_delayed(20_000).await.unwrap_err();
        assert!(matches!(err, DeviceError::InvalidDelay { seconds: 20_000, .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }
}

// ============================================================================
// Service over HTTP
// ============================================================================

mod service {
    use super::*;

    struct NoShutdown;

    impl HostShutdown for NoShutdown {
        fn shutdown(&self) {
            panic!("shutdown must not run");
        }
    }

    #[tokio::test]
    async fn delayed_power_off_then_cached_state() {
        let server = MockServer::start().await;
        mount_power(&server, "Power", "ON").await;
        Mock::given(method("GET"))
            .and(query_param("cmnd", "Backlog Delay 50; Power OFF"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("cmnd", "Power OFF"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "POWER": "OFF"
            })))
            .expect(0)
            .mount(&server)
            .await;

        let psu = PsuControl::builder(Arc::new(connector()))
            .config(
                PluginConfig::default()
                    .with_address(server.uri())
                    .with_credentials("u", "p")
                    .with_power_off_delay(5),
            )
            .shutdown(Arc::new(NoShutdown))
            .build();

        psu.power_off().await.unwrap();
        assert!(!psu.get_psu_state().await.unwrap());
    }
}
