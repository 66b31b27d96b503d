//! Tests for Authenticator: consent, token cache reuse and refresh against a mocked
//! token endpoint.

use std::fs;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use gd_link::error::DriveError;
use gd_link::Authenticator;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use tempfile::TempDir;
use yup_oauth2::authenticator_delegate::InstalledFlowDelegate;

type PresentFuture<'a> = Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;

/// Plays the user's browser: follows the consent URL's redirect with a fixed code.
struct RedirectingDelegate {
    code: &'static str,
}

impl InstalledFlowDelegate for RedirectingDelegate {
    fn present_user_url<'a>(&'a self, url: &'a str, _need_code: bool) -> PresentFuture<'a> {
        let code = self.code;
        Box::pin(async move {
            let url = reqwest::Url::parse(url).map_err(|e| e.to_string())?;
            let redirect_uri = url
                .query_pairs()
                .find(|(key, _)| key == "redirect_uri")
                .map(|(_, value)| value.into_owned())
                .ok_or_else(|| "consent URL has no redirect_uri".to_string())?;

            tokio::spawn(async move {
                let callback = format!("{}/?code={}", redirect_uri.trim_end_matches('/'), code);
                let _ = reqwest::get(callback).await;
            });
            Ok(String::new())
        })
    }
}

/// Fails the flow if consent is ever requested.
struct RefusingDelegate;

impl InstalledFlowDelegate for RefusingDelegate {
    fn present_user_url<'a>(&'a self, _url: &'a str, _need_code: bool) -> PresentFuture<'a> {
        Box::pin(async { Err("consent was not expected".to_string()) })
    }
}

fn write_client_secret(dir: &Path, server: &ServerGuard) {
    let secret = json!({
        "installed": {
            "client_id": "client-id",
            "client_secret": "client-secret",
            "auth_uri": format!("{}/auth", server.url()),
            "token_uri": format!("{}/token", server.url()),
            "redirect_uris": ["http://localhost"]
        }
    });
    fs::write(dir.join("credentials.json"), secret.to_string()).unwrap();
}

fn authenticator(dir: &Path) -> Authenticator {
    Authenticator::new(dir.join("credentials.json"), dir.join("token.json"))
}

async fn mock_code_exchange(server: &mut ServerGuard, expires_in: u64) -> Mock {
    server
        .mock("POST", "/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("grant_type=authorization_code".into()),
            Matcher::Regex("code=abc".into()),
            Matcher::Regex("client_id=client-id".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "access_token": "fresh",
                "refresh_token": "refresh123",
                "token_type": "Bearer",
                "expires_in": expires_in
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await
}

mod consent {
    use super::*;

    #[tokio::test]
    async fn test_first_run_obtains_and_persists_token() {
        let mut server = Server::new_async().await;
        let exchange = mock_code_exchange(&mut server, 3599).await;
        let dir = TempDir::new().unwrap();
        write_client_secret(dir.path(), &server);

        let auth = authenticator(dir.path()).with_flow_delegate(RedirectingDelegate { code: "abc" });
        let access_token = auth.get_access_token().await.unwrap();

        assert_eq!(access_token, "fresh");
        exchange.assert_async().await;

        let cache = fs::read_to_string(dir.path().join("token.json")).unwrap();
        assert!(cache.contains("fresh"));
        assert!(cache.contains("refresh123"));
        assert!(cache.contains("https://www.googleapis.com/auth/drive"));
    }

    #[tokio::test]
    async fn test_malformed_cache_is_replaced() {
        let mut server = Server::new_async().await;
        let _exchange = mock_code_exchange(&mut server, 3599).await;
        let dir = TempDir::new().unwrap();
        write_client_secret(dir.path(), &server);
        fs::write(dir.path().join("token.json"), "not valid json").unwrap();

        let auth = authenticator(dir.path()).with_flow_delegate(RedirectingDelegate { code: "abc" });
        let access_token = auth.get_access_token().await.unwrap();

        assert_eq!(access_token, "fresh");
        let cache = fs::read_to_string(dir.path().join("token.json")).unwrap();
        assert!(cache.contains("fresh"));
    }

    #[tokio::test]
    async fn test_stray_connection_does_not_block_redirect() {
        let mut server = Server::new_async().await;
        let _exchange = mock_code_exchange(&mut server, 3599).await;
        let dir = TempDir::new().unwrap();
        write_client_secret(dir.path(), &server);

        /// Opens an idle connection and sends garbage to the redirect listener first.
        struct NoisyDelegate(RedirectingDelegate);

        impl InstalledFlowDelegate for NoisyDelegate {
            fn present_user_url<'a>(&'a self, url: &'a str, need_code: bool) -> PresentFuture<'a> {
                Box::pin(async move {
                    let parsed = reqwest::Url::parse(url).map_err(|e| e.to_string())?;
                    let redirect = parsed
                        .query_pairs()
                        .find(|(key, _)| key == "redirect_uri")
                        .and_then(|(_, value)| reqwest::Url::parse(&value).ok())
                        .ok_or_else(|| "consent URL has no redirect_uri".to_string())?;
                    let addr = format!(
                        "{}:{}",
                        redirect.host_str().unwrap_or("127.0.0.1"),
                        redirect.port().unwrap_or(80)
                    );

                    let idle = tokio::net::TcpStream::connect(&addr).await.map_err(|e| e.to_string())?;
                    let mut garbage =
                        tokio::net::TcpStream::connect(&addr).await.map_err(|e| e.to_string())?;
                    tokio::io::AsyncWriteExt::write_all(&mut garbage, &[0xff, 0xfe, b'\n'])
                        .await
                        .map_err(|e| e.to_string())?;
                    drop(garbage);
                    tokio::spawn(async move {
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        drop(idle);
                    });

                    self.0.present_user_url(url, need_code).await
                })
            }
        }

        let auth = authenticator(dir.path())
            .with_flow_delegate(NoisyDelegate(RedirectingDelegate { code: "abc" }));
        let access_token = tokio::time::timeout(
            std::time::Duration::from_secs(3),
            auth.get_access_token(),
        )
        .await
        .expect("consent flow stalled")
        .unwrap();

        assert_eq!(access_token, "fresh");
    }

    #[tokio::test]
    async fn test_missing_client_secret() {
        let dir = TempDir::new().unwrap();

        let err = authenticator(dir.path()).get_access_token().await.unwrap_err();

        assert!(matches!(err, DriveError::Io(_)));
        assert!(!dir.path().join("token.json").exists());
    }

    #[tokio::test]
    async fn test_rejected_code_exchange() {
        let mut server = Server::new_async().await;
        let _exchange = server
            .mock("POST", "/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(json!({"error": "invalid_grant"}).to_string())
            .create_async()
            .await;
        let dir = TempDir::new().unwrap();
        write_client_secret(dir.path(), &server);

        let auth = authenticator(dir.path()).with_flow_delegate(RedirectingDelegate { code: "abc" });
        let err = auth.get_access_token().await.unwrap_err();

        assert!(matches!(err, DriveError::OAuth(_)));
    }
}

mod token_cache {
    use super::*;

    #[tokio::test]
    async fn test_valid_token_is_reused_without_consent() {
        let mut server = Server::new_async().await;
        let exchange = mock_code_exchange(&mut server, 3599).await;
        let dir = TempDir::new().unwrap();
        write_client_secret(dir.path(), &server);

        authenticator(dir.path())
            .with_flow_delegate(RedirectingDelegate { code: "abc" })
            .get_access_token()
            .await
            .unwrap();

        let access_token = authenticator(dir.path())
            .with_flow_delegate(RefusingDelegate)
            .get_access_token()
            .await
            .unwrap();

        assert_eq!(access_token, "fresh");
        exchange.assert_async().await;
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_and_persisted() {
        let mut server = Server::new_async().await;
        // Already inside the expiry margin when the next run loads it.
        let _exchange = mock_code_exchange(&mut server, 30).await;
        let refresh = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("grant_type=refresh_token".into()),
                Matcher::Regex("refresh_token=refresh123".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "access_token": "refreshed",
                    "token_type": "Bearer",
                    "expires_in": 3599
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;
        let dir = TempDir::new().unwrap();
        write_client_secret(dir.path(), &server);

        authenticator(dir.path())
            .with_flow_delegate(RedirectingDelegate { code: "abc" })
            .get_access_token()
            .await
            .unwrap();

        let access_token = authenticator(dir.path())
            .with_flow_delegate(RefusingDelegate)
            .get_access_token()
            .await
            .unwrap();

        assert_eq!(access_token, "refreshed");
        refresh.assert_async().await;
        let cache = fs::read_to_string(dir.path().join("token.json")).unwrap();
        assert!(cache.contains("refreshed"));
    }
}
