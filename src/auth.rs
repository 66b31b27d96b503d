//! OAuth2 installed-application authentication for the Drive API.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use console::style;
use tracing::{debug, info, warn};
use yup_oauth2::authenticator_delegate::InstalledFlowDelegate;
use yup_oauth2::{InstalledFlowAuthenticator, InstalledFlowReturnMethod};

use crate::client::DriveClient;
use crate::error::{DriveError, Result};

/// Google Drive API scope (full access to the user's Drive).
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Obtains access tokens from the on-disk cache, a refresh, or the browser consent flow.
pub struct Authenticator {
    credentials_path: PathBuf,
    token_path: PathBuf,
    flow_delegate: Arc<dyn InstalledFlowDelegate>,
}

impl Authenticator {
    /// `credentials_path` is the client secret file, `token_path` the token cache.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(credentials_path: P, token_path: Q) -> Self {
        Self {
            credentials_path: credentials_path.as_ref().to_path_buf(),
            token_path: token_path.as_ref().to_path_buf(),
            flow_delegate: Arc::new(ConsoleFlowDelegate),
        }
    }

    /// Replace how the consent URL is presented to the user.
    pub fn with_flow_delegate<D: InstalledFlowDelegate + 'static>(mut self, delegate: D) -> Self {
        self.flow_delegate = Arc::new(delegate);
        self
    }

    /// Authenticate and build a Drive client.
    pub async fn get_service(&self) -> Result<DriveClient> {
        let token = self.get_access_token().await?;
        Ok(DriveClient::new(token))
    }

    /// Get a valid access token for the Drive scope.
    ///
    /// A cached token is reused while valid and refreshed once expired. Without a usable
    /// cache the browser consent flow runs. The token cache is rewritten whenever a new
    /// token is issued.
    pub async fn get_access_token(&self) -> Result<String> {
        let secret = yup_oauth2::read_application_secret(&self.credentials_path).await?;
        self.discard_malformed_cache();

        let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
            .persist_tokens_to_disk(self.token_path.clone())
            .flow_delegate(Box::new(SharedDelegate(Arc::clone(&self.flow_delegate))))
            .build()
            .await?;

        let token = auth.token(&[DRIVE_SCOPE]).await?;
        debug!(path = %self.token_path.display(), "access token ready");
        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| DriveError::AuthenticationError("no access token issued".to_string()))
    }

    /// Remove a token cache that is not JSON so the consent flow can replace it.
    fn discard_malformed_cache(&self) {
        let Ok(content) = fs::read_to_string(&self.token_path) else {
            return;
        };
        if let Err(e) = serde_json::from_str::<serde_json::Value>(&content) {
            warn!(path = %self.token_path.display(), error = %e, "discarding malformed token cache");
            if let Err(e) = fs::remove_file(&self.token_path) {
                warn!(path = %self.token_path.display(), error = %e, "could not remove token cache");
            }
        }
    }
}

/// Presents the consent URL on stderr, keeping stdout for the share link.
///
/// The browser is not opened automatically; the user follows the printed URL.
pub struct ConsoleFlowDelegate;

impl InstalledFlowDelegate for ConsoleFlowDelegate {
    fn present_user_url<'a>(
        &'a self,
        url: &'a str,
        need_code: bool,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<String, String>> + Send + 'a>> {
        Box::pin(async move {
            if need_code {
                return Err("manual code entry is not supported".to_string());
            }
            info!("waiting for OAuth consent");
            eprintln!(
                "Please visit this URL to authorize this application:\n\n{}\n",
                style(url).underlined()
            );
            Ok(String::new())
        })
    }
}

/// Lets one configured delegate serve every authenticator built from `Authenticator`.
struct SharedDelegate(Arc<dyn InstalledFlowDelegate>);

impl InstalledFlowDelegate for SharedDelegate {
    fn redirect_uri(&self) -> Option<&str> {
        self.0.redirect_uri()
    }

    fn present_user_url<'a>(
        &'a self,
        url: &'a str,
        need_code: bool,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<String, String>> + Send + 'a>> {
        self.0.present_user_url(url, need_code)
    }
}
