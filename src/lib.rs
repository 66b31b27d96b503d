//! gd_link - Share files from a locally synced Google Drive folder.
//!
//! Given a path inside the local Drive folder, this library:
//! - Authenticates against the Drive API (cached token, refresh, or browser consent)
//! - Resolves the path to a Drive file ID by walking its segments from the root
//! - Creates a writer permission for the configured email, or a reader permission
//!   for anyone with the link
//! - Returns the file's web view link
//!
//! # Example
//!
//! ```no_run
//! use gd_link::{share_link, Audience, AppPaths, Authenticator, Config, DriveTarget};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let paths = AppPaths::new("/opt/gd_link");
//!     let config = Config::load(&paths.config)?;
//!     let target = DriveTarget::new(&config, "/home/u/Drive/Docs/report.pdf")?;
//!
//!     let service = Authenticator::new(&paths.credentials, &paths.token)
//!         .get_service()
//!         .await?;
//!     let link = share_link(&service, &target, &Audience::Open).await?;
//!     println!("{}", link);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod permission;
pub mod resolver;
pub mod service;
pub mod share;

// Re-exports for convenience
pub use auth::Authenticator;
pub use client::DriveClient;
pub use config::{AppPaths, Config};
pub use error::{DriveError, Result};
pub use permission::{Audience, Permission};
pub use resolver::{resolve_id, DriveTarget};
pub use service::DriveService;
pub use share::share_link;
