//! # Coursegate backend connector
//!
//! Async client for the REST services that sit behind the Coursegate
//! gateway: content, quizzes, progress, streaks, access checks and the
//! tier-gated adaptive/grading endpoints.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coursegate_backend::{BackendClient, BackendResult};
//!
//! #[tokio::main]
//! async fn main() -> BackendResult<()> {
//!     let client = BackendClient::builder()
//!         .base_url("http://127.0.0.1:8000")
//!         .build()?;
//!
//!     let chapters = client.content().list_chapters().await?;
//!     println!("{chapters}");
//!
//!     let access = client.access().check("U1", None).await?;
//!     println!("tier: {:?}", access.tier);
//!
//!     Ok(())
//! }
//! ```
//!
//! Every call carries an explicit deadline and is attempted exactly once.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use api::access::{AccessCheck, Tier};
pub use client::{BackendClient, BackendClientBuilder};
pub use config::ClientConfig;
pub use error::{BackendError, BackendResult};
pub use url::Url;
