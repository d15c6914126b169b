//! Portfolio site core
//!
//! Ties the content client, the gallery state and the gallery interface
//! together:
//! - [`config`] - Site configuration with JSON overrides
//! - [`logging`] - Tracing subscriber bootstrap
//! - [`page`] - Gallery page controller (fetch, group, navigate, address, view)
//! - [`content`] - Loaders for the landing, developer and about pages
//!
//! # Example
//!
//! ```rust,no_run
//! use app_state::PhotoFetcher;
//! use app_ui::{KeyboardHost, ListenerId, MemoryHistory, Section};
//! use portfolio::{init_tracing, GalleryPage, SiteConfig};
//! use sanity_client::SanityClient;
//!
//! struct NoKeys;
//!
//! impl KeyboardHost for NoKeys {
//!     fn add_listener(&mut self) -> ListenerId {
//!         ListenerId(0)
//!     }
//!     fn remove_listener(&mut self, _id: ListenerId) {}
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing();
//!     let config = SiteConfig::default();
//!     let client = SanityClient::new(config.sanity.clone())?;
//!
//!     let mut page = GalleryPage::new(
//!         Section::Photos,
//!         PhotoFetcher::new(client),
//!         MemoryHistory::new("/photos"),
//!         NoKeys,
//!         &config,
//!     );
//!     page.load().await;
//!     println!("{}", page.meta().title);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod content;
pub mod logging;
pub mod page;

pub use config::SiteConfig;
pub use content::{load_about, load_developer_projects, load_featured_video, AboutContent, FeaturedVideo};
pub use logging::init_tracing;
pub use page::{GalleryPage, LoadRequest};
