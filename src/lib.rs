pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{DefaultLauncher, HttpUploader, LocalStorage};
pub use app::runner::{ScrapeRunner, ScrapeSummary};
pub use core::{listing_walker::ListingWalker, session::ScrapeSession};
pub use domain::model::{BrowserBackend, BrowserSettings, ProductRecord, SelectorRules};
pub use utils::error::{Result, ScrapeError};
