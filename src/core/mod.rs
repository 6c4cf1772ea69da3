pub mod detail_extractor;
pub mod export;
pub mod listing_walker;
pub mod session;

pub use crate::domain::model::{ProductRecord, SelectorRules};
pub use crate::domain::ports::{
    BrowserContext, BrowserLauncher, ConfigProvider, ElementHandle, ProductSelector, Storage,
    Uploader,
};
pub use crate::utils::error::Result;
