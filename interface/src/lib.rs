pub mod content_store;
pub mod drop_contract;
pub mod error;
pub mod image_urls;
pub mod notifications;
pub mod wallet;
