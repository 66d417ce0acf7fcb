pub mod config;
pub mod error;
pub mod notifications;
pub mod sanity;
pub mod thirdweb;
pub mod web;
