pub mod catalog;
pub mod error;
pub mod graceful_stop;
pub mod mint_flow;
