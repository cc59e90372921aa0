pub mod admin;
pub mod bid;
pub mod claim;
pub mod create_market;
pub mod exercise;
pub mod expire;
pub mod refund;
pub mod resolve;
pub mod transfer_options;
pub mod transition;

pub use create_market::*;
pub use resolve::*;
