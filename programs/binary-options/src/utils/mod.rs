pub mod fixed_math;
pub mod ledger;
pub mod price_feed;

pub use fixed_math::*;
pub use ledger::*;
pub use price_feed::*;
