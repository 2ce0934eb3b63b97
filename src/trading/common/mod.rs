pub mod retry;
pub mod transaction_builder;

pub use retry::*;
pub use transaction_builder::*;
