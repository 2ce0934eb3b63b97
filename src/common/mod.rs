pub mod error;
pub mod layout;
pub mod types;

pub use error::{LaunchError, LaunchResult, RpcError};
pub use types::*;
