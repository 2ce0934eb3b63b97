pub mod common;
pub mod core;
pub mod pumpfun;

pub use core::launcher::{LaunchReceipt, LaunchStage, TokenLauncher};
