//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod auth;
mod config_management;
mod export;
mod health;
mod links;
mod qr;
mod shorten;
mod stats;

pub use auth::*;
pub use config_management::*;
pub use export::*;
pub use health::*;
pub use links::*;
pub use qr::*;
pub use shorten::*;
pub use stats::*;
