//! User interfaces
//!
//! One-shot CLI commands and the interactive console.

pub mod cli;
