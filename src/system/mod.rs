//! System-level modules
//!
//! Process-wide concerns that sit outside the request/report flow:
//! logging initialization and its flush guard.

pub mod logging;

pub use logging::init_logging;
