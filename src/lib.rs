//! Shortstats - Terminal analytics client for URL shortener services
//!
//! This library provides the machinery behind the `shortstats` binary:
//! fetching click statistics from a shortlink server with graded fallback,
//! rendering them as terminal reports, exporting them as CSV/JSON files,
//! and copying or saving QR code images for short links.
//!
//! # Architecture
//! - `api`: HTTP gateway to the shortlink server
//! - `report`: Stats normalization, fallback, and per-session retention
//! - `render`: Report layout and terminal printing
//! - `export`: CSV/JSON file generation
//! - `artifact`: QR image reference, cache, clipboard, and save paths
//! - `interfaces`: User interfaces (one-shot CLI, interactive console)
//! - `config`: Configuration management
//! - `system`: Logging and platform utilities

pub mod api;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod interfaces;
pub mod render;
pub mod report;
pub mod system;
pub mod utils;
