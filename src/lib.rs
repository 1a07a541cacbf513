//! Plateful Library
//!
//! Core functionality for dining hall menu and nutrition tracking.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod plan;
pub mod plate;
pub mod tools;
