//! mysql-bridge - a SQL tool bridge connecting LLM agents to MySQL.
//!
//! This library exposes the core modules for use in integration tests.

pub mod config;
pub mod db;
pub mod error;
pub mod generator;
pub mod introspect;
pub mod llm;
pub mod render;
pub mod tool;
