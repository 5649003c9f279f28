pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod pins;
pub mod registry;
pub mod resolve;
pub mod service;
pub mod version;

pub use anyhow::Result;
