// src/config/mod.rs
pub mod client;

pub use client::{ClientConfig, ENV_CONFIG_PATH};
