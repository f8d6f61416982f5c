#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;

pub use client::IdentityClient;
pub use config::ClientConfig;
pub use error::ClientError;
