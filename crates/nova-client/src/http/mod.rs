//! HTTP transport for the chat and build services.
//!
//! Implements [`TransportClient`](crate::TransportClient) with JSON POSTs
//! via reqwest, plus the SSE chat stream.

mod api;
mod client;
mod config;


pub use client::HttpTransport;
pub use config::HttpConfig;
