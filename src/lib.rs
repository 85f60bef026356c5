//! Courier - Typed RPC-over-HTTP Dispatch Server
//!
//! Core library: HTTP transport, protocol registry, and the dispatch pipeline.

pub mod config;
pub mod http;
pub mod rpc;
pub mod server;
