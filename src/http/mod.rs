//! HTTP transport layer.
//!
//! A small HTTP/1.1 server with keep-alive support. From the RPC core's
//! point of view this module is a black box: it delivers a parsed method,
//! path, headers, and raw body, and takes back a status code plus bytes.
//!
//! # Connection state machine
//!
//! Each client connection cycles through:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← wait for incoming request data
//!        └──────┬──────┘
//!               │ request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← RpcService::handle produces the envelope
//!        └──────┬───────────┘
//!               │ response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← send response to client
//!        └──────┬───────────┘
//!               │ response sent
//!               ├─ keep-alive → Reading (same connection)
//!               └─ close → Closed
//! ```
//!
//! Malformed requests get a plain 400 envelope and a closed connection;
//! everything parseable flows into the dispatch pipeline.

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
