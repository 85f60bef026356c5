//! RPC dispatch core.
//!
//! Maps inbound HTTP requests to statically declared protocols, validates
//! payloads against the protocol's request type, invokes the registered
//! handler, and serializes the outcome into a uniform envelope.
//!
//! # Request pipeline
//!
//! Each request runs the stages below in fixed order. A stage may record
//! a terminal condition, but later stages still run until dispatch picks
//! the outcome; every request ends at the envelope writer exactly once.
//!
//! ```text
//!   transport request
//!        │
//!        ▼
//!   1. body decode        (JSON; multipart passes through raw)
//!   2. context attach     (service config bound to the call)
//!   3. addressing         (URL path or reserved body field → RPC path)
//!   4. registry lookup    (exact match; absence deferred to dispatch)
//!   5. user middleware    (ordered, optional path-prefix scope)
//!   6. schema validation  (only when an entry exists and no error pends)
//!   7. dispatch           (terminal checks → handler → outcome capture)
//!        │
//!        ▼
//!   envelope writer → transport
//! ```
//!
//! Submodules:
//!
//! - **`proto`**: protocol descriptors and the handler/validator contracts
//! - **`path`**: canonical path resolution, both directions
//! - **`registry`**: path → {descriptor, handler, validator} table
//! - **`pipeline`**: per-request state built by the early stages
//! - **`service`**: registration API, middleware, hooks, dispatcher
//! - **`envelope`**: wire envelope and the write-once response slot
//! - **`error`**: error taxonomy and wire codes
//! - **`schema`**: minimal built-in validator

pub mod envelope;
pub mod error;
pub mod path;
pub mod pipeline;
pub mod proto;
pub mod registry;
pub mod schema;
pub mod service;
