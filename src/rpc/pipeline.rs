//! The per-request pipeline state.
//!
//! An `IncomingRequest` is built from the transport request in one pass:
//! body decode, then addressing resolution. Later stages (lookup,
//! middleware, validation, dispatch) run over it in fixed order; failures
//! along the way are recorded, not thrown, so every stage up to dispatch
//! still runs and every request ends at the envelope writer.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::Config;
use crate::http::request::{Method, Request};
use crate::rpc::error::ErrorCode;
use crate::rpc::path::extract_request_path;

/// Transient per-call state. Created at pipeline entry, never shared
/// across requests, discarded once the response is written.
pub struct IncomingRequest {
    pub method: Method,
    pub url_path: String,
    pub headers: HashMap<String, String>,
    pub raw_body: Vec<u8>,
    /// Decoded argument value. `None` when decoding failed or was skipped
    /// for a multipart body.
    pub args: Option<Value>,
    /// Multipart bodies skip decoding; the raw bytes pass through.
    pub multipart: bool,
    pub decode_failed: bool,
    /// Canonical RPC path, present once addressing resolution succeeded.
    pub resolved_path: Option<String>,
    /// Pre-check error tag set by addressing resolution. Not a terminal
    /// abort: middleware still runs, dispatch evaluates the tag.
    pub precheck_error: Option<ErrorCode>,
}

impl IncomingRequest {
    /// Stage 1 (body decode) and stage 3 (addressing resolution).
    ///
    /// An empty non-multipart body decodes to `Null` so body-less requests
    /// still flow through path-addressed dispatch.
    pub fn from_transport(req: &Request, cfg: &Config) -> Self {
        let multipart = req.is_multipart();
        let mut args = None;
        let mut decode_failed = false;

        if multipart {
            // passthrough, no decode
        } else if req.body.is_empty() {
            args = Some(Value::Null);
        } else {
            match serde_json::from_slice(&req.body) {
                Ok(value) => args = Some(value),
                Err(e) => {
                    tracing::debug!(error = %e, "request body decode failed");
                    decode_failed = true;
                }
            }
        }

        let mut incoming = Self {
            method: req.method.clone(),
            url_path: req.route_path().to_string(),
            headers: req.headers.clone(),
            raw_body: req.body.clone(),
            args,
            multipart,
            decode_failed,
            resolved_path: None,
            precheck_error: None,
        };

        if !decode_failed {
            match extract_request_path(
                cfg.addressing,
                &incoming.url_path,
                &cfg.url_root,
                incoming.args.as_mut(),
            ) {
                Ok(path) => incoming.resolved_path = Some(path),
                Err(code) => incoming.precheck_error = Some(code),
            }
        }

        incoming
    }
}
