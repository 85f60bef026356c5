//! Protocol descriptors and the contracts consumed by the dispatch core:
//! handlers, validators, and the validator compiler.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::rpc::envelope::ResponseSlot;
use crate::rpc::error::HandlerError;

/// Opaque type descriptor consumed by the validator contract. Produced
/// offline by whatever schema tooling the deployment uses; the core never
/// interprets it.
pub type Schema = Value;

/// A single RPC contract: a unique name, the declared source location its
/// canonical path is derived from, and the request/response type
/// descriptors. Immutable once declared.
#[derive(Debug, Clone)]
pub struct ProtocolDescriptor {
    pub name: String,
    pub location: String,
    pub request_schema: Schema,
    pub response_schema: Schema,
}

impl ProtocolDescriptor {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        request_schema: Schema,
        response_schema: Schema,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            request_schema,
            response_schema,
        }
    }
}

/// Result of validating a decoded request value.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub is_error: bool,
    pub field_name: Option<String>,
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn fail(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            field_name: Some(field_name.into()),
            message: Some(message.into()),
        }
    }
}

/// Validates decoded request values against one protocol's request type.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value) -> ValidationOutcome;
}

/// Produces a validator bound to a descriptor's request type, once, at
/// registration time.
pub trait ValidatorCompiler: Send + Sync {
    fn compile(&self, descriptor: &ProtocolDescriptor) -> Arc<dyn Validator>;
}

/// The validated request view a handler receives.
pub struct ApiRequest {
    /// Canonical RPC path the request resolved to.
    pub path: String,
    /// Decoded argument value. `Null` for multipart passthrough requests.
    pub args: Value,
    /// Raw body bytes, present only for multipart requests where body
    /// decoding was skipped.
    pub raw_body: Option<Vec<u8>>,
    /// Transport headers, as received.
    pub headers: HashMap<String, String>,
    /// Server configuration, for handlers that need it.
    pub config: Arc<Config>,
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>>;

/// A registered handler. Type-erased: the dispatcher never knows concrete
/// payload shapes, it trusts the validator bound at registration.
///
/// A handler must eventually produce exactly one outcome, either by
/// writing to the slot (possibly from a task spawned after returning) or
/// by returning an error.
pub trait ApiHandler: Send + Sync {
    fn call(&self, req: ApiRequest, res: ResponseSlot) -> HandlerFuture;
}

impl<F, Fut> ApiHandler for F
where
    F: Fn(ApiRequest, ResponseSlot) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    fn call(&self, req: ApiRequest, res: ResponseSlot) -> HandlerFuture {
        Box::pin(self(req, res))
    }
}
