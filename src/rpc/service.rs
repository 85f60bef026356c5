//! The RPC service: registration API, middleware chain, overridable
//! hooks, and the dispatcher that turns a pipeline outcome into exactly
//! one response envelope.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::config::Config;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::rpc::envelope::{Envelope, ResponseSlot};
use crate::rpc::error::{ErrorCode, HandlerError};
use crate::rpc::path::CanonicalPath;
use crate::rpc::pipeline::IncomingRequest;
use crate::rpc::proto::{
    ApiHandler, ApiRequest, ProtocolDescriptor, ValidationOutcome, ValidatorCompiler,
};
use crate::rpc::registry::{Registration, Registry};
use crate::rpc::schema::BasicCompiler;

/// User middleware. Runs after addressing resolution and registry lookup,
/// before validation; may read and mutate the request, must not assume
/// validation has happened.
pub trait Middleware: Send + Sync {
    fn handle<'a>(
        &'a self,
        req: &'a mut IncomingRequest,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

struct MiddlewareEntry {
    /// Resolved-path prefix this middleware is scoped to; `None` runs on
    /// every request, resolved or not.
    prefix: Option<String>,
    mw: Arc<dyn Middleware>,
}

/// What the completion hook observes about a finished call.
#[derive(Debug, Clone)]
pub struct CallSummary {
    pub path: Option<String>,
    pub proto: Option<String>,
    pub succeeded: bool,
}

pub type NotFoundHook = Box<dyn Fn(&str) -> Envelope + Send + Sync>;
pub type UnhandledErrorHook = Box<dyn Fn(&str, &anyhow::Error) -> Envelope + Send + Sync>;
pub type CompletionHook = Box<dyn Fn(&CallSummary) + Send + Sync>;

/// The dispatch service.
///
/// Registration (`implement`, `use_middleware`, hook setters) takes
/// `&mut self` and happens at startup; serving shares the finished
/// service behind an `Arc` and only reads it.
pub struct RpcService {
    config: Arc<Config>,
    registry: Registry,
    compiler: Arc<dyn ValidatorCompiler>,
    middleware: Vec<MiddlewareEntry>,
    on_not_found: NotFoundHook,
    on_unhandled_error: UnhandledErrorHook,
    on_call_complete: CompletionHook,
}

impl RpcService {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            registry: Registry::new(),
            compiler: Arc::new(BasicCompiler),
            middleware: Vec::new(),
            on_not_found: Box::new(|path| {
                tracing::debug!(path = %path, "no registered protocol");
                Envelope::from_code(ErrorCode::PtlNotFound)
            }),
            on_unhandled_error: Box::new(|path, error| {
                // Full detail stays server-side; the client gets the
                // generic envelope.
                tracing::error!(path = %path, error = ?error, "unhandled handler error");
                Envelope::from_code(ErrorCode::UnhandledApiError)
            }),
            on_call_complete: Box::new(|summary| {
                tracing::debug!(
                    path = summary.path.as_deref().unwrap_or("-"),
                    proto = summary.proto.as_deref().unwrap_or("-"),
                    ok = summary.succeeded,
                    "call complete"
                );
            }),
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Swaps the validator compiler. Affects registrations made after the
    /// call, so set it before `implement`.
    pub fn with_validator_compiler(mut self, compiler: Arc<dyn ValidatorCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    /// Binds a handler to a protocol.
    ///
    /// Resolves the canonical path, compiles a validator for the request
    /// type, and stores the triple. Re-registering a path replaces the
    /// previous handler (warned, not fatal); a location outside the
    /// protocol root is a fatal configuration error.
    pub fn implement(
        &mut self,
        descriptor: ProtocolDescriptor,
        handler: impl ApiHandler + 'static,
    ) -> anyhow::Result<CanonicalPath> {
        let validator = self.compiler.compile(&descriptor);
        let path = self.registry.register(
            Arc::new(descriptor),
            Arc::new(handler),
            validator,
            &self.config.proto_root,
        )?;
        tracing::info!(path = %path, "protocol registered");
        Ok(path)
    }

    /// Appends a middleware, optionally scoped to a resolved-path prefix.
    /// Middleware runs in registration order.
    pub fn use_middleware(&mut self, prefix: Option<&str>, mw: impl Middleware + 'static) {
        self.middleware.push(MiddlewareEntry {
            prefix: prefix.map(str::to_string),
            mw: Arc::new(mw),
        });
    }

    pub fn on_not_found(&mut self, hook: NotFoundHook) {
        self.on_not_found = hook;
    }

    pub fn on_unhandled_error(&mut self, hook: UnhandledErrorHook) {
        self.on_unhandled_error = hook;
    }

    pub fn on_call_complete(&mut self, hook: CompletionHook) {
        self.on_call_complete = hook;
    }

    /// Runs the whole pipeline for one transport request and returns the
    /// response to send back. Always produces a well-formed envelope;
    /// exactly one per request.
    pub async fn handle(&self, req: &Request) -> Response {
        if self.config.log_request_detail {
            tracing::info!(
                method = ?req.method,
                path = %req.path,
                body_len = req.body.len(),
                "inbound rpc request"
            );
        }

        // Stages 1-3: decode, context, addressing (recorded, not thrown).
        let mut incoming = IncomingRequest::from_transport(req, &self.config);

        // Stage 4: registry lookup. Absence is deferred to dispatch.
        let registration = incoming
            .resolved_path
            .as_deref()
            .and_then(|p| self.registry.lookup(p))
            .cloned();

        // Stage 5: user middleware, in order, prefix-scoped.
        for entry in &self.middleware {
            if let Some(prefix) = &entry.prefix {
                let applies = incoming
                    .resolved_path
                    .as_deref()
                    .map(|p| p.starts_with(prefix.as_str()))
                    .unwrap_or(false);
                if !applies {
                    continue;
                }
            }
            entry.mw.handle(&mut incoming).await;
        }

        // Stage 6: schema validation, only when dispatchable so far.
        let mut validation_failure: Option<ValidationOutcome> = None;
        if let Some(reg) = &registration {
            if incoming.precheck_error.is_none() && !incoming.decode_failed && !incoming.multipart
            {
                let value = incoming.args.clone().unwrap_or(Value::Null);
                let outcome = reg.validator.validate(&value);
                if outcome.is_error {
                    validation_failure = Some(outcome);
                }
            }
        }

        let summary_path = incoming.resolved_path.clone();
        let summary_proto = registration.as_ref().map(|r| r.descriptor.name.clone());

        // Stage 7: dispatch.
        let (envelope, status) = self.dispatch(incoming, registration, validation_failure).await;

        let summary = CallSummary {
            path: summary_path,
            proto: summary_proto,
            succeeded: envelope.is_succ(),
        };
        // Completion hook fires exactly once, after the outcome settled.
        // Its failures must not disturb the response.
        let hook = &self.on_call_complete;
        if std::panic::catch_unwind(AssertUnwindSafe(|| hook(&summary))).is_err() {
            tracing::error!("completion hook panicked");
        }

        Response::json(status, envelope.to_bytes())
    }

    /// Pre-dispatch terminal conditions in priority order, first match
    /// wins; otherwise handler invocation and outcome capture.
    async fn dispatch(
        &self,
        mut incoming: IncomingRequest,
        registration: Option<Registration>,
        validation_failure: Option<ValidationOutcome>,
    ) -> (Envelope, StatusCode) {
        // (a) body decode failed
        if incoming.decode_failed {
            return (
                Envelope::error("invalid request body", Value::Null),
                StatusCode::BadRequest,
            );
        }

        // (b) addressing pre-check error
        if let Some(code) = incoming.precheck_error {
            return (Envelope::from_code(code), StatusCode::Ok);
        }

        let path = incoming.resolved_path.take().unwrap_or_default();

        // (c) no registration entry
        let Some(reg) = registration else {
            return ((self.on_not_found)(&path), StatusCode::Ok);
        };

        // (d) validation failure; detail reveal is configuration-gated
        if let Some(outcome) = validation_failure {
            let field = outcome.field_name.unwrap_or_default();
            let detail = outcome.message.unwrap_or_default();
            tracing::debug!(path = %path, field = %field, detail = %detail, "validation failed");
            let envelope = if self.config.return_detail_err {
                Envelope::error(
                    format!("{field}: {detail}"),
                    json!({ "code": ErrorCode::InvalidReqParam.as_str(), "field": field }),
                )
            } else {
                Envelope::from_code(ErrorCode::InvalidReqParam)
            };
            return (envelope, StatusCode::Ok);
        }

        // Handler invocation. The slot is cloneable, so a handler may
        // finish later from a spawned task; the oneshot below settles the
        // call either way.
        let (slot, mut outcome_rx) = ResponseSlot::channel();
        let api_req = ApiRequest {
            path: path.clone(),
            args: incoming.args.take().unwrap_or(Value::Null),
            raw_body: incoming.multipart.then_some(incoming.raw_body),
            headers: incoming.headers,
            config: self.config.clone(),
        };

        let result = reg.handler.call(api_req, slot).await;

        match result {
            Err(error) => {
                // First write wins: a response written before the handler
                // errored out stays authoritative.
                if let Ok(envelope) = outcome_rx.try_recv() {
                    tracing::warn!(
                        path = %path,
                        "handler returned an error after writing a response, keeping the response"
                    );
                    return (envelope, StatusCode::Ok);
                }
                match error {
                    HandlerError::Api(api) => (
                        Envelope::error(api.message, api.info),
                        StatusCode::Ok,
                    ),
                    HandlerError::Internal(e) => (
                        (self.on_unhandled_error)(&path, &e),
                        StatusCode::InternalServerError,
                    ),
                }
            }
            Ok(()) => match outcome_rx.await {
                // Handler-written envelopes, success or error, ride a 200;
                // clients discriminate on the envelope itself.
                Ok(envelope) => (envelope, StatusCode::Ok),
                Err(_) => {
                    // Every slot handle dropped without a write.
                    let e = anyhow::anyhow!("handler completed without writing a response");
                    (
                        (self.on_unhandled_error)(&path, &e),
                        StatusCode::InternalServerError,
                    )
                }
            },
        }
    }
}
