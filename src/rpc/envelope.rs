//! Response envelope: the uniform wire wrapper distinguishing success
//! payloads from (message, info) error pairs, and the exactly-once slot
//! handlers write their outcome into.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::rpc::error::ErrorCode;

/// A finished call outcome, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Success with an opaque payload.
    Succ(Value),
    /// Error with a client-visible message and machine-readable info.
    Error { message: String, info: Value },
}

impl Envelope {
    /// Error envelope for a pipeline-level failure, carrying the wire
    /// code in its info value.
    pub fn from_code(code: ErrorCode) -> Self {
        Envelope::Error {
            message: code.default_message().to_string(),
            info: json!({ "code": code.as_str() }),
        }
    }

    pub fn error(message: impl Into<String>, info: Value) -> Self {
        Envelope::Error {
            message: message.into(),
            info,
        }
    }

    pub fn is_succ(&self) -> bool {
        matches!(self, Envelope::Succ(_))
    }

    /// Serializes the envelope to its JSON wire shape:
    /// `{"ok":true,"data":..}` or `{"ok":false,"message":..,"info":..}`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let value = match self {
            Envelope::Succ(data) => json!({ "ok": true, "data": data }),
            Envelope::Error { message, info } => {
                json!({ "ok": false, "message": message, "info": info })
            }
        };
        // Serializing a Value cannot fail in practice; keep a well-formed
        // error envelope as the fallback rather than panicking mid-response.
        serde_json::to_vec(&value).unwrap_or_else(|_| {
            br#"{"ok":false,"message":"response serialization failed","info":null}"#.to_vec()
        })
    }
}

/// Write-once response handle given to handlers.
///
/// Cloneable so a handler may hand it to a spawned task and complete the
/// call after returning. Exactly one write ever takes effect: the first.
/// Later writes are dropped with a warning.
#[derive(Clone)]
pub struct ResponseSlot {
    tx: Arc<Mutex<Option<oneshot::Sender<Envelope>>>>,
}

impl ResponseSlot {
    /// Creates a slot and the receiver the dispatcher awaits.
    pub fn channel() -> (Self, oneshot::Receiver<Envelope>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Writes a success envelope. Returns false if the slot was already
    /// written.
    pub fn succ(&self, payload: Value) -> bool {
        self.write(Envelope::Succ(payload))
    }

    /// Writes an error envelope. Returns false if the slot was already
    /// written.
    pub fn error(&self, message: impl Into<String>, info: Value) -> bool {
        self.write(Envelope::Error {
            message: message.into(),
            info,
        })
    }

    fn write(&self, envelope: Envelope) -> bool {
        let Ok(mut guard) = self.tx.lock() else {
            tracing::warn!("response slot lock poisoned, dropping write");
            return false;
        };
        match guard.take() {
            Some(tx) => {
                // The receiver may already be gone (client disconnected);
                // the write is simply dropped then.
                let _ = tx.send(envelope);
                true
            }
            None => {
                tracing::warn!("response already written, ignoring second write");
                false
            }
        }
    }
}
