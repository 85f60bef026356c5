//! Protocol registry: canonical path → {descriptor, handler, validator}.
//!
//! Built once at startup, read-only while serving. Duplicate registration
//! is permitted deliberately (last write wins, with a warning) to support
//! hot-reload and test-time re-registration.

use std::collections::HashMap;
use std::sync::Arc;

use crate::rpc::path::{CanonicalPath, resolve_location};
use crate::rpc::proto::{ApiHandler, ProtocolDescriptor, Validator};

/// One registered protocol. Never mutated after creation.
#[derive(Clone)]
pub struct Registration {
    pub descriptor: Arc<ProtocolDescriptor>,
    pub handler: Arc<dyn ApiHandler>,
    pub validator: Arc<dyn Validator>,
}

#[derive(Default)]
pub struct Registry {
    entries: HashMap<String, Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a protocol under its canonical path.
    ///
    /// A declared location outside `proto_root`, or one violating the
    /// naming convention, is a fatal configuration error raised here, at
    /// startup, never at request time.
    pub fn register(
        &mut self,
        descriptor: Arc<ProtocolDescriptor>,
        handler: Arc<dyn ApiHandler>,
        validator: Arc<dyn Validator>,
        proto_root: &str,
    ) -> anyhow::Result<CanonicalPath> {
        let path = resolve_location(&descriptor.location, proto_root)
            .map_err(|e| anyhow::anyhow!("cannot register protocol {}: {}", descriptor.name, e))?;

        if self.entries.contains_key(path.as_str()) {
            tracing::warn!(
                path = %path,
                proto = %descriptor.name,
                "duplicate registration, replacing previous handler"
            );
        }

        self.entries.insert(
            path.as_str().to_string(),
            Registration {
                descriptor,
                handler,
                validator,
            },
        );
        Ok(path)
    }

    /// Exact-match lookup. No wildcard or prefix matching.
    pub fn lookup(&self, path: &str) -> Option<&Registration> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
