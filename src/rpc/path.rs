//! Path resolution, both directions.
//!
//! Declaration side: a protocol's declared location is reduced to its
//! canonical RPC path by stripping the configured protocol root, the fixed
//! `.proto` suffix, and the fixed `Ptl` prefix on the final segment.
//!
//! Request side: the RPC path is extracted from the URL (path-addressed)
//! or from a reserved field in the decoded body (field-addressed). The two
//! modes are mutually exclusive; mixing them is an addressing mismatch.

use serde_json::Value;

use crate::config::AddressingMode;
use crate::rpc::error::ErrorCode;

/// Fixed suffix of protocol declaration files.
pub const PROTO_SUFFIX: &str = ".proto";
/// Fixed naming-convention prefix on the final location segment.
pub const NAME_PREFIX: &str = "Ptl";
/// Reserved body field carrying the RPC path in field-addressed mode.
pub const PATH_FIELD: &str = "__rpc_path__";

/// Normalized, slash-separated RPC path. Derived deterministically from a
/// descriptor's declared location; same location, same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declaration-side resolution failures. Fatal at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    OutsideRoot { location: String, root: String },
    BadConvention { location: String, reason: &'static str },
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::OutsideRoot { location, root } => {
                write!(f, "location {location:?} is outside protocol root {root:?}")
            }
            PathError::BadConvention { location, reason } => {
                write!(f, "location {location:?} violates naming convention: {reason}")
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Derives the canonical RPC path for a declared protocol location.
///
/// Pure and deterministic. `src/shared/protocols/user/PtlLogin.proto`
/// under root `src/shared/protocols` resolves to `/user/Login`.
pub fn resolve_location(location: &str, proto_root: &str) -> Result<CanonicalPath, PathError> {
    let normalized = location.replace('\\', "/");
    let root = proto_root.replace('\\', "/");
    let root = root.trim_end_matches('/');

    let rest = normalized
        .strip_prefix(root)
        .ok_or_else(|| PathError::OutsideRoot {
            location: location.to_string(),
            root: proto_root.to_string(),
        })?;
    let rest = rest.trim_start_matches('/');

    let rest = rest
        .strip_suffix(PROTO_SUFFIX)
        .ok_or_else(|| PathError::BadConvention {
            location: location.to_string(),
            reason: "missing .proto suffix",
        })?;

    let (dir, file) = match rest.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, rest),
    };

    let stem = file
        .strip_prefix(NAME_PREFIX)
        .ok_or_else(|| PathError::BadConvention {
            location: location.to_string(),
            reason: "final segment missing Ptl prefix",
        })?;
    if stem.is_empty() {
        return Err(PathError::BadConvention {
            location: location.to_string(),
            reason: "empty protocol name",
        });
    }

    let path = match dir {
        Some(dir) if !dir.is_empty() => format!("/{dir}/{stem}"),
        _ => format!("/{stem}"),
    };
    Ok(CanonicalPath(path))
}

/// Extracts the requested RPC path from an incoming request.
///
/// In field-addressed mode the reserved field is removed from `args` on
/// success, so handlers never see it. Errors are pre-check tags evaluated
/// at dispatch time, not immediate aborts.
pub fn extract_request_path(
    mode: AddressingMode,
    url_path: &str,
    url_root: &str,
    args: Option<&mut Value>,
) -> Result<String, ErrorCode> {
    match mode {
        AddressingMode::Path => {
            // The reserved field showing up here means the client is
            // speaking field-addressed at a path-addressed server.
            if let Some(args) = &args {
                if args.get(PATH_FIELD).is_some() {
                    return Err(ErrorCode::ReqCantBeResolved);
                }
            }

            let root = url_root.trim_end_matches('/');
            // The match must end on a segment boundary: "/rpcx" is not
            // under root "/rpc".
            let rest = url_path
                .strip_prefix(root)
                .filter(|r| r.is_empty() || r.starts_with('/'))
                .ok_or(ErrorCode::InvalidPath)?;
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                return Err(ErrorCode::ReqCantBeResolved);
            }
            Ok(format!("/{rest}"))
        }
        AddressingMode::Field => {
            let Some(args) = args else {
                return Err(ErrorCode::ReqCantBeResolved);
            };
            let Some(obj) = args.as_object_mut() else {
                return Err(ErrorCode::ReqCantBeResolved);
            };
            let Some(field) = obj.remove(PATH_FIELD) else {
                return Err(ErrorCode::ReqCantBeResolved);
            };
            let Some(path) = field.as_str() else {
                return Err(ErrorCode::ReqCantBeResolved);
            };
            let path = path.trim_start_matches('/');
            if path.is_empty() {
                return Err(ErrorCode::ReqCantBeResolved);
            }
            Ok(format!("/{path}"))
        }
    }
}
