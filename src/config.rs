use anyhow::Context;
use serde::Deserialize;

/// Where the RPC path travels: in the request URL, or as a reserved
/// field inside the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// The URL path (minus `url_root`) is the RPC path.
    Path,
    /// The decoded body carries the RPC path in a reserved top-level field.
    Field,
}

/// Server configuration.
///
/// Loaded from a YAML file (path in the `COURIER_CONFIG` env var, default
/// `courier.yaml`). Every field has a default, so a missing file yields a
/// runnable config. The `LISTEN` env var overrides `listen_addr`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the TCP listener binds to.
    pub listen_addr: String,
    /// Root directory of protocol declarations. Registering a protocol
    /// declared outside this root is a fatal configuration error.
    pub proto_root: String,
    /// Root directory of API handler implementations (declaration-side
    /// convention; the registry itself only needs `proto_root`).
    pub api_root: String,
    /// URL prefix stripped from the request path in path-addressed mode.
    pub url_root: String,
    /// How requests name their target RPC path.
    pub addressing: AddressingMode,
    /// Reveal the failing field and validator message to clients on
    /// schema-validation errors. Off by default: clients get a generic
    /// message, detail stays in the server log.
    pub return_detail_err: bool,
    /// Log method/path/body-size for every inbound request.
    pub log_request_detail: bool,
    /// Reserved switch for a binary body encoding. Text (JSON) is the
    /// implemented encoding.
    pub binary_body: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            proto_root: "src/shared/protocols".to_string(),
            api_root: "src/api".to_string(),
            url_root: "/".to_string(),
            addressing: AddressingMode::Path,
            return_detail_err: false,
            log_request_detail: false,
            binary_body: false,
        }
    }
}

impl Config {
    /// Loads configuration from the YAML file, falling back to defaults
    /// when no file exists. A file that exists but fails to parse is a
    /// fatal startup error, not a silent fallback.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("COURIER_CONFIG").unwrap_or_else(|_| "courier.yaml".to_string());

        let mut cfg = if std::path::Path::new(&path).exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config file {path}"))?;
            serde_yaml::from_str(&raw)
                .with_context(|| format!("failed to parse config file {path}"))?
        } else {
            Config::default()
        };

        if let Ok(listen) = std::env::var("LISTEN") {
            cfg.listen_addr = listen;
        }

        if cfg.binary_body {
            tracing::warn!(
                "binary_body is set but only the text (JSON) encoding is implemented; \
                 the switch has no effect"
            );
        }
        tracing::info!(
            proto_root = %cfg.proto_root,
            api_root = %cfg.api_root,
            "configuration loaded"
        );

        Ok(cfg)
    }
}
