use std::path::PathBuf;

use anyhow::Context;

/// Listener and upload settings. Every field has a default, so running
/// without any `TWINVIEW_*` variables works out of the box.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: PathBuf::from("./static"),
            max_upload_bytes: tv_api::handlers::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = Self::default();
        if let Some(host) = get("TWINVIEW_HOST") {
            cfg.host = host;
        }
        if let Some(port) = get("TWINVIEW_PORT") {
            cfg.port = port
                .parse()
                .with_context(|| format!("TWINVIEW_PORT is not a port number: {port:?}"))?;
        }
        if let Some(dir) = get("TWINVIEW_STATIC_DIR") {
            cfg.static_dir = PathBuf::from(dir);
        }
        if let Some(limit) = get("TWINVIEW_MAX_UPLOAD_BYTES") {
            cfg.max_upload_bytes = limit
                .parse()
                .with_context(|| format!("TWINVIEW_MAX_UPLOAD_BYTES is not a byte count: {limit:?}"))?;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.port, 5000);
    }

    #[test]
    fn test_overrides() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("TWINVIEW_HOST", "0.0.0.0"),
            ("TWINVIEW_PORT", "8088"),
            ("TWINVIEW_STATIC_DIR", "/srv/tv"),
            ("TWINVIEW_MAX_UPLOAD_BYTES", "1024"),
        ]))
        .unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8088);
        assert_eq!(cfg.static_dir, PathBuf::from("/srv/tv"));
        assert_eq!(cfg.max_upload_bytes, 1024);
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("TWINVIEW_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("TWINVIEW_PORT"));
    }
}
