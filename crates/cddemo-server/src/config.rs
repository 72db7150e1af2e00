use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};
use crate::schema::ApiVersion;

/// Server configuration. Every key is optional in the TOML form and falls
/// back to [`ServerConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub api: ApiVersion,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 80)),
            api: ApiVersion::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Parse a listen address. A bare `:port` means every interface.
pub fn parse_listen_addr(s: &str) -> ServerResult<SocketAddr> {
    let full = match s.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => s.to_owned(),
    };
    full.parse()
        .map_err(|e| ServerError::Config(format!("invalid listen address {s}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:80".parse::<SocketAddr>().unwrap());
        assert_eq!(c.api.prefix(), "/apis/zcloud.example/v1");
    }

    #[test]
    fn toml_overrides_and_defaults() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "127.0.0.1:1234"

            [api]
            version = "v2"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 1234);
        assert_eq!(c.api.group, "zcloud.example");
        assert_eq!(c.api.version, "v2");
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ServerConfig::from_toml_str("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(
            ServerConfig::from_toml_str("bind_addr = 5"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_addr = \"127.0.0.1:8080\"").unwrap();
        let c = ServerConfig::load(file.path()).unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ServerConfig::load(dir.path().join("absent.toml")),
            Err(ServerError::Io(_))
        ));
    }

    #[test]
    fn listen_addr_forms() {
        assert_eq!(parse_listen_addr(":80").unwrap().to_string(), "0.0.0.0:80");
        assert_eq!(
            parse_listen_addr("127.0.0.1:1234").unwrap().to_string(),
            "127.0.0.1:1234"
        );
        assert!(parse_listen_addr("nonsense").is_err());
    }
}
