use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_URL: &str = "https://registro.sinerkia-dev.com";
pub const DEFAULT_DB: &str = "registro";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";
pub const DEFAULT_PORT: u16 = 5000;

const DEFAULT_CONFIG_PATH: &str = "config/proxy.toml";

/// Proxy settings, resolved once at startup and never mutated afterwards
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub request_timeout_secs: u64,
    pub remote: RemoteDefaults,
}

/// Fallback Odoo server and credentials, used when a request omits `url`/`db`
#[derive(Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RemoteDefaults {
    pub url: String,
    pub db: String,
    pub username: String,
    pub password: String,
}

/// Server address and database a single request talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub url: String,
    pub db: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            debug: true,
            request_timeout_secs: 30,
            remote: RemoteDefaults::default(),
        }
    }
}

impl Default for RemoteDefaults {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            db: DEFAULT_DB.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl std::fmt::Debug for RemoteDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDefaults")
            .field("url", &self.url)
            .field("db", &self.db)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl ProxyConfig {
    /// Config file (`ODOO_PROXY_CONFIG`, default `config/proxy.toml`) overlaid
    /// with the `PORT` and `DEBUG` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("ODOO_PROXY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let cfg = Self::from_file(Path::new(&path))?;
        Ok(cfg.with_env(|key| std::env::var(key).ok()))
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value '{}'", port),
            }
        }
        if let Some(debug) = lookup("DEBUG") {
            self.debug = debug.trim().eq_ignore_ascii_case("true");
        }
        self
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Default tracing filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

impl RemoteDefaults {
    pub fn target(&self, url: Option<&str>, db: Option<&str>) -> RemoteTarget {
        RemoteTarget {
            url: url.unwrap_or(&self.url).to_string(),
            db: db.unwrap_or(&self.db).to_string(),
        }
    }
}
