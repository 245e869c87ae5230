use log::{info, warn};
use rendezvous_states::State;
use serde::Deserialize;
use ustr::Ustr;

/// Where the authentication API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
}

/// Environment overrides, e.g. `API_BASE_URL=http://localhost:5000`.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: String) -> Self {
        Self {
            api_base_url: base_url,
        }
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let raw: RawConfig = match serde_env::from_iter(vars) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Ignoring malformed environment configuration: {err}");
                RawConfig::default()
            }
        };

        match raw.api_base_url {
            Some(base_url) => {
                info!("Using API base url from environment: {base_url}");
                Self::new(base_url.trim_end_matches('/').to_owned())
            }
            None => Self::default(),
        }
    }

    pub fn api_url(&self) -> Ustr {
        if self.api_base_url.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{}/api", self.api_base_url))
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: if cfg!(target_arch = "wasm32") {
                // same origin as the page
                String::new()
            } else if cfg!(feature = "env_test") {
                "https://rendezvous-test.example.com".to_owned()
            } else if cfg!(feature = "env_nightly") {
                "https://rendezvous-nightly.example.com".to_owned()
            } else {
                "https://localhost:5001".to_owned()
            },
        }
    }
}

impl State for BusinessConfig {}
