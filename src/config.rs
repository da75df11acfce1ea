use rearch::{CData, CapsuleHandle, Container};
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base URL {raw:?} is invalid: {source}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base URL must use http or https, not {0}")]
    UnsupportedScheme(String),
    #[error("{name} environment variable is invalid unicode: {actual}")]
    NotUnicode { name: &'static str, actual: String },
}

/// Parses the service origin the client talks to.
///
/// The returned URL always ends in `/` so endpoint paths join onto it rather
/// than replacing its last segment.
///
/// # Errors
/// Will return [`Err`] if `raw` is not an absolute http(s) URL.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
        raw: raw.to_owned(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_owned()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Picks the base URL for the terminal driver: an explicit flag, then the
/// `QUICKURL_BASE_URL` environment variable, then a local default.
///
/// # Errors
/// Will return [`Err`] if the chosen value is not a valid base URL.
#[cfg(not(target_arch = "wasm32"))]
pub fn base_url_from_env(flag: Option<&str>) -> Result<Url, ConfigError> {
    use std::env::{self, VarError};

    use tracing::warn;

    const ENV_VAR_NAME: &str = "QUICKURL_BASE_URL";
    const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

    if let Some(raw) = flag {
        info!(base_url = raw, "Using base URL from command line");
        return parse_base_url(raw);
    }

    match env::var(ENV_VAR_NAME) {
        Ok(raw) => {
            info!(base_url = raw, "{ENV_VAR_NAME} environment variable set");
            parse_base_url(&raw)
        }
        Err(VarError::NotPresent) => {
            warn!(
                base_url = DEFAULT_BASE_URL,
                "{ENV_VAR_NAME} environment variable not set; defaulting to {DEFAULT_BASE_URL}"
            );
            parse_base_url(DEFAULT_BASE_URL)
        }
        Err(VarError::NotUnicode(actual)) => Err(ConfigError::NotUnicode {
            name: ENV_VAR_NAME,
            actual: actual.display().to_string(),
        }),
    }
}

#[instrument]
#[must_use]
pub fn init_container(base_url: Url) -> Container {
    info!("Initializing container");
    let container = Container::new();
    container.read(base_url_init_action)(base_url);
    container
}

fn base_url_manager(
    CapsuleHandle { register, .. }: CapsuleHandle,
) -> (Option<Url>, impl use<> + CData + Fn(Option<Url>)) {
    register.register(rearch_effects::state::<rearch_effects::Cloned<_>>(None))
}

pub fn base_url_init_action(
    CapsuleHandle { mut get, .. }: CapsuleHandle,
) -> impl use<> + CData + Fn(Url) {
    let set_base_url = get.as_ref(base_url_manager).1.clone();
    move |url| set_base_url(Some(url))
}

/// # Panics
/// Panics when the base URL was not set via [`base_url_init_action`].
pub fn base_url_capsule(CapsuleHandle { mut get, .. }: CapsuleHandle) -> Url {
    let base_url = get.as_ref(base_url_manager).0.clone();
    base_url.expect("Base URL should've been set via base_url_init_action!")
}

/// One connection pool shared by every request the page makes.
pub fn http_client_capsule(_: CapsuleHandle) -> reqwest::Client {
    reqwest::Client::new()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("https://s.example/app").unwrap();
        assert_eq!(url.as_str(), "https://s.example/app/");
        assert_eq!(url.join("shorten").unwrap().as_str(), "https://s.example/app/shorten");
    }

    #[test]
    fn test_parse_base_url_keeps_root() {
        let url = parse_base_url(" http://127.0.0.1:5000 ").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/");
    }

    #[test]
    fn test_parse_base_url_rejects_relative() {
        assert!(matches!(
            parse_base_url("/shorten").unwrap_err(),
            ConfigError::InvalidBaseUrl { .. }
        ));
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(matches!(
            parse_base_url("ftp://s.example").unwrap_err(),
            ConfigError::UnsupportedScheme(scheme) if scheme == "ftp"
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_flag_wins_over_environment() {
        let url = base_url_from_env(Some("https://flag.example")).unwrap();
        assert_eq!(url.as_str(), "https://flag.example/");
    }

    #[test]
    fn test_container_serves_base_url() {
        let base_url = parse_base_url("https://s.example").unwrap();
        let container = init_container(base_url.clone());
        assert_eq!(container.read(base_url_capsule), base_url);
    }
}
