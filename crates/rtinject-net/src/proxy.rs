use std::fmt;
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use rtinject_core::{Error, Result};
use tracing::debug;
use url::{Host, Url};

const HTTP_PROXY_VARS: [&str; 2] = ["HTTP_PROXY", "http_proxy"];
const HTTPS_PROXY_VARS: [&str; 2] = ["HTTPS_PROXY", "https_proxy"];
const NO_PROXY_VARS: [&str; 2] = ["NO_PROXY", "no_proxy"];

/// Per-call overrides; each one takes precedence over its environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyOptions {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// `http:` or `https:`.
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub auth: Option<ProxyAuth>,
}

impl ProxyConfig {
    /// Proxy URL without credentials, suitable for an HTTP client.
    pub fn url(&self) -> String {
        if self.host.contains(':') {
            format!("{}//[{}]:{}", self.protocol, self.host, self.port)
        } else {
            format!("{}//{}:{}", self.protocol, self.host, self.port)
        }
    }
}

impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub struct ProxyResolver {
    options: ProxyOptions,
    env: EnvLookup,
}

impl fmt::Debug for ProxyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyResolver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for ProxyResolver {
    fn default() -> Self {
        Self::from_env(ProxyOptions::default())
    }
}

impl ProxyResolver {
    pub fn from_env(options: ProxyOptions) -> Self {
        Self::with_env_lookup(options, |name| std::env::var(name).ok())
    }

    pub fn with_env_lookup<F>(options: ProxyOptions, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            options,
            env: Arc::new(lookup),
        }
    }

    /// Proxy to use for a request to `url`, or `None` to connect directly.
    pub fn resolve_for_url(&self, url: &str) -> Result<Option<ProxyConfig>> {
        let target = Url::parse(url).map_err(|err| Error::DownloadFailure {
            url: url.to_string(),
            reason: format!("invalid request URL: {err}"),
        })?;

        let scheme = target.scheme();
        let raw_proxy = match scheme {
            "https" => self.pick(self.options.https_proxy.as_deref(), &HTTPS_PROXY_VARS),
            "http" => self.pick(self.options.http_proxy.as_deref(), &HTTP_PROXY_VARS),
            _ => None,
        };
        let Some(raw_proxy) = raw_proxy else {
            return Ok(None);
        };

        // Validated even when the host ends up bypassed.
        let config = parse_proxy_url(&raw_proxy, scheme)?;

        if let Some(no_proxy) = self.pick(self.options.no_proxy.as_deref(), &NO_PROXY_VARS) {
            let host = host_for_matching(&target);
            if is_no_proxy_match(&host, target.port_or_known_default(), &no_proxy) {
                debug!(url, host = %host, "host matches no_proxy; connecting directly");
                return Ok(None);
            }
        }

        Ok(Some(config))
    }

    fn pick(&self, explicit: Option<&str>, vars: &[&str]) -> Option<String> {
        if let Some(value) = explicit.map(str::trim).filter(|value| !value.is_empty()) {
            return Some(value.to_string());
        }
        vars.iter()
            .filter_map(|name| (self.env)(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

/// Parses a proxy setting. A bare `host:port` inherits `default_scheme`.
pub fn parse_proxy_url(raw: &str, default_scheme: &str) -> Result<ProxyConfig> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("{default_scheme}://{raw}")
    };

    let invalid = |reason: String| Error::InvalidProxyUrl {
        url: raw.to_string(),
        reason,
    };
    let parsed = Url::parse(&candidate).map_err(|err| invalid(err.to_string()))?;

    let protocol = match parsed.scheme() {
        "http" => "http:",
        "https" => "https:",
        other => {
            return Err(Error::UnsupportedProxyProtocol {
                url: raw.to_string(),
                protocol: format!("{other}:"),
            })
        }
    };

    let host = match parsed.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => return Err(invalid("missing host".to_string())),
    };
    if host.is_empty() {
        return Err(invalid("missing host".to_string()));
    }
    let port = parsed
        .port()
        .unwrap_or(if protocol == "https:" { 443 } else { 80 });

    let auth = if parsed.username().is_empty() {
        None
    } else {
        Some(ProxyAuth {
            username: decode_component(parsed.username()),
            password: decode_component(parsed.password().unwrap_or_default()),
        })
    };

    Ok(ProxyConfig {
        protocol: protocol.to_string(),
        host,
        port,
        auth,
    })
}

/// Whether a request to `host:port` bypasses the proxy under `no_proxy`.
pub fn is_no_proxy_match(host: &str, port: Option<u16>, no_proxy: &str) -> bool {
    let host = host
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_ascii_lowercase();

    for entry in no_proxy
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|entry| !entry.is_empty())
    {
        if entry == "*" {
            return true;
        }
        let Some((entry_host, entry_port)) = split_no_proxy_entry(entry) else {
            continue;
        };
        if entry_port.is_some() && entry_port != port {
            continue;
        }

        let entry_host = entry_host.to_ascii_lowercase();
        if entry_host.starts_with('.') || entry_host.starts_with('*') {
            let suffix = entry_host.trim_start_matches('*');
            let suffix = if suffix.starts_with('.') {
                suffix.to_string()
            } else {
                format!(".{suffix}")
            };
            if suffix.len() > 1 && host.ends_with(&suffix) {
                return true;
            }
        } else if host == entry_host {
            return true;
        }
    }
    false
}

fn split_no_proxy_entry(entry: &str) -> Option<(&str, Option<u16>)> {
    if let Some(rest) = entry.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        return match tail.strip_prefix(':') {
            Some(port) => Some((host, Some(port.parse().ok()?))),
            None if tail.is_empty() => Some((host, None)),
            None => None,
        };
    }

    match entry.split_once(':') {
        // More than one colon is an unbracketed IPv6 literal.
        Some((_, rest)) if rest.contains(':') => Some((entry, None)),
        Some((host, port)) => Some((host, Some(port.parse().ok()?))),
        None => Some((entry, None)),
    }
}

fn host_for_matching(url: &Url) -> String {
    match url.host() {
        Some(Host::Ipv6(addr)) => addr.to_string(),
        Some(host) => host.to_string(),
        None => String::new(),
    }
}

fn decode_component(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}
