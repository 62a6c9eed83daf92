//! Proxy specifications from the `[proxies]` section
//!
//! ```text
//! [proxies]
//! http = http://10.10.1.10:3128
//!     special-host.xyz.com = http://special-proxy.xyz.com
//! https = None
//! no_proxy_match = *bintray.com*, https://myserver.*
//! ```
//!
//! A bare line sets the proxy for every host of that scheme, a `host = url`
//! line sets it for one host only, and `None` (or a no-value key) disables
//! proxying for the scheme.

use std::collections::BTreeMap;

use serde::Serialize;

/// Key of the entry listing URL patterns that bypass the proxy
pub const NO_PROXY_MATCH: &str = "no_proxy_match";

const DISABLED: &str = "None";

/// Proxy key (`"http"` or `"http://host"`) to proxy URL, `None` meaning "no proxy"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProxyMap(BTreeMap<String, Option<String>>);

impl ProxyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the raw entries of the `[proxies]` section
    pub fn parse<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut map = Self::new();
        for (scheme, value) in entries {
            map.add_scheme(scheme, value);
        }
        map
    }

    /// Classify every line of one scheme's value; later lines win
    pub fn add_scheme(&mut self, scheme: &str, value: Option<&str>) {
        let value = match value {
            None | Some(DISABLED) => {
                self.0.insert(scheme.to_string(), None);
                return;
            }
            Some(value) => value,
        };

        for line in value.lines() {
            match line.split_once('=') {
                Some((host, proxy)) => {
                    self.0.insert(
                        format!("{}://{}", scheme, host.trim()),
                        Some(proxy.trim().to_string()),
                    );
                }
                None => {
                    let proxy = line.trim();
                    if !proxy.is_empty() {
                        self.0.insert(scheme.to_string(), Some(proxy.to_string()));
                    }
                }
            }
        }
    }

    /// Raw entry for a proxy key. The outer `None` means "not configured".
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.0.get(key).map(Option::as_deref)
    }

    /// Proxy for a host, preferring the per-host entry over the scheme entry
    pub fn lookup(&self, scheme: &str, host: &str) -> Option<Option<&str>> {
        self.get(&format!("{}://{}", scheme, host))
            .or_else(|| self.get(scheme))
    }

    /// URL patterns listed under `no_proxy_match`
    pub fn no_proxy_match(&self) -> Vec<String> {
        match self.get(NO_PROXY_MATCH) {
            Some(Some(patterns)) => patterns
                .split(',')
                .map(str::trim)
                .filter(|pattern| !pattern.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
