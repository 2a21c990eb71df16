//! Browser extension match patterns (`<scheme>://<host><path>`)
//!
//! - scheme: `*` (http or https) or a literal scheme
//! - host: `*`, `*.` followed by a domain (the domain itself or any
//!   subdomain), or a literal host; ports are ignored
//! - path: literal text where `*` matches any run of characters, query included

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("match pattern '{0}' has no scheme separator")]
    MissingScheme(String),

    #[error("match pattern '{0}' has no path")]
    MissingPath(String),

    #[error("invalid host wildcard in '{0}'")]
    BadHost(String),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// A compiled match pattern
#[derive(Debug, Clone)]
pub struct UrlPattern {
    scheme: Option<String>,
    host: Regex,
    path: Regex,
}

impl UrlPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let (scheme, rest) = pattern
            .split_once("://")
            .ok_or_else(|| PatternError::MissingScheme(pattern.to_string()))?;
        let slash = rest
            .find('/')
            .ok_or_else(|| PatternError::MissingPath(pattern.to_string()))?;
        let (host, path) = rest.split_at(slash);

        let host = if host == "*" {
            Regex::new(r"^[^/]+$")?
        } else if let Some(domain) = host.strip_prefix("*.") {
            if domain.is_empty() || domain.contains('*') {
                return Err(PatternError::BadHost(pattern.to_string()));
            }
            Regex::new(&format!(r"(?i)^(?:[^/]+\.)?{}$", regex::escape(domain)))?
        } else if host.contains('*') || host.is_empty() {
            return Err(PatternError::BadHost(pattern.to_string()));
        } else {
            Regex::new(&format!(r"(?i)^{}$", regex::escape(host)))?
        };

        let path = path
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        Ok(Self {
            scheme: (scheme != "*").then(|| scheme.to_lowercase()),
            host,
            path: Regex::new(&format!("^{}$", path))?,
        })
    }

    pub fn matches(&self, url: &str) -> bool {
        let Some((scheme, rest)) = url.split_once("://") else {
            return false;
        };

        let scheme = scheme.to_lowercase();
        let scheme_ok = match &self.scheme {
            Some(expected) => *expected == scheme,
            None => scheme == "http" || scheme == "https",
        };
        if !scheme_ok {
            return false;
        }

        let (authority, path) = match rest.find(['/', '?', '#']) {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        // drop userinfo and port
        let host = authority.rsplit('@').next().unwrap_or(authority);
        let host = host.split(':').next().unwrap_or(host);

        // fragments never take part in matching
        let path = path.split('#').next().unwrap_or("");
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        self.host.is_match(host) && self.path.is_match(&path)
    }
}

/// Whether `url` matches `pattern`; an invalid pattern matches nothing
pub fn matches_url_pattern(pattern: &str, url: &str) -> bool {
    match UrlPattern::parse(pattern) {
        Ok(pattern) => pattern.matches(url),
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    }
}
