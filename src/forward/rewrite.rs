//! URL rewriting onto the internal asset host.
//!
//! # Responsibilities
//! - Map the inbound path onto the static root convention
//! - Swap the host for the internal asset host identifier
//!
//! # Design Decisions
//! - Pure function of the inbound URL; no state survives a call
//! - No normalization: the original path is appended verbatim
//! - Scheme, port, query and fragment pass through untouched

use url::Url;

use crate::config::UpstreamConfig;

/// The fixed rewrite convention applied to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRules {
    internal_host: String,
    static_root: String,
    index_document: String,
}

impl RewriteRules {
    /// Create rules from explicit values.
    pub fn new(
        internal_host: impl Into<String>,
        static_root: impl Into<String>,
        index_document: impl Into<String>,
    ) -> Self {
        Self {
            internal_host: internal_host.into(),
            static_root: static_root.into(),
            index_document: index_document.into(),
        }
    }

    /// Build rules from the upstream section of the config.
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(
            &config.internal_host,
            &config.static_root,
            &config.index_document,
        )
    }

    /// Logical hostname of the internal asset host.
    pub fn internal_host(&self) -> &str {
        &self.internal_host
    }

    /// Rewritten path for an inbound path.
    pub fn rewrite_path(&self, path: &str) -> String {
        if path == "/" {
            self.index_document.clone()
        } else {
            format!("{}{}", self.static_root, path)
        }
    }

    /// Rewrite an inbound URL into the URL of the internal asset.
    pub fn rewrite(&self, inbound: &Url) -> Result<Url, url::ParseError> {
        let mut target = inbound.clone();
        target.set_path(&self.rewrite_path(inbound.path()));
        target.set_host(Some(&self.internal_host))?;
        Ok(target)
    }
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self::from_config(&UpstreamConfig::default())
    }
}
