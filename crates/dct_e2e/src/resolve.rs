//! Layered value resolution.
//!
//! A value is looked up in an ordered list of sources (explicit, then
//! environment, then default); the first non-empty value wins.

use std::collections::HashMap;

use tracing::debug;

/// Source of environment variables.
pub trait EnvLookup: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// One layer of a [`LayeredValue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// A value given directly, e.g. a compiled-in license
    Explicit(String),
    /// The named environment variable
    Environment(String),
    /// Fallback value
    Default(String),
}

impl ValueSource {
    fn lookup(&self, env: &dyn EnvLookup) -> Option<String> {
        match self {
            Self::Explicit(value) | Self::Default(value) => Some(value.clone()),
            Self::Environment(key) => env.var(key),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Explicit(_) => "explicit value".to_string(),
            Self::Environment(key) => format!("${}", key),
            Self::Default(_) => "default".to_string(),
        }
    }
}

/// Ordered list of sources for a single value.
#[derive(Debug, Clone, Default)]
pub struct LayeredValue {
    sources: Vec<ValueSource>,
}

impl LayeredValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn explicit(mut self, value: impl Into<String>) -> Self {
        self.sources.push(ValueSource::Explicit(value.into()));
        self
    }

    pub fn environment(mut self, key: impl Into<String>) -> Self {
        self.sources.push(ValueSource::Environment(key.into()));
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.sources.push(ValueSource::Default(value.into()));
        self
    }

    pub fn sources(&self) -> &[ValueSource] {
        &self.sources
    }

    /// First non-empty value across the sources, in order.
    pub fn resolve(&self, env: &dyn EnvLookup) -> Option<String> {
        self.sources.iter().find_map(|source| {
            let value = source.lookup(env).filter(|v| !v.is_empty())?;
            debug!("Resolved value from {}", source.describe());
            Some(value)
        })
    }

    /// Like [`resolve`](Self::resolve), with an empty string when nothing matched.
    pub fn resolve_or_empty(&self, env: &dyn EnvLookup) -> String {
        self.resolve(env).unwrap_or_default()
    }
}
