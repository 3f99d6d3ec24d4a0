use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Request timeout cannot be 0")]
    InvalidRequestTimeout,

    #[error("Duplicate provider name: {0}")]
    DuplicateProvider(String),

    #[error("Empty provider name")]
    EmptyProviderName,
}

/// Aggregator configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Main listener for incoming requests
    pub listener: Listener,
    /// Per-request deadline for provider fan-out, in milliseconds
    pub request_timeout_ms: u64,
    /// Fare sources to query on every cache miss
    pub providers: Vec<ProviderConfig>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;

        if self.request_timeout_ms == 0 {
            return Err(ValidationError::InvalidRequestTimeout);
        }

        let mut names = HashSet::new();
        for provider in &self.providers {
            if provider.name.is_empty() {
                return Err(ValidationError::EmptyProviderName);
            }
            if !names.insert(&provider.name) {
                return Err(ValidationError::DuplicateProvider(provider.name.clone()));
            }
        }

        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// One stub fare source.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Unique identifier for this provider
    pub name: String,
    /// Simulated upstream latency
    #[serde(default)]
    pub delay_ms: u64,
    /// Number of offers fabricated per search
    #[serde(default = "default_offers")]
    pub offers: u32,
}

fn default_offers() -> u32 {
    1
}
