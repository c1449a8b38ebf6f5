use std::{fmt, str::FromStr};

use anyhow::{Result, bail};

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub store: Store,
    pub aws: Aws,
    pub queue: Queue,
    pub topics: Topics,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// seconds
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Store {
    pub kind: StoreKind,
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => bail!("unknown payment store `{other}`, expected postgres or memory"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aws {
    pub base_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Queue {
    pub name: String,
    pub max_messages: i32,
    pub wait_time_seconds: i32,
    pub ack_policy: AckPolicy,
}

/// When a received message is deleted from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckPolicy {
    /// Delete after processing whatever the outcome.
    #[default]
    Always,
    /// Delete only when processing succeeded or failed for good (bad input, duplicate).
    /// Anything else is left for the queue's redelivery and redrive policy.
    OnSuccess,
}

impl FromStr for AckPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(AckPolicy::Always),
            "on_success" => Ok(AckPolicy::OnSuccess),
            other => bail!("unknown ack policy `{other}`, expected always or on_success"),
        }
    }
}

impl fmt::Display for AckPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AckPolicy::Always => write!(f, "always"),
            AckPolicy::OnSuccess => write!(f, "on_success"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Topics {
    pub order_production: Topic,
    pub update_order: Topic,
}

#[derive(Debug, Clone)]
pub struct Topic {
    pub name: String,
    pub arn: Option<String>,
}
