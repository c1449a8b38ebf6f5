use anyhow::{Context, Result, bail};

use super::config_model::{
    AckPolicy, Aws, DotEnvyConfig, Queue, Server, Store, StoreKind, Topic, Topics,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    from_lookup(|key| std::env::var(key).ok())
}

/// Builds the config from any key lookup; `load` feeds it the process environment.
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<DotEnvyConfig> {
    let var = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };
    let required = |key: &str| var(key).with_context(|| format!("{key} is required"));

    let server = Server {
        port: required("SERVER_PORT")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: var("SERVER_BODY_LIMIT")
            .unwrap_or_else(|| "1".to_string())
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: var("SERVER_TIMEOUT")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let kind: StoreKind = var("PAYMENT_STORE")
        .unwrap_or_else(|| "postgres".to_string())
        .parse()
        .context("PAYMENT_STORE is invalid")?;
    let database_url = var("DATABASE_URL");
    if kind == StoreKind::Postgres && database_url.is_none() {
        bail!("DATABASE_URL is required when PAYMENT_STORE is postgres");
    }
    let store = Store { kind, database_url };

    let aws = Aws {
        base_endpoint: var("AWS_BASE_ENDPOINT"),
    };

    let max_messages: i32 = var("QUEUE_MAX_MESSAGES")
        .unwrap_or_else(|| "10".to_string())
        .parse()
        .context("QUEUE_MAX_MESSAGES is invalid")?;
    if !(1..=10).contains(&max_messages) {
        bail!("QUEUE_MAX_MESSAGES must be between 1 and 10, got {max_messages}");
    }

    let wait_time_seconds: i32 = var("QUEUE_WAIT_TIME_SECONDS")
        .unwrap_or_else(|| "20".to_string())
        .parse()
        .context("QUEUE_WAIT_TIME_SECONDS is invalid")?;
    if !(0..=20).contains(&wait_time_seconds) {
        bail!("QUEUE_WAIT_TIME_SECONDS must be between 0 and 20, got {wait_time_seconds}");
    }

    let queue = Queue {
        name: required("ORDER_PAYMENT_QUEUE")?,
        max_messages,
        wait_time_seconds,
        ack_policy: var("QUEUE_ACK_POLICY")
            .map(|raw| raw.parse::<AckPolicy>())
            .transpose()
            .context("QUEUE_ACK_POLICY is invalid")?
            .unwrap_or_default(),
    };

    let topics = Topics {
        order_production: Topic {
            name: required("ORDER_PRODUCTION_TOPIC")?,
            arn: var("ORDER_PRODUCTION_TOPIC_ARN"),
        },
        update_order: Topic {
            name: required("UPDATE_ORDER_TOPIC")?,
            arn: var("UPDATE_ORDER_TOPIC_ARN"),
        },
    };

    Ok(DotEnvyConfig {
        server,
        store,
        aws,
        queue,
        topics,
    })
}
