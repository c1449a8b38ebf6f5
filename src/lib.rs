pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod worker;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    application::usecases::{
        create_payment::CreatePaymentUseCase, gateway_dispatch::GatewayDispatchUseCase,
        get_payments::GetPaymentsUseCase, notification_publisher::NotificationPublisher,
        payment_webhook::PaymentWebhookUseCase, update_payment::UpdatePaymentUseCase,
    },
    config::config_model::StoreKind,
    domain::repositories::{
        message_queue::MessageQueue, payment_gateway::PaymentGateway,
        payments::PaymentRepository, topic_publisher::TopicPublisher,
    },
    infrastructure::{
        aws::{sdk_config, sns_topic::SnsTopic, sqs_queue::SqsQueue},
        axum_http::{http_serve, routers::payments::PaymentsState},
        gateway::stub_gateway::StubPaymentGateway,
        in_memory::payments::PaymentInMemory,
        postgres::{postgres_connection, repositories::payments::PaymentPostgres},
    },
    worker::queue_consumer::QueueConsumer,
};

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("payment-management")?;

    let dotenvy_env = config::config_loader::load()?;
    info!("ENV has been loaded");

    let payment_repository: Arc<dyn PaymentRepository + Send + Sync> =
        match dotenvy_env.store.kind {
            StoreKind::Postgres => {
                let database_url = dotenvy_env
                    .store
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required")?;
                let postgres_pool = postgres_connection::establish_connection(database_url)?;
                info!("Postgres connection has been established");
                Arc::new(PaymentPostgres::new(Arc::new(postgres_pool)))
            }
            StoreKind::Memory => {
                warn!("Using the in-memory payment store, payments are lost on restart");
                Arc::new(PaymentInMemory::new())
            }
        };

    let aws_config = sdk_config::load(&dotenvy_env.aws).await;

    let queue: Arc<dyn MessageQueue + Send + Sync> =
        Arc::new(SqsQueue::new(&aws_config, &dotenvy_env.queue).await?);
    let order_production_topic: Arc<dyn TopicPublisher + Send + Sync> =
        Arc::new(SnsTopic::new(&aws_config, &dotenvy_env.topics.order_production).await?);
    let update_order_topic: Arc<dyn TopicPublisher + Send + Sync> =
        Arc::new(SnsTopic::new(&aws_config, &dotenvy_env.topics.update_order).await?);
    info!("Queue and topics have been resolved");

    let payment_gateway: Arc<dyn PaymentGateway + Send + Sync> = Arc::new(StubPaymentGateway);

    let create_payment_usecase = Arc::new(CreatePaymentUseCase::new(Arc::clone(
        &payment_repository,
    )));
    let gateway_dispatch_usecase = Arc::new(GatewayDispatchUseCase::new(payment_gateway));
    let update_payment_usecase = Arc::new(UpdatePaymentUseCase::new(Arc::clone(
        &payment_repository,
    )));
    let get_payments_usecase = Arc::new(GetPaymentsUseCase::new(Arc::clone(
        &payment_repository,
    )));
    let notification_publisher = Arc::new(NotificationPublisher::new(
        order_production_topic,
        update_order_topic,
    ));
    let payment_webhook_usecase = Arc::new(PaymentWebhookUseCase::new(
        update_payment_usecase,
        notification_publisher,
    ));

    let queue_consumer = Arc::new(QueueConsumer::new(
        queue,
        create_payment_usecase,
        gateway_dispatch_usecase,
        dotenvy_env.queue.ack_policy,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    let signal_tx = Arc::clone(&shutdown_tx);
    tokio::spawn(async move {
        http_serve::shutdown_signal().await;
        signal_tx.send_replace(true);
    });

    let mut consumer_task = tokio::spawn(queue_consumer.run(shutdown_rx.clone()));
    let mut server_task = tokio::spawn(http_serve::start(
        dotenvy_env.server.clone(),
        PaymentsState {
            payment_webhook_usecase,
            get_payments_usecase,
        },
        shutdown_rx,
    ));

    // Whichever side stops first takes the other one down with it.
    let (consumer_result, server_result) = tokio::select! {
        result = &mut consumer_task => {
            shutdown_tx.send_replace(true);
            (result, server_task.await)
        }
        result = &mut server_task => {
            shutdown_tx.send_replace(true);
            (consumer_task.await, result)
        }
    };

    consumer_result??;
    server_result??;

    info!("Payment service stopped");
    Ok(())
}
