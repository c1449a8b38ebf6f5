mod common;

use std::sync::Arc;

use common::{
    PAYMENT_REQUEST, RecordingGateway, ScriptedQueue, notification_body, queue_message,
};
use payment_management::{
    application::usecases::{
        create_payment::CreatePaymentUseCase, gateway_dispatch::GatewayDispatchUseCase,
    },
    config::config_model::AckPolicy,
    domain::{
        errors::RepositoryError,
        repositories::{
            message_queue::MessageQueue, payment_gateway::PaymentGateway,
            payments::PaymentRepository,
        },
        value_objects::{
            enums::payment_states::PaymentState, payments::GatewayPaymentModel,
            queue_messages::QueueMessage,
        },
    },
    infrastructure::in_memory::payments::PaymentInMemory,
    worker::queue_consumer::QueueConsumer,
};
use rust_decimal_macros::dec;

struct Pipeline {
    queue: Arc<ScriptedQueue>,
    repository: Arc<PaymentInMemory>,
    gateway: Arc<RecordingGateway>,
}

async fn run_pipeline(batches: Vec<Vec<QueueMessage>>) -> Pipeline {
    let (queue, shutdown) = ScriptedQueue::new(batches);
    let queue = Arc::new(queue);
    let repository = Arc::new(PaymentInMemory::new());
    let gateway = Arc::new(RecordingGateway::default());

    let consumer = Arc::new(QueueConsumer::new(
        Arc::clone(&queue) as Arc<dyn MessageQueue + Send + Sync>,
        Arc::new(CreatePaymentUseCase::new(
            Arc::clone(&repository) as Arc<dyn PaymentRepository + Send + Sync>
        )),
        Arc::new(GatewayDispatchUseCase::new(
            Arc::clone(&gateway) as Arc<dyn PaymentGateway + Send + Sync>
        )),
        AckPolicy::Always,
    ));
    consumer.run(shutdown).await.unwrap();

    Pipeline {
        queue,
        repository,
        gateway,
    }
}

#[tokio::test]
async fn notification_creates_payment_and_reaches_gateway() {
    let pipeline = run_pipeline(vec![vec![queue_message(
        "m1",
        notification_body("notification", PAYMENT_REQUEST),
    )]])
    .await;

    let payment = pipeline
        .repository
        .get_by_id("P1".to_string())
        .await
        .unwrap();
    assert_eq!(payment.order_id, "O1");
    assert_eq!(payment.amount, dec!(59.98));
    assert_eq!(payment.state(), PaymentState::WaitingForApproval);
    assert_eq!(payment.items.len(), 1);
    assert_eq!(payment.items[0].name, "Burger");

    assert_eq!(
        pipeline.gateway.requests(),
        vec![GatewayPaymentModel {
            payment_id: "P1".to_string(),
            amount: dec!(59.98),
        }]
    );
    assert_eq!(pipeline.queue.deleted(), vec!["rh-m1".to_string()]);
}

#[tokio::test]
async fn redelivered_payment_is_created_once() {
    let pipeline = run_pipeline(vec![
        vec![
            queue_message("m1", notification_body("Notification", PAYMENT_REQUEST)),
            queue_message("m2", notification_body("Notification", PAYMENT_REQUEST)),
        ],
        vec![queue_message(
            "m3",
            notification_body("Notification", PAYMENT_REQUEST),
        )],
    ])
    .await;

    let payments = pipeline
        .repository
        .get_by_order_id("O1".to_string())
        .await
        .unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(pipeline.gateway.requests().len(), 1);
    assert_eq!(
        pipeline.queue.deleted(),
        vec!["rh-m1".to_string(), "rh-m2".to_string(), "rh-m3".to_string()]
    );
}

#[tokio::test]
async fn malformed_inner_payload_is_deleted_without_payment() {
    let pipeline = run_pipeline(vec![vec![queue_message(
        "m1",
        notification_body("Notification", "{\"order_id\": 42"),
    )]])
    .await;

    let err = pipeline
        .repository
        .get_by_id("P1".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
    assert!(pipeline.gateway.requests().is_empty());
    assert_eq!(pipeline.queue.deleted(), vec!["rh-m1".to_string()]);
}

#[tokio::test]
async fn unknown_message_type_is_deleted_without_parsing() {
    let pipeline = run_pipeline(vec![vec![queue_message(
        "m1",
        notification_body("SubscriptionConfirmation", PAYMENT_REQUEST),
    )]])
    .await;

    assert!(
        pipeline
            .repository
            .get_by_order_id("O1".to_string())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(pipeline.gateway.requests().is_empty());
    assert_eq!(pipeline.queue.deleted(), vec!["rh-m1".to_string()]);
}

#[tokio::test]
async fn invalid_request_is_deleted_and_valid_neighbours_still_land() {
    let zero_amount = PAYMENT_REQUEST
        .replace("\"P1\"", "\"P2\"")
        .replace("59.98", "0");

    let pipeline = run_pipeline(vec![vec![
        queue_message("m1", notification_body("Notification", &zero_amount)),
        queue_message("m2", notification_body("Notification", PAYMENT_REQUEST)),
    ]])
    .await;

    assert!(pipeline.repository.get_by_id("P2".to_string()).await.is_err());
    assert!(pipeline.repository.get_by_id("P1".to_string()).await.is_ok());
    assert_eq!(
        pipeline.queue.deleted(),
        vec!["rh-m1".to_string(), "rh-m2".to_string()]
    );
}
