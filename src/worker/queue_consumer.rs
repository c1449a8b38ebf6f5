use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::{sync::watch, task::JoinSet};
use tracing::{Instrument, error, info, info_span, warn};

use crate::{
    application::usecases::{
        create_payment::CreatePaymentUseCase, gateway_dispatch::GatewayDispatchUseCase,
    },
    config::config_model::AckPolicy,
    domain::{
        errors::PaymentError,
        repositories::message_queue::MessageQueue,
        value_objects::{
            payments::{CreatePaymentModel, GatewayPaymentModel},
            queue_messages::{QueueMessage, TopicNotification},
        },
    },
    worker::keyed_lock::KeyedLock,
};

const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// What happened to a single queued message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Envelope unreadable or not a notification.
    Ignored,
    /// Inner payload unreadable or not a valid payment request.
    Discarded,
    Duplicate,
    Created,
    /// Infrastructure failure; a redelivery may succeed.
    Failed,
}

impl MessageOutcome {
    pub fn should_delete(self, policy: AckPolicy) -> bool {
        match policy {
            AckPolicy::Always => true,
            AckPolicy::OnSuccess => self != MessageOutcome::Failed,
        }
    }
}

pub struct QueueConsumer {
    queue: Arc<dyn MessageQueue + Send + Sync>,
    create_payment_usecase: Arc<CreatePaymentUseCase>,
    gateway_dispatch_usecase: Arc<GatewayDispatchUseCase>,
    ack_policy: AckPolicy,
    locks: KeyedLock,
    poll_error_backoff: Duration,
}

impl QueueConsumer {
    pub fn new(
        queue: Arc<dyn MessageQueue + Send + Sync>,
        create_payment_usecase: Arc<CreatePaymentUseCase>,
        gateway_dispatch_usecase: Arc<GatewayDispatchUseCase>,
        ack_policy: AckPolicy,
    ) -> Self {
        Self {
            queue,
            create_payment_usecase,
            gateway_dispatch_usecase,
            ack_policy,
            locks: KeyedLock::new(),
            poll_error_backoff: POLL_ERROR_BACKOFF,
        }
    }

    pub fn with_poll_error_backoff(mut self, backoff: Duration) -> Self {
        self.poll_error_backoff = backoff;
        self
    }

    /// Polls until `shutdown` flips to true (or its sender is dropped).
    /// A batch that was already received is always processed to the end.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let queue_name = self.queue.queue_name();
        info!(queue = %queue_name, ack_policy = %self.ack_policy, "queue_consumer: started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let received = tokio::select! {
                biased;
                result = self.queue.receive_messages() => result,
                _ = shutdown.wait_for(|stop| *stop) => break,
            };

            match received {
                Ok(messages) if messages.is_empty() => {}
                Ok(messages) => {
                    info!(queue = %queue_name, count = messages.len(), "queue_consumer: batch received");
                    Arc::clone(&self).process_batch(messages).await;
                }
                Err(err) => {
                    error!(queue = %queue_name, error = ?err, "queue_consumer: failed to receive messages");
                    tokio::select! {
                        _ = tokio::time::sleep(self.poll_error_backoff) => {}
                        _ = shutdown.wait_for(|stop| *stop) => break,
                    }
                }
            }
        }

        info!(queue = %queue_name, "queue_consumer: stopped");
        Ok(())
    }

    /// Processes every message concurrently and returns once all of them are done.
    pub async fn process_batch(self: Arc<Self>, messages: Vec<QueueMessage>) {
        let mut tasks = JoinSet::new();

        for message in messages {
            let consumer = Arc::clone(&self);
            let span = info_span!("queue_message", message_id = %message.message_id);
            tasks.spawn(async move { consumer.process_message(message).await }.instrument(span));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                error!(error = ?err, "queue_consumer: message task panicked");
            }
        }
    }

    pub async fn process_message(&self, message: QueueMessage) -> MessageOutcome {
        let outcome = self.handle_message(&message).await;

        if outcome.should_delete(self.ack_policy) {
            match self
                .queue
                .delete_message(message.receipt_handle.clone())
                .await
            {
                Ok(()) => info!(?outcome, "queue_consumer: message deleted"),
                Err(err) => error!(?outcome, error = ?err, "queue_consumer: failed to delete message"),
            }
        } else {
            warn!(?outcome, "queue_consumer: message left on the queue for redelivery");
        }

        outcome
    }

    pub async fn handle_message(&self, message: &QueueMessage) -> MessageOutcome {
        let notification: TopicNotification = match serde_json::from_str(&message.body) {
            Ok(notification) => notification,
            Err(err) => {
                warn!(error = %err, "queue_consumer: message envelope is not readable");
                return MessageOutcome::Ignored;
            }
        };

        if !notification.is_notification() {
            warn!(message_type = %notification.type_, "queue_consumer: unexpected message type");
            return MessageOutcome::Ignored;
        }

        let request: CreatePaymentModel = match serde_json::from_str(&notification.message) {
            Ok(request) => request,
            Err(err) => {
                error!(error = %err, "queue_consumer: payment request is not readable");
                return MessageOutcome::Discarded;
            }
        };

        let _guard = self.locks.lock(&request.payment_id).await;

        let payment = match self.create_payment_usecase.create(request).await {
            Ok(payment) => payment,
            Err(PaymentError::PaymentAlreadyExists) => return MessageOutcome::Duplicate,
            Err(err) if err.is_business() => {
                error!(error = %err, "queue_consumer: payment request rejected");
                return MessageOutcome::Discarded;
            }
            Err(err) => {
                error!(error = ?err, "queue_consumer: failed to create payment");
                return MessageOutcome::Failed;
            }
        };

        // The payment is committed at this point; a gateway failure only gets logged.
        if let Err(err) = self
            .gateway_dispatch_usecase
            .dispatch(GatewayPaymentModel::from(&payment))
            .await
        {
            error!(
                payment_id = %payment.payment_id,
                error = ?err,
                "queue_consumer: gateway dispatch failed"
            );
        }

        MessageOutcome::Created
    }
}
