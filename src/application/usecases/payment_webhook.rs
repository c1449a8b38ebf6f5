use std::sync::Arc;

use tracing::{error, info};

use crate::{
    application::usecases::{
        notification_publisher::NotificationPublisher, update_payment::UpdatePaymentUseCase,
    },
    domain::{
        errors::PaymentResult,
        value_objects::{
            enums::payment_states::PaymentState,
            payments::{PaymentModel, UpdatePaymentModel},
        },
    },
};

pub struct PaymentWebhookUseCase {
    update_payment_usecase: Arc<UpdatePaymentUseCase>,
    notification_publisher: Arc<NotificationPublisher>,
}

impl PaymentWebhookUseCase {
    pub fn new(
        update_payment_usecase: Arc<UpdatePaymentUseCase>,
        notification_publisher: Arc<NotificationPublisher>,
    ) -> Self {
        Self {
            update_payment_usecase,
            notification_publisher,
        }
    }

    /// Settles (or resends) the payment, then notifies downstream.
    ///
    /// Publishing is best effort: once the state is committed a failed publish is only logged.
    /// The production topic is told about fresh approvals only; the update topic hears about
    /// every outcome, resends included.
    pub async fn handle(&self, request: UpdatePaymentModel) -> PaymentResult<PaymentModel> {
        let resend = request.resend;
        let payment = self.update_payment_usecase.update(request).await?;

        if !resend && payment.state() == PaymentState::Approved {
            info!(
                payment_id = %payment.payment_id,
                "payment_webhook: payment approved, notifying order production"
            );
            if let Err(err) = self
                .notification_publisher
                .publish_order_production(&payment)
                .await
            {
                error!(
                    payment_id = %payment.payment_id,
                    error = ?err,
                    "payment_webhook: order production notification failed"
                );
            }
        }

        info!(
            payment_id = %payment.payment_id,
            state = %payment.state(),
            resend,
            "payment_webhook: notifying order update"
        );
        if let Err(err) = self
            .notification_publisher
            .publish_order_update(&payment)
            .await
        {
            error!(
                payment_id = %payment.payment_id,
                error = ?err,
                "payment_webhook: order update notification failed"
            );
        }

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        errors::PaymentError,
        repositories::{payments::MockPaymentRepository, topic_publisher::MockTopicPublisher},
        value_objects::payments::PaymentItemModel,
    };
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn stored_payment(state: PaymentState) -> PaymentModel {
        let now = Utc::now();
        PaymentModel::with_state(
            "O1".to_string(),
            "P1".to_string(),
            vec![PaymentItemModel {
                id: "I1".to_string(),
                name: "Burger".to_string(),
                quantity: 1,
            }],
            1,
            dec!(59.98),
            state,
            now,
            now,
        )
    }

    fn usecase(
        repository: MockPaymentRepository,
        production: MockTopicPublisher,
        update: MockTopicPublisher,
    ) -> PaymentWebhookUseCase {
        PaymentWebhookUseCase::new(
            Arc::new(UpdatePaymentUseCase::new(Arc::new(repository))),
            Arc::new(NotificationPublisher::new(
                Arc::new(production),
                Arc::new(update),
            )),
        )
    }

    fn topic(name: &'static str) -> MockTopicPublisher {
        let mut topic = MockTopicPublisher::new();
        topic.expect_topic_name().return_const(name.to_string());
        topic
    }

    fn request(approved: bool, resend: bool) -> UpdatePaymentModel {
        UpdatePaymentModel {
            payment_id: "P1".to_string(),
            approved,
            resend,
        }
    }

    #[tokio::test]
    async fn approval_notifies_both_topics() {
        let mut repository = MockPaymentRepository::new();
        repository
            .expect_get_by_id()
            .returning(|_| Ok(stored_payment(PaymentState::WaitingForApproval)));
        repository.expect_update().times(1).returning(|_| Ok(()));

        let mut production = topic("OrderProductionTopic");
        production
            .expect_publish()
            .times(1)
            .returning(|_| Ok(Some("m-1".to_string())));
        let mut update = topic("UpdateOrderTopic");
        update
            .expect_publish()
            .withf(|body| body.contains("\"state\":\"Approved\""))
            .times(1)
            .returning(|_| Ok(Some("m-2".to_string())));

        let payment = usecase(repository, production, update)
            .handle(request(true, false))
            .await
            .unwrap();

        assert_eq!(payment.state(), PaymentState::Approved);
    }

    #[tokio::test]
    async fn rejection_skips_production_topic() {
        let mut repository = MockPaymentRepository::new();
        repository
            .expect_get_by_id()
            .returning(|_| Ok(stored_payment(PaymentState::WaitingForApproval)));
        repository.expect_update().returning(|_| Ok(()));

        let mut production = topic("OrderProductionTopic");
        production.expect_publish().never();
        let mut update = topic("UpdateOrderTopic");
        update
            .expect_publish()
            .withf(|body| body.contains("\"state\":\"Rejected\""))
            .times(1)
            .returning(|_| Ok(None));

        let payment = usecase(repository, production, update)
            .handle(request(false, false))
            .await
            .unwrap();

        assert_eq!(payment.state(), PaymentState::Rejected);
    }

    #[tokio::test]
    async fn resend_only_republishes_update() {
        let mut repository = MockPaymentRepository::new();
        repository
            .expect_get_by_id()
            .returning(|_| Ok(stored_payment(PaymentState::Approved)));
        repository.expect_update().never();

        let mut production = topic("OrderProductionTopic");
        production.expect_publish().never();
        let mut update = topic("UpdateOrderTopic");
        update.expect_publish().times(1).returning(|_| Ok(None));

        let payment = usecase(repository, production, update)
            .handle(request(true, true))
            .await
            .unwrap();

        assert_eq!(payment.state(), PaymentState::Approved);
    }

    #[tokio::test]
    async fn publish_failures_do_not_fail_the_webhook() {
        let mut repository = MockPaymentRepository::new();
        repository
            .expect_get_by_id()
            .returning(|_| Ok(stored_payment(PaymentState::WaitingForApproval)));
        repository.expect_update().times(1).returning(|_| Ok(()));

        let mut production = topic("OrderProductionTopic");
        production
            .expect_publish()
            .returning(|_| Err(anyhow::anyhow!("broker down")));
        let mut update = topic("UpdateOrderTopic");
        update
            .expect_publish()
            .returning(|_| Err(anyhow::anyhow!("broker down")));

        let payment = usecase(repository, production, update)
            .handle(request(true, false))
            .await
            .unwrap();

        assert_eq!(payment.state(), PaymentState::Approved);
    }

    #[tokio::test]
    async fn update_errors_skip_notifications() {
        let mut repository = MockPaymentRepository::new();
        repository
            .expect_get_by_id()
            .returning(|_| Ok(stored_payment(PaymentState::Rejected)));

        let mut production = topic("OrderProductionTopic");
        production.expect_publish().never();
        let mut update = topic("UpdateOrderTopic");
        update.expect_publish().never();

        let err = usecase(repository, production, update)
            .handle(request(true, false))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::PaymentAlreadyInState));
    }
}
