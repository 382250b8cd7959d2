#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use secrecy::Secret;
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::domain::EmailObject;
    use crate::routes::destination::schemas::CreateDestinationRequest;
    use crate::routes::destination::utils::{create_destination, hard_delete_destination};
    use crate::routes::excursion::schemas::CreateExcursionRequest;
    use crate::routes::excursion::utils::{create_excursion, hard_delete_excursion};
    use crate::routes::payment::errors::PaymentError;
    use crate::routes::payment::schemas::{
        CreateManualPaymentRequest, GatewayNotificationStatus, PaymentNotificationRequest,
        PaymentStatus,
    };
    use crate::routes::payment::utils::{
        approve_payment, create_manual_payment, delete_payment, fetch_payments_for_purchase,
        insert_payment, mark_payment_refunded, record_gateway_payment,
    };
    use crate::routes::purchase::schemas::{PaymentType, PurchaseStatus};
    use crate::routes::purchase::utils::{fetch_purchase, hard_delete_purchase, insert_purchase};
    use crate::routes::user::schemas::{CreateUserAccount, UserRole};
    use crate::routes::user::utils::{hard_delete_user_account, register_user};
    use crate::utils::tests::get_test_pool;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    struct LedgerFixture {
        user_email: String,
        destination_id: i64,
        excursion_id: i64,
        purchase_id: i64,
    }

    async fn setup_purchase(pool: &PgPool, tag: &str, total: &str) -> LedgerFixture {
        let email = format!("{}@example.com", tag);
        let user_id: Uuid = register_user(
            pool,
            CreateUserAccount {
                username: tag.to_string(),
                email: EmailObject::new(email.clone()),
                password: Secret::new("s3cr3t@123".to_string()),
                display_name: "Test Traveller".to_string(),
                role: UserRole::Customer,
            },
        )
        .await
        .expect("Failed to register test user");
        let destination = create_destination(
            pool,
            CreateDestinationRequest {
                name: format!("Destination {}", tag),
                country: "Iceland".to_string(),
                description: "".to_string(),
                image_url: None,
            },
        )
        .await
        .expect("Failed to create test destination");
        let excursion = create_excursion(
            pool,
            CreateExcursionRequest {
                destination_id: destination.id,
                title: format!("Excursion {}", tag),
                description: "".to_string(),
                price: dec(total),
                capacity: 10,
                duration_hours: None,
            },
        )
        .await
        .expect("Failed to create test excursion");
        let purchase_id = insert_purchase(
            pool,
            user_id,
            excursion.id,
            1,
            &dec(total),
            PaymentType::Full,
        )
        .await
        .expect("Failed to insert purchase");
        LedgerFixture {
            user_email: email,
            destination_id: destination.id,
            excursion_id: excursion.id,
            purchase_id,
        }
    }

    async fn teardown(pool: &PgPool, fixture: &LedgerFixture) {
        hard_delete_purchase(pool, fixture.purchase_id).await.unwrap();
        hard_delete_excursion(pool, fixture.excursion_id).await.unwrap();
        hard_delete_destination(pool, fixture.destination_id).await.unwrap();
        hard_delete_user_account(pool, &fixture.user_email).await.unwrap();
    }

    #[tokio::test]
    async fn test_manual_payment_rejects_non_positive_amount() {
        let pool = get_test_pool().await;
        let fixture = setup_purchase(&pool, "payment.nonpos", "300.00").await;

        for amount in ["0", "-10.00"] {
            let res = create_manual_payment(
                &pool,
                CreateManualPaymentRequest {
                    purchase_id: fixture.purchase_id,
                    amount: dec(amount),
                    payment_type: PaymentType::Deposit,
                },
            )
            .await;
            assert!(matches!(res, Err(PaymentError::InvalidStateError(_))));
        }

        // The rejection performs no writes.
        let payments = fetch_payments_for_purchase(&pool, fixture.purchase_id)
            .await
            .unwrap();
        assert!(payments.is_empty());
        let purchase = fetch_purchase(&pool, fixture.purchase_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(purchase.amount_paid, dec("0"));
        assert_eq!(purchase.status, PurchaseStatus::Pending);

        teardown(&pool, &fixture).await;
    }

    #[tokio::test]
    async fn test_manual_payment_for_unknown_purchase() {
        let pool = get_test_pool().await;
        let res = create_manual_payment(
            &pool,
            CreateManualPaymentRequest {
                purchase_id: i64::MAX,
                amount: dec("10.00"),
                payment_type: PaymentType::Deposit,
            },
        )
        .await;
        assert!(matches!(res, Err(PaymentError::NotFoundError(_))));
    }

    #[tokio::test]
    async fn test_approve_payment_applies_balance_once() {
        let pool = get_test_pool().await;
        let fixture = setup_purchase(&pool, "payment.approve", "200.00").await;

        let payment_id = insert_payment(
            &pool,
            fixture.purchase_id,
            &dec("200.00"),
            PaymentType::Full,
            PaymentStatus::Pending,
        )
        .await
        .unwrap();

        // A pending payment has no balance effect until approved.
        let purchase = fetch_purchase(&pool, fixture.purchase_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(purchase.amount_paid, dec("0"));

        let approved = approve_payment(&pool, payment_id).await.unwrap();
        assert_eq!(approved.status, PaymentStatus::Succeeded);

        let purchase = fetch_purchase(&pool, fixture.purchase_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(purchase.amount_paid, dec("200.00"));
        assert_eq!(purchase.status, PurchaseStatus::Paid);

        // Approval is not repeatable.
        let res = approve_payment(&pool, payment_id).await;
        assert!(matches!(res, Err(PaymentError::InvalidStateError(_))));
        let purchase = fetch_purchase(&pool, fixture.purchase_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(purchase.amount_paid, dec("200.00"));

        let res = approve_payment(&pool, payment_id + 100_000).await;
        assert!(matches!(res, Err(PaymentError::NotFoundError(_))));

        teardown(&pool, &fixture).await;
    }

    #[tokio::test]
    async fn test_delete_payment_requires_pending_status() {
        let pool = get_test_pool().await;
        let fixture = setup_purchase(&pool, "payment.delete", "150.00").await;

        let pending_id = insert_payment(
            &pool,
            fixture.purchase_id,
            &dec("50.00"),
            PaymentType::Deposit,
            PaymentStatus::Pending,
        )
        .await
        .unwrap();
        let succeeded_id = insert_payment(
            &pool,
            fixture.purchase_id,
            &dec("50.00"),
            PaymentType::Deposit,
            PaymentStatus::Succeeded,
        )
        .await
        .unwrap();

        let res = delete_payment(&pool, succeeded_id).await;
        assert!(matches!(res, Err(PaymentError::InvalidStateError(_))));

        let res = delete_payment(&pool, pending_id).await;
        assert!(res.is_ok());

        let payments = fetch_payments_for_purchase(&pool, fixture.purchase_id)
            .await
            .unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].id, succeeded_id);

        teardown(&pool, &fixture).await;
    }

    #[tokio::test]
    async fn test_mark_refunded_keeps_purchase_balance() {
        let pool = get_test_pool().await;
        let fixture = setup_purchase(&pool, "payment.refund", "120.00").await;

        let payment = create_manual_payment(
            &pool,
            CreateManualPaymentRequest {
                purchase_id: fixture.purchase_id,
                amount: dec("120.00"),
                payment_type: PaymentType::Full,
            },
        )
        .await
        .unwrap();

        let refunded = mark_payment_refunded(&pool, payment.id).await.unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);

        // The running total is deliberately not reversed.
        let purchase = fetch_purchase(&pool, fixture.purchase_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(purchase.amount_paid, dec("120.00"));

        teardown(&pool, &fixture).await;
    }

    #[tokio::test]
    async fn test_gateway_notification_records_payment() {
        let pool = get_test_pool().await;
        let fixture = setup_purchase(&pool, "payment.webhook", "80.00").await;

        // A failed attempt is recorded with no balance effect.
        let failed = record_gateway_payment(
            &pool,
            PaymentNotificationRequest {
                purchase_id: fixture.purchase_id,
                session_id: "cs_test_1".to_string(),
                gateway_payment_id: "py_failed_1".to_string(),
                amount: dec("80.00"),
                payment_type: PaymentType::Full,
                status: GatewayNotificationStatus::Failed,
            },
        )
        .await
        .unwrap();
        assert_eq!(failed.status, PaymentStatus::Failed);
        let purchase = fetch_purchase(&pool, fixture.purchase_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(purchase.amount_paid, dec("0"));
        assert_eq!(purchase.status, PurchaseStatus::Pending);

        // The succeeded notification settles the full amount.
        let succeeded = record_gateway_payment(
            &pool,
            PaymentNotificationRequest {
                purchase_id: fixture.purchase_id,
                session_id: "cs_test_1".to_string(),
                gateway_payment_id: "py_ok_1".to_string(),
                amount: dec("80.00"),
                payment_type: PaymentType::Full,
                status: GatewayNotificationStatus::Succeeded,
            },
        )
        .await
        .unwrap();
        assert_eq!(succeeded.status, PaymentStatus::Succeeded);
        assert_eq!(succeeded.gateway_payment_id.as_deref(), Some("py_ok_1"));

        let purchase = fetch_purchase(&pool, fixture.purchase_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(purchase.amount_paid, dec("80.00"));
        assert_eq!(purchase.status, PurchaseStatus::Paid);

        teardown(&pool, &fixture).await;
    }
}
