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
    use crate::routes::payment::schemas::CreateManualPaymentRequest;
    use crate::routes::payment::utils::create_manual_payment;
    use crate::routes::purchase::errors::PurchaseError;
    use crate::routes::purchase::schemas::{
        PaymentType, PurchaseStatus, RefundStatus, UpdatePurchaseRequest,
    };
    use crate::routes::purchase::utils::{
        compute_balance, delete_purchase, fetch_purchase, hard_delete_purchase, insert_purchase,
        remaining_amount, update_purchase,
    };
    use crate::routes::user::schemas::{CreateUserAccount, UserRole};
    use crate::routes::user::utils::{hard_delete_user_account, register_user};
    use crate::utils::tests::get_test_pool;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    pub struct BookingFixture {
        pub user_id: Uuid,
        pub user_email: String,
        pub destination_id: i64,
        pub excursion_id: i64,
    }

    pub async fn setup_booking_fixture(pool: &PgPool, tag: &str, price: &str) -> BookingFixture {
        let email = format!("{}@example.com", tag);
        let user_id = register_user(
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
                country: "Portugal".to_string(),
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
                price: dec(price),
                capacity: 20,
                duration_hours: Some(4),
            },
        )
        .await
        .expect("Failed to create test excursion");

        BookingFixture {
            user_id,
            user_email: email,
            destination_id: destination.id,
            excursion_id: excursion.id,
        }
    }

    pub async fn teardown_booking_fixture(pool: &PgPool, fixture: &BookingFixture) {
        hard_delete_excursion(pool, fixture.excursion_id)
            .await
            .expect("Failed to delete test excursion");
        hard_delete_destination(pool, fixture.destination_id)
            .await
            .expect("Failed to delete test destination");
        hard_delete_user_account(pool, &fixture.user_email)
            .await
            .expect("Failed to delete test user");
    }

    #[test]
    fn test_remaining_amount_never_negative() {
        assert_eq!(remaining_amount(&dec("1000.00"), &dec("0")), dec("1000.00"));
        assert_eq!(remaining_amount(&dec("1000.00"), &dec("400.00")), dec("600.00"));
        assert_eq!(remaining_amount(&dec("1000.00"), &dec("1000.00")), dec("0"));
        // An overpayment clamps to zero instead of going negative.
        assert_eq!(remaining_amount(&dec("1000.00"), &dec("1200.00")), dec("0"));
    }

    #[test]
    fn test_compute_balance_status_derivation() {
        let (paid, status) = compute_balance(&dec("1000.00"), &dec("0"), &dec("400.00"));
        assert_eq!(paid, dec("400.00"));
        assert_eq!(status, PurchaseStatus::Reserved);

        let (paid, status) = compute_balance(&dec("1000.00"), &dec("400.00"), &dec("600.00"));
        assert_eq!(paid, dec("1000.00"));
        assert_eq!(status, PurchaseStatus::Paid);

        let (paid, status) = compute_balance(&dec("1000.00"), &dec("400.00"), &dec("700.00"));
        assert_eq!(paid, dec("1100.00"));
        assert_eq!(status, PurchaseStatus::Paid);

        // amount_paid only ever grows.
        assert!(paid >= dec("400.00"));
    }

    #[tokio::test]
    async fn test_purchase_ledger_end_to_end() {
        let pool = get_test_pool().await;
        let fixture = setup_booking_fixture(&pool, "ledger.e2e", "500.00").await;

        let purchase_id = insert_purchase(
            &pool,
            fixture.user_id,
            fixture.excursion_id,
            2,
            &dec("1000.00"),
            PaymentType::Deposit,
        )
        .await
        .expect("Failed to insert purchase");

        let purchase = fetch_purchase(&pool, purchase_id).await.unwrap().unwrap();
        assert_eq!(purchase.status, PurchaseStatus::Pending);
        assert_eq!(purchase.amount_paid, dec("0"));

        // A 400 deposit reserves the booking.
        create_manual_payment(
            &pool,
            CreateManualPaymentRequest {
                purchase_id,
                amount: dec("400.00"),
                payment_type: PaymentType::Deposit,
            },
        )
        .await
        .expect("Failed to record deposit");

        let purchase = fetch_purchase(&pool, purchase_id).await.unwrap().unwrap();
        assert_eq!(purchase.status, PurchaseStatus::Reserved);
        assert_eq!(purchase.amount_paid, dec("400.00"));
        assert_eq!(
            remaining_amount(&purchase.total_amount, &purchase.amount_paid),
            dec("600.00")
        );

        // Settling the remaining 600 completes the purchase.
        create_manual_payment(
            &pool,
            CreateManualPaymentRequest {
                purchase_id,
                amount: dec("600.00"),
                payment_type: PaymentType::Remaining,
            },
        )
        .await
        .expect("Failed to record remaining payment");

        let purchase = fetch_purchase(&pool, purchase_id).await.unwrap().unwrap();
        assert_eq!(purchase.status, PurchaseStatus::Paid);
        assert_eq!(purchase.amount_paid, dec("1000.00"));
        assert_eq!(
            remaining_amount(&purchase.total_amount, &purchase.amount_paid),
            dec("0")
        );

        // Two payment rows now guard the purchase against deletion.
        let delete_res = delete_purchase(&pool, purchase_id).await;
        assert!(matches!(delete_res, Err(PurchaseError::ConflictError(_))));

        hard_delete_purchase(&pool, purchase_id).await.unwrap();
        teardown_booking_fixture(&pool, &fixture).await;
    }

    #[tokio::test]
    async fn test_delete_purchase_without_payments() {
        let pool = get_test_pool().await;
        let fixture = setup_booking_fixture(&pool, "ledger.delete", "250.00").await;

        let purchase_id = insert_purchase(
            &pool,
            fixture.user_id,
            fixture.excursion_id,
            1,
            &dec("250.00"),
            PaymentType::Full,
        )
        .await
        .unwrap();

        let delete_res = delete_purchase(&pool, purchase_id).await;
        assert!(delete_res.is_ok());
        assert!(fetch_purchase(&pool, purchase_id).await.unwrap().is_none());

        let delete_res = delete_purchase(&pool, purchase_id).await;
        assert!(matches!(delete_res, Err(PurchaseError::NotFoundError(_))));

        teardown_booking_fixture(&pool, &fixture).await;
    }

    #[tokio::test]
    async fn test_update_purchase_partial_patch() {
        let pool = get_test_pool().await;
        let fixture = setup_booking_fixture(&pool, "ledger.patch", "100.00").await;

        let purchase_id = insert_purchase(
            &pool,
            fixture.user_id,
            fixture.excursion_id,
            1,
            &dec("100.00"),
            PaymentType::Full,
        )
        .await
        .unwrap();

        // An empty patch succeeds without changing anything.
        let unchanged = update_purchase(
            &pool,
            purchase_id,
            UpdatePurchaseRequest {
                status: None,
                refund_status: None,
                expires_at: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(unchanged.status, PurchaseStatus::Pending);
        assert_eq!(unchanged.refund_status, RefundStatus::None);

        // Status writes are not gated by a transition table.
        let updated = update_purchase(
            &pool,
            purchase_id,
            UpdatePurchaseRequest {
                status: Some(PurchaseStatus::Cancelled),
                refund_status: None,
                expires_at: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, PurchaseStatus::Cancelled);
        assert_eq!(updated.refund_status, RefundStatus::None);

        let updated = update_purchase(
            &pool,
            purchase_id,
            UpdatePurchaseRequest {
                status: Some(PurchaseStatus::RefundRequired),
                refund_status: Some(RefundStatus::Required),
                expires_at: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, PurchaseStatus::RefundRequired);
        assert_eq!(updated.refund_status, RefundStatus::Required);

        // Patching an unknown purchase reports NotFound.
        let missing = update_purchase(
            &pool,
            purchase_id + 100_000,
            UpdatePurchaseRequest {
                status: Some(PurchaseStatus::Cancelled),
                refund_status: None,
                expires_at: None,
            },
        )
        .await;
        assert!(matches!(missing, Err(PurchaseError::NotFoundError(_))));

        hard_delete_purchase(&pool, purchase_id).await.unwrap();
        teardown_booking_fixture(&pool, &fixture).await;
    }
}
