use anyhow::Context;
use bigdecimal::BigDecimal;
use chrono::{Duration, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::errors::PurchaseError;
use super::models::{PurchaseBalanceModel, PurchaseDetailModel};
use super::schemas::{
    CheckoutData, CheckoutRequest, PaymentType, PurchaseListFilter, PurchaseStatus,
    UpdatePurchaseRequest,
};
use crate::checkout_client::{CheckoutClient, CheckoutSessionCreateRequest};
use crate::configuration::CheckoutSettings;
use crate::routes::excursion::utils::fetch_bookable_excursion;
use crate::routes::user::schemas::UserAccount;
use crate::schemas::Pagination;

const PURCHASE_DETAIL_SELECT: &str = r#"
    SELECT p.id, p.user_id, u.email AS user_email, u.display_name AS user_name,
           p.excursion_id, e.title AS excursion_title, d.name AS destination_name,
           p.number_of_people, p.payment_type, p.total_amount, p.amount_paid,
           p.status, p.refund_status, p.expires_at, p.created_at, p.updated_at
    FROM purchase p
    JOIN user_account u ON u.id = p.user_id
    JOIN excursion e ON e.id = p.excursion_id
    JOIN destination d ON d.id = e.destination_id
"#;

/// Remaining balance, clamped so it never goes negative.
pub fn remaining_amount(total_amount: &BigDecimal, amount_paid: &BigDecimal) -> BigDecimal {
    let remaining = total_amount - amount_paid;
    if remaining < BigDecimal::from(0) {
        BigDecimal::from(0)
    } else {
        remaining
    }
}

/// Post-increment balance and the status it implies: `paid` exactly when the
/// new running total covers the full amount, `reserved` otherwise.
pub fn compute_balance(
    total_amount: &BigDecimal,
    amount_paid: &BigDecimal,
    amount: &BigDecimal,
) -> (BigDecimal, PurchaseStatus) {
    let new_amount_paid = amount_paid + amount;
    let status = if new_amount_paid >= *total_amount {
        PurchaseStatus::Paid
    } else {
        PurchaseStatus::Reserved
    };
    (new_amount_paid, status)
}

/// Locks the purchase row for the duration of the enclosing transaction.
/// Every balance-affecting write goes through this lock so concurrent
/// approvals serialize instead of under-counting `amount_paid`.
#[tracing::instrument(name = "Fetch purchase with lock", skip(transaction))]
pub async fn fetch_purchase_for_update(
    transaction: &mut Transaction<'_, Postgres>,
    purchase_id: i64,
) -> Result<Option<PurchaseBalanceModel>, anyhow::Error> {
    let row = sqlx::query_as::<_, PurchaseBalanceModel>(
        r#"
        SELECT id, total_amount, amount_paid
        FROM purchase
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(purchase_id)
    .fetch_optional(&mut **transaction)
    .await
    .context("A database failure occurred while fetching the purchase with a row lock")?;
    Ok(row)
}

/// Applies a succeeded payment amount to a locked purchase row.
#[tracing::instrument(name = "Apply payment to purchase", skip(transaction, purchase))]
pub async fn apply_payment_to_purchase(
    transaction: &mut Transaction<'_, Postgres>,
    purchase: &PurchaseBalanceModel,
    amount: &BigDecimal,
) -> Result<(BigDecimal, PurchaseStatus), anyhow::Error> {
    let (new_amount_paid, new_status) =
        compute_balance(&purchase.total_amount, &purchase.amount_paid, amount);
    sqlx::query(
        r#"
        UPDATE purchase SET amount_paid = $2, status = $3 WHERE id = $1
        "#,
    )
    .bind(purchase.id)
    .bind(&new_amount_paid)
    .bind(new_status)
    .execute(&mut **transaction)
    .await
    .context("A database failure occurred while updating the purchase balance")?;
    Ok((new_amount_paid, new_status))
}

#[tracing::instrument(name = "Initiate checkout", skip(pool, checkout_client, checkout_settings, user))]
pub async fn initiate_checkout(
    pool: &PgPool,
    checkout_client: &CheckoutClient,
    checkout_settings: &CheckoutSettings,
    user: &UserAccount,
    request: CheckoutRequest,
) -> Result<CheckoutData, PurchaseError> {
    if request.number_of_people <= 0 {
        return Err(PurchaseError::InvalidStateError(
            "Number of people must be positive".to_string(),
        ));
    }
    let excursion = fetch_bookable_excursion(pool, request.excursion_id)
        .await
        .map_err(PurchaseError::UnexpectedError)?
        .ok_or_else(|| PurchaseError::NotFoundError("Excursion not found".to_string()))?;

    // The price basis is fixed at creation; later excursion price changes
    // never move an existing purchase.
    let total_amount = &excursion.price * BigDecimal::from(request.number_of_people);
    let expires_at = Utc::now() + Duration::hours(checkout_settings.reservation_hold_hours);

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")
        .map_err(|e| PurchaseError::UnexpectedCustomError(e.to_string()))?;

    let purchase_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO purchase
            (user_id, excursion_id, number_of_people, total_amount, payment_type, expires_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(user.id)
    .bind(excursion.id)
    .bind(request.number_of_people)
    .bind(&total_amount)
    .bind(request.payment_type)
    .bind(expires_at)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query while creating purchase: {:?}", e);
        PurchaseError::DatabaseError(
            "A database failure occurred while creating the purchase".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    // The session is created before commit; a gateway failure rolls the
    // pending purchase back instead of leaving an orphan.
    let session = checkout_client
        .create_session(CheckoutSessionCreateRequest {
            reference: purchase_id,
            amount: &total_amount,
            currency: &checkout_settings.currency,
            customer_email: &user.email,
            success_url: &checkout_settings.success_url,
            cancel_url: &checkout_settings.cancel_url,
        })
        .await
        .map_err(|e| PurchaseError::UnexpectedCustomError(e.to_string()))?;

    sqlx::query(r#"UPDATE purchase SET checkout_session_id = $2 WHERE id = $1"#)
        .bind(purchase_id)
        .bind(&session.id)
        .execute(&mut *transaction)
        .await
        .map_err(|e| {
            PurchaseError::DatabaseError(
                "A database failure occurred while storing the checkout session".to_string(),
                anyhow::Error::new(e),
            )
        })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store the purchase")
        .map_err(|e| PurchaseError::UnexpectedCustomError(e.to_string()))?;

    Ok(CheckoutData {
        purchase_id,
        checkout_url: session.url,
        expires_at: Some(expires_at),
    })
}

#[tracing::instrument(name = "Fetch purchases for user", skip(pool))]
pub async fn fetch_purchases_for_user(
    pool: &PgPool,
    user_id: Uuid,
    pagination: &Pagination,
) -> Result<Vec<PurchaseDetailModel>, anyhow::Error> {
    let rows = sqlx::query_as::<_, PurchaseDetailModel>(&format!(
        r#"
        {}
        WHERE p.user_id = $1
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
        PURCHASE_DETAIL_SELECT
    ))
    .bind(user_id)
    .bind(pagination.limit)
    .bind(pagination.offset)
    .fetch_all(pool)
    .await
    .context("A database failure occurred while fetching the user's purchases")?;
    Ok(rows)
}

#[tracing::instrument(name = "Fetch purchase for user", skip(pool))]
pub async fn fetch_purchase_for_user(
    pool: &PgPool,
    user_id: Uuid,
    purchase_id: i64,
) -> Result<Option<PurchaseDetailModel>, anyhow::Error> {
    let row = sqlx::query_as::<_, PurchaseDetailModel>(&format!(
        r#"{} WHERE p.id = $1 AND p.user_id = $2"#,
        PURCHASE_DETAIL_SELECT
    ))
    .bind(purchase_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("A database failure occurred while fetching the purchase")?;
    Ok(row)
}

#[tracing::instrument(name = "Fetch purchases", skip(pool))]
pub async fn fetch_purchases(
    pool: &PgPool,
    filter: &PurchaseListFilter,
) -> Result<Vec<PurchaseDetailModel>, anyhow::Error> {
    let rows = sqlx::query_as::<_, PurchaseDetailModel>(&format!(
        r#"
        {}
        WHERE ($1::purchase_status IS NULL OR p.status = $1)
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
        PURCHASE_DETAIL_SELECT
    ))
    .bind(filter.status)
    .bind(filter.limit)
    .bind(filter.offset)
    .fetch_all(pool)
    .await
    .context("A database failure occurred while fetching purchases")?;
    Ok(rows)
}

#[tracing::instrument(name = "Fetch purchase", skip(pool))]
pub async fn fetch_purchase(
    pool: &PgPool,
    purchase_id: i64,
) -> Result<Option<PurchaseDetailModel>, anyhow::Error> {
    let row = sqlx::query_as::<_, PurchaseDetailModel>(&format!(
        r#"{} WHERE p.id = $1"#,
        PURCHASE_DETAIL_SELECT
    ))
    .bind(purchase_id)
    .fetch_optional(pool)
    .await
    .context("A database failure occurred while fetching the purchase")?;
    Ok(row)
}

/// Partial update of status/refund_status/expires_at. An empty patch is an
/// idempotent success. No transition table is applied: any requested status
/// overwrites the stored one.
#[tracing::instrument(name = "Update purchase", skip(pool))]
pub async fn update_purchase(
    pool: &PgPool,
    purchase_id: i64,
    request: UpdatePurchaseRequest,
) -> Result<PurchaseDetailModel, PurchaseError> {
    if !request.is_empty() {
        let result = sqlx::query(
            r#"
            UPDATE purchase
            SET status = COALESCE($2, status),
                refund_status = COALESCE($3, refund_status),
                expires_at = COALESCE($4, expires_at)
            WHERE id = $1
            "#,
        )
        .bind(purchase_id)
        .bind(request.status)
        .bind(request.refund_status)
        .bind(request.expires_at)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query while updating purchase: {:?}", e);
            PurchaseError::DatabaseError(
                "A database failure occurred while updating the purchase".to_string(),
                anyhow::Error::new(e),
            )
        })?;
        if result.rows_affected() == 0 {
            return Err(PurchaseError::NotFoundError(
                "Purchase not found".to_string(),
            ));
        }
    }
    fetch_purchase(pool, purchase_id)
        .await
        .map_err(PurchaseError::UnexpectedError)?
        .ok_or_else(|| PurchaseError::NotFoundError("Purchase not found".to_string()))
}

/// Deletes a purchase only when no payment rows reference it.
#[tracing::instrument(name = "Delete purchase", skip(pool))]
pub async fn delete_purchase(pool: &PgPool, purchase_id: i64) -> Result<(), PurchaseError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")
        .map_err(|e| PurchaseError::UnexpectedCustomError(e.to_string()))?;

    let purchase = fetch_purchase_for_update(&mut transaction, purchase_id)
        .await
        .map_err(PurchaseError::UnexpectedError)?
        .ok_or_else(|| PurchaseError::NotFoundError("Purchase not found".to_string()))?;

    let payment_count = sqlx::query_scalar::<_, i64>(
        r#"SELECT COUNT(*) FROM payment WHERE purchase_id = $1"#,
    )
    .bind(purchase.id)
    .fetch_one(&mut *transaction)
    .await
    .context("A database failure occurred while counting payments")
    .map_err(PurchaseError::UnexpectedError)?;

    if payment_count > 0 {
        return Err(PurchaseError::ConflictError(
            "Cannot delete a purchase with associated payments".to_string(),
        ));
    }

    sqlx::query(r#"DELETE FROM purchase WHERE id = $1"#)
        .bind(purchase.id)
        .execute(&mut *transaction)
        .await
        .map_err(|e| {
            PurchaseError::DatabaseError(
                "A database failure occurred while deleting the purchase".to_string(),
                anyhow::Error::new(e),
            )
        })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to delete the purchase")
        .map_err(|e| PurchaseError::UnexpectedCustomError(e.to_string()))?;
    Ok(())
}

/// Test support: direct insert without touching the checkout gateway.
#[tracing::instrument(name = "Insert purchase", skip(pool))]
pub async fn insert_purchase(
    pool: &PgPool,
    user_id: Uuid,
    excursion_id: i64,
    number_of_people: i32,
    total_amount: &BigDecimal,
    payment_type: PaymentType,
) -> Result<i64, anyhow::Error> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO purchase (user_id, excursion_id, number_of_people, total_amount, payment_type)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(excursion_id)
    .bind(number_of_people)
    .bind(total_amount)
    .bind(payment_type)
    .fetch_one(pool)
    .await
    .context("A database failure occurred while inserting the purchase")?;
    Ok(id)
}

#[tracing::instrument(name = "Hard delete purchase", skip(pool))]
pub async fn hard_delete_purchase(pool: &PgPool, purchase_id: i64) -> Result<(), anyhow::Error> {
    sqlx::query(r#"DELETE FROM payment WHERE purchase_id = $1"#)
        .bind(purchase_id)
        .execute(pool)
        .await
        .context("A database failure occurred while deleting payments")?;
    sqlx::query(r#"DELETE FROM purchase WHERE id = $1"#)
        .bind(purchase_id)
        .execute(pool)
        .await
        .context("A database failure occurred while deleting the purchase")?;
    Ok(())
}
