use anyhow::Context;
use bigdecimal::BigDecimal;
use sqlx::{PgPool, Postgres, Transaction};

use super::errors::PaymentError;
use super::models::PaymentModel;
use super::schemas::{
    CreateManualPaymentRequest, GatewayNotificationStatus, PaymentData,
    PaymentNotificationRequest, PaymentStatus,
};
use crate::routes::purchase::schemas::PaymentType;
use crate::routes::purchase::utils::{apply_payment_to_purchase, fetch_purchase_for_update};

const PAYMENT_COLUMNS: &str =
    "id, purchase_id, amount, payment_type, status, gateway_payment_id, created_at, updated_at";

#[tracing::instrument(name = "Fetch payment with lock", skip(transaction))]
async fn fetch_payment_for_update(
    transaction: &mut Transaction<'_, Postgres>,
    payment_id: i64,
) -> Result<Option<PaymentModel>, anyhow::Error> {
    let row = sqlx::query_as::<_, PaymentModel>(&format!(
        r#"SELECT {} FROM payment WHERE id = $1 FOR UPDATE"#,
        PAYMENT_COLUMNS
    ))
    .bind(payment_id)
    .fetch_optional(&mut **transaction)
    .await
    .context("A database failure occurred while fetching the payment with a row lock")?;
    Ok(row)
}

#[tracing::instrument(name = "Fetch payments for purchase", skip(pool))]
pub async fn fetch_payments_for_purchase(
    pool: &PgPool,
    purchase_id: i64,
) -> Result<Vec<PaymentData>, PaymentError> {
    let purchase_exists = sqlx::query_scalar::<_, i64>(
        r#"SELECT COUNT(*) FROM purchase WHERE id = $1"#,
    )
    .bind(purchase_id)
    .fetch_one(pool)
    .await
    .context("A database failure occurred while checking the purchase")
    .map_err(PaymentError::UnexpectedError)?;
    if purchase_exists == 0 {
        return Err(PaymentError::NotFoundError(
            "Purchase not found".to_string(),
        ));
    }

    let rows = sqlx::query_as::<_, PaymentModel>(&format!(
        r#"SELECT {} FROM payment WHERE purchase_id = $1 ORDER BY created_at"#,
        PAYMENT_COLUMNS
    ))
    .bind(purchase_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query while fetching payments: {:?}", e);
        PaymentError::DatabaseError(
            "A database failure occurred while fetching payments".to_string(),
            anyhow::Error::new(e),
        )
    })?;
    Ok(rows.into_iter().map(PaymentModel::into_schema).collect())
}

/// Records an administrator-entered payment. Manual payments are not held
/// pending: the row is inserted as `succeeded` and the purchase balance is
/// moved in the same transaction, under the purchase row lock.
#[tracing::instrument(name = "Create manual payment", skip(pool))]
pub async fn create_manual_payment(
    pool: &PgPool,
    request: CreateManualPaymentRequest,
) -> Result<PaymentData, PaymentError> {
    if request.amount <= BigDecimal::from(0) {
        return Err(PaymentError::InvalidStateError(
            "Payment amount must be positive".to_string(),
        ));
    }

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")
        .map_err(|e| PaymentError::UnexpectedCustomError(e.to_string()))?;

    let purchase = fetch_purchase_for_update(&mut transaction, request.purchase_id)
        .await
        .map_err(PaymentError::UnexpectedError)?
        .ok_or_else(|| PaymentError::NotFoundError("Purchase not found".to_string()))?;

    let payment = sqlx::query_as::<_, PaymentModel>(&format!(
        r#"
        INSERT INTO payment (purchase_id, amount, payment_type, status)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        PAYMENT_COLUMNS
    ))
    .bind(purchase.id)
    .bind(&request.amount)
    .bind(request.payment_type)
    .bind(PaymentStatus::Succeeded)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query while inserting payment: {:?}", e);
        PaymentError::DatabaseError(
            "A database failure occurred while inserting the payment".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    apply_payment_to_purchase(&mut transaction, &purchase, &request.amount)
        .await
        .map_err(PaymentError::UnexpectedError)?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store the payment")
        .map_err(|e| PaymentError::UnexpectedCustomError(e.to_string()))?;
    Ok(payment.into_schema())
}

/// Moves a pending payment to `succeeded` and applies its amount to the
/// owning purchase.
#[tracing::instrument(name = "Approve payment", skip(pool))]
pub async fn approve_payment(pool: &PgPool, payment_id: i64) -> Result<PaymentData, PaymentError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")
        .map_err(|e| PaymentError::UnexpectedCustomError(e.to_string()))?;

    let payment = fetch_payment_for_update(&mut transaction, payment_id)
        .await
        .map_err(PaymentError::UnexpectedError)?
        .ok_or_else(|| PaymentError::NotFoundError("Payment not found".to_string()))?;

    if payment.status != PaymentStatus::Pending {
        return Err(PaymentError::InvalidStateError(
            "Only pending payments may be approved".to_string(),
        ));
    }

    let purchase = fetch_purchase_for_update(&mut transaction, payment.purchase_id)
        .await
        .map_err(PaymentError::UnexpectedError)?
        .ok_or_else(|| PaymentError::NotFoundError("Purchase not found".to_string()))?;

    let payment = sqlx::query_as::<_, PaymentModel>(&format!(
        r#"UPDATE payment SET status = $2 WHERE id = $1 RETURNING {}"#,
        PAYMENT_COLUMNS
    ))
    .bind(payment.id)
    .bind(PaymentStatus::Succeeded)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        PaymentError::DatabaseError(
            "A database failure occurred while approving the payment".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    apply_payment_to_purchase(&mut transaction, &purchase, &payment.amount)
        .await
        .map_err(PaymentError::UnexpectedError)?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to approve the payment")
        .map_err(|e| PaymentError::UnexpectedCustomError(e.to_string()))?;
    Ok(payment.into_schema())
}

/// Marks a payment `refunded`. The owning purchase's `amount_paid` is left
/// untouched; moving the purchase itself through its refund states is a
/// separate admin action on the purchase.
#[tracing::instrument(name = "Mark payment as refunded", skip(pool))]
pub async fn mark_payment_refunded(
    pool: &PgPool,
    payment_id: i64,
) -> Result<PaymentData, PaymentError> {
    let row = sqlx::query_as::<_, PaymentModel>(&format!(
        r#"UPDATE payment SET status = $2 WHERE id = $1 RETURNING {}"#,
        PAYMENT_COLUMNS
    ))
    .bind(payment_id)
    .bind(PaymentStatus::Refunded)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query while refunding payment: {:?}", e);
        PaymentError::DatabaseError(
            "A database failure occurred while marking the payment refunded".to_string(),
            anyhow::Error::new(e),
        )
    })?;
    row.map(PaymentModel::into_schema)
        .ok_or_else(|| PaymentError::NotFoundError("Payment not found".to_string()))
}

/// Deletes a payment that never reached the balance.
#[tracing::instrument(name = "Delete payment", skip(pool))]
pub async fn delete_payment(pool: &PgPool, payment_id: i64) -> Result<(), PaymentError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")
        .map_err(|e| PaymentError::UnexpectedCustomError(e.to_string()))?;

    let payment = fetch_payment_for_update(&mut transaction, payment_id)
        .await
        .map_err(PaymentError::UnexpectedError)?
        .ok_or_else(|| PaymentError::NotFoundError("Payment not found".to_string()))?;

    if payment.status != PaymentStatus::Pending {
        return Err(PaymentError::InvalidStateError(
            "Only pending payments may be deleted".to_string(),
        ));
    }

    sqlx::query(r#"DELETE FROM payment WHERE id = $1"#)
        .bind(payment.id)
        .execute(&mut *transaction)
        .await
        .map_err(|e| {
            PaymentError::DatabaseError(
                "A database failure occurred while deleting the payment".to_string(),
                anyhow::Error::new(e),
            )
        })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to delete the payment")
        .map_err(|e| PaymentError::UnexpectedCustomError(e.to_string()))?;
    Ok(())
}

/// Materializes a gateway notification as a payment row. A succeeded
/// notification moves the purchase balance exactly like a manual payment; a
/// failed one only records the attempt.
#[tracing::instrument(name = "Record gateway payment", skip(pool))]
pub async fn record_gateway_payment(
    pool: &PgPool,
    notification: PaymentNotificationRequest,
) -> Result<PaymentData, PaymentError> {
    if notification.amount <= BigDecimal::from(0) {
        return Err(PaymentError::InvalidStateError(
            "Payment amount must be positive".to_string(),
        ));
    }

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")
        .map_err(|e| PaymentError::UnexpectedCustomError(e.to_string()))?;

    let purchase = fetch_purchase_for_update(&mut transaction, notification.purchase_id)
        .await
        .map_err(PaymentError::UnexpectedError)?
        .ok_or_else(|| PaymentError::NotFoundError("Purchase not found".to_string()))?;

    let status = match notification.status {
        GatewayNotificationStatus::Succeeded => PaymentStatus::Succeeded,
        GatewayNotificationStatus::Failed => PaymentStatus::Failed,
    };

    let payment = sqlx::query_as::<_, PaymentModel>(&format!(
        r#"
        INSERT INTO payment (purchase_id, amount, payment_type, status, gateway_payment_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        PAYMENT_COLUMNS
    ))
    .bind(purchase.id)
    .bind(&notification.amount)
    .bind(notification.payment_type)
    .bind(status)
    .bind(&notification.gateway_payment_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query while recording payment: {:?}", e);
        PaymentError::DatabaseError(
            "A database failure occurred while recording the gateway payment".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    if status == PaymentStatus::Succeeded {
        apply_payment_to_purchase(&mut transaction, &purchase, &notification.amount)
            .await
            .map_err(PaymentError::UnexpectedError)?;
    }

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to record the gateway payment")
        .map_err(|e| PaymentError::UnexpectedCustomError(e.to_string()))?;
    Ok(payment.into_schema())
}

/// Test support: seed a payment row in a given status.
#[tracing::instrument(name = "Insert payment", skip(pool))]
pub async fn insert_payment(
    pool: &PgPool,
    purchase_id: i64,
    amount: &BigDecimal,
    payment_type: PaymentType,
    status: PaymentStatus,
) -> Result<i64, anyhow::Error> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO payment (purchase_id, amount, payment_type, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(purchase_id)
    .bind(amount)
    .bind(payment_type)
    .bind(status)
    .fetch_one(pool)
    .await
    .context("A database failure occurred while inserting the payment")?;
    Ok(id)
}
