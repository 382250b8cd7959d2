use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::schemas::{
    AdminPurchaseData, PaymentType, PurchaseData, PurchaseStatus, RefundStatus,
};
use super::utils::remaining_amount;

/// Balance fields read under a row lock before a payment is applied.
#[derive(Debug, FromRow)]
pub struct PurchaseBalanceModel {
    pub id: i64,
    pub total_amount: BigDecimal,
    pub amount_paid: BigDecimal,
}

#[derive(Debug, FromRow)]
pub struct PurchaseDetailModel {
    pub id: i64,
    pub user_id: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub excursion_id: i64,
    pub excursion_title: String,
    pub destination_name: String,
    pub number_of_people: i32,
    pub payment_type: PaymentType,
    pub total_amount: BigDecimal,
    pub amount_paid: BigDecimal,
    pub status: PurchaseStatus,
    pub refund_status: RefundStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseDetailModel {
    pub fn into_admin_schema(self) -> AdminPurchaseData {
        let remaining = remaining_amount(&self.total_amount, &self.amount_paid);
        AdminPurchaseData {
            id: self.id,
            user_id: self.user_id,
            user_email: self.user_email,
            user_name: self.user_name,
            excursion_id: self.excursion_id,
            excursion_title: self.excursion_title,
            destination_name: self.destination_name,
            number_of_people: self.number_of_people,
            payment_type: self.payment_type,
            total_amount: self.total_amount,
            amount_paid: self.amount_paid,
            remaining_amount: remaining,
            status: self.status,
            refund_status: self.refund_status,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn into_customer_schema(self) -> PurchaseData {
        let remaining = remaining_amount(&self.total_amount, &self.amount_paid);
        PurchaseData {
            id: self.id,
            excursion_id: self.excursion_id,
            excursion_title: self.excursion_title,
            destination_name: self.destination_name,
            number_of_people: self.number_of_people,
            payment_type: self.payment_type,
            total_amount: self.total_amount,
            amount_paid: self.amount_paid,
            remaining_amount: remaining,
            status: self.status,
            refund_status: self.refund_status,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}
