use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Commission, Payment};

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentList {
    pub items: Vec<Payment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommissionList {
    pub items: Vec<Commission>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub payee_id: Uuid,
    pub order_id: Option<Uuid>,
    pub amount: i64,
    pub payment_method: Option<String>,
}

/// One row of the merged payments + commissions feed.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionEntry {
    pub kind: TransactionKind,
    pub id: Uuid,
    pub reference: String,
    pub amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Payment,
    Commission,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionFeed {
    pub items: Vec<TransactionEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SettleCommissionsRequest {
    pub commission_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SettlementResult {
    pub settlement_batch: String,
    pub settled: usize,
}
