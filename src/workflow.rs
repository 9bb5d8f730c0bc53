//! Status workflows for the marketplace entities.
//!
//! Transition legality lives here and nowhere else: every status-changing
//! endpoint calls [`ensure_transition`] before writing, and an illegal move
//! is rejected with a 409 instead of being silently applied.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// requested -> assigned -> in_progress -> completed, cancellable until terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[sea_orm(string_value = "requested")]
    Requested,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// pending -> approved -> packed -> dispatched -> delivered, cancellable until terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "packed")]
    Packed,
    #[sea_orm(string_value = "dispatched")]
    Dispatched,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// new -> contacted -> quoted -> converted | lost.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "contacted")]
    Contacted,
    #[sea_orm(string_value = "quoted")]
    Quoted,
    #[sea_orm(string_value = "converted")]
    Converted,
    #[sea_orm(string_value = "lost")]
    Lost,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "collected")]
    Collected,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// calculated -> deducted -> settled, with a disputed branch that can still settle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum CommissionStatus {
    #[sea_orm(string_value = "calculated")]
    Calculated,
    #[sea_orm(string_value = "deducted")]
    Deducted,
    #[sea_orm(string_value = "settled")]
    Settled,
    #[sea_orm(string_value = "disputed")]
    Disputed,
}

/// Legal next states for an entity status.
pub trait StatusFlow: Copy + Eq + Sized + 'static {
    fn transitions(self) -> &'static [Self];

    fn can_transition(self, next: Self) -> bool {
        self.transitions().contains(&next)
    }

    fn is_terminal(self) -> bool {
        self.transitions().is_empty()
    }
}

impl StatusFlow for ServiceStatus {
    fn transitions(self) -> &'static [Self] {
        use ServiceStatus::*;
        match self {
            Requested => &[Assigned, Cancelled],
            Assigned => &[InProgress, Cancelled],
            InProgress => &[Completed, Cancelled],
            Completed | Cancelled => &[],
        }
    }
}

impl StatusFlow for OrderStatus {
    fn transitions(self) -> &'static [Self] {
        use OrderStatus::*;
        match self {
            Pending => &[Approved, Cancelled],
            Approved => &[Packed, Cancelled],
            Packed => &[Dispatched, Cancelled],
            // Goods on a truck can only arrive; cancellation ends at dispatch.
            Dispatched => &[Delivered],
            Delivered | Cancelled => &[],
        }
    }
}

impl StatusFlow for LeadStatus {
    fn transitions(self) -> &'static [Self] {
        use LeadStatus::*;
        match self {
            New => &[Contacted],
            Contacted => &[Quoted, Lost],
            Quoted => &[Converted, Lost],
            Converted | Lost => &[],
        }
    }
}

impl StatusFlow for PaymentStatus {
    fn transitions(self) -> &'static [Self] {
        use PaymentStatus::*;
        match self {
            Pending => &[Collected, Failed],
            Collected | Failed => &[],
        }
    }
}

impl StatusFlow for CommissionStatus {
    fn transitions(self) -> &'static [Self] {
        use CommissionStatus::*;
        match self {
            Calculated => &[Deducted, Settled, Disputed],
            Deducted => &[Settled, Disputed],
            Disputed => &[Settled],
            Settled => &[],
        }
    }
}

pub fn ensure_transition<S>(from: S, to: S) -> AppResult<()>
where
    S: StatusFlow + fmt::Display,
{
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition(format!("{from} -> {to}")))
    }
}

impl ServiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatus::Requested => "requested",
            ServiceStatus::Assigned => "assigned",
            ServiceStatus::InProgress => "in_progress",
            ServiceStatus::Completed => "completed",
            ServiceStatus::Cancelled => "cancelled",
        }
    }
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Packed => "packed",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Quoted => "quoted",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
        }
    }
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Collected => "collected",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl CommissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommissionStatus::Calculated => "calculated",
            CommissionStatus::Deducted => "deducted",
            CommissionStatus::Settled => "settled",
            CommissionStatus::Disputed => "disputed",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_requests_advance_in_order() {
        assert!(ServiceStatus::Requested.can_transition(ServiceStatus::Assigned));
        assert!(ServiceStatus::Assigned.can_transition(ServiceStatus::InProgress));
        assert!(ServiceStatus::InProgress.can_transition(ServiceStatus::Completed));

        // No skipping ahead or moving backwards.
        assert!(!ServiceStatus::Requested.can_transition(ServiceStatus::InProgress));
        assert!(!ServiceStatus::Requested.can_transition(ServiceStatus::Completed));
        assert!(!ServiceStatus::Completed.can_transition(ServiceStatus::Assigned));
    }

    #[test]
    fn service_requests_cancel_from_any_non_terminal_state() {
        for status in [
            ServiceStatus::Requested,
            ServiceStatus::Assigned,
            ServiceStatus::InProgress,
        ] {
            assert!(status.can_transition(ServiceStatus::Cancelled), "{status}");
        }
        assert!(!ServiceStatus::Completed.can_transition(ServiceStatus::Cancelled));
        assert!(!ServiceStatus::Cancelled.can_transition(ServiceStatus::Cancelled));
    }

    #[test]
    fn order_fulfilment_chain() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Approved));
        assert!(OrderStatus::Approved.can_transition(OrderStatus::Packed));
        assert!(OrderStatus::Packed.can_transition(OrderStatus::Dispatched));
        assert!(OrderStatus::Dispatched.can_transition(OrderStatus::Delivered));

        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Packed));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn orders_cancel_only_before_dispatch() {
        for status in [OrderStatus::Pending, OrderStatus::Approved, OrderStatus::Packed] {
            assert!(status.can_transition(OrderStatus::Cancelled), "{status}");
        }
        // Cancelling after dispatch would restock goods already on a truck.
        assert!(!OrderStatus::Dispatched.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn leads_end_in_converted_or_lost() {
        assert!(LeadStatus::New.can_transition(LeadStatus::Contacted));
        assert!(LeadStatus::Contacted.can_transition(LeadStatus::Quoted));
        assert!(LeadStatus::Quoted.can_transition(LeadStatus::Converted));
        assert!(LeadStatus::Quoted.can_transition(LeadStatus::Lost));
        assert!(LeadStatus::Contacted.can_transition(LeadStatus::Lost));

        assert!(LeadStatus::Converted.is_terminal());
        assert!(LeadStatus::Lost.is_terminal());
        assert!(!LeadStatus::New.can_transition(LeadStatus::Quoted));
    }

    #[test]
    fn ensure_transition_reports_the_offending_pair() {
        let err = ensure_transition(ServiceStatus::Completed, ServiceStatus::Assigned).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("completed -> assigned"), "{message}");
    }

    #[test]
    fn payments_settle_exactly_once() {
        assert!(PaymentStatus::Pending.can_transition(PaymentStatus::Collected));
        assert!(PaymentStatus::Pending.can_transition(PaymentStatus::Failed));
        assert!(PaymentStatus::Collected.is_terminal());

        assert!(CommissionStatus::Calculated.can_transition(CommissionStatus::Settled));
        assert!(CommissionStatus::Disputed.can_transition(CommissionStatus::Settled));
        assert!(CommissionStatus::Settled.is_terminal());
    }
}
