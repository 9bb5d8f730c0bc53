//! Role-based dashboard aggregation.
//!
//! Each role gets its own loader: a concurrent fan-out over the collections
//! that role cares about, then pure aggregation into counters and a short
//! activity feed. Accounts with no data of their own get a demo slice of the
//! shared collections instead; every substituted slice is named in
//! `sample_slices` so clients can tell demo data from real data.

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};

use crate::{
    dto::dashboard::{ActivityItem, ActivityKind, DashboardData},
    entity::{
        insurance_leads::{Column as LeadCol, Entity as InsuranceLeads, Model as Lead},
        inventory_orders::{Column as OrderCol, Entity as InventoryOrders, Model as Order},
        payments::{Column as PaymentCol, Entity as Payments, Model as Payment},
        service_requests::{Column as RequestCol, Entity as ServiceRequests, Model as Service},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::UserRole,
    response::ApiResponse,
    state::AppState,
    workflow::{LeadStatus, OrderStatus, PaymentStatus, ServiceStatus},
};

const ADMIN_FETCH: u64 = 10;
const ROLE_FETCH: u64 = 50;

pub async fn dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<DashboardData>> {
    let data = match user.role {
        UserRole::Admin => admin_dashboard(state).await?,
        UserRole::ServiceProvider => provider_dashboard(state, user).await?,
        UserRole::VehicleOwner => owner_dashboard(state, user).await?,
        UserRole::PaymentCollector => collector_dashboard(state, user).await?,
        UserRole::WarehouseStaff => warehouse_dashboard(state, user).await?,
        UserRole::Dispatcher => dispatcher_dashboard(state, user).await?,
        UserRole::InsuranceAgent => agent_dashboard(state, user).await?,
    };
    Ok(ApiResponse::success("OK", data, None))
}

async fn admin_dashboard(state: &AppState) -> AppResult<DashboardData> {
    let (services, orders, payments, leads) = tokio::try_join!(
        recent_services(state, ADMIN_FETCH),
        recent_orders(state, ADMIN_FETCH),
        recent_payments(state, ADMIN_FETCH),
        recent_leads(state, ADMIN_FETCH),
    )?;
    Ok(aggregate_admin(&services, &orders, &payments, &leads))
}

async fn provider_dashboard(state: &AppState, user: &AuthUser) -> AppResult<DashboardData> {
    let (services, orders, payments, leads) = tokio::try_join!(
        recent_services(state, ROLE_FETCH),
        recent_orders(state, ROLE_FETCH),
        recent_payments(state, ROLE_FETCH),
        recent_leads(state, ROLE_FETCH),
    )?;
    Ok(aggregate_provider(user, &services, &orders, &payments, &leads))
}

async fn owner_dashboard(state: &AppState, user: &AuthUser) -> AppResult<DashboardData> {
    let (services, leads) = tokio::try_join!(
        recent_services(state, ROLE_FETCH),
        recent_leads(state, ROLE_FETCH),
    )?;
    Ok(aggregate_owner(user, &services, &leads))
}

async fn collector_dashboard(state: &AppState, user: &AuthUser) -> AppResult<DashboardData> {
    let payments = recent_payments(state, ROLE_FETCH).await?;
    Ok(aggregate_collector(user, &payments))
}

async fn warehouse_dashboard(state: &AppState, user: &AuthUser) -> AppResult<DashboardData> {
    let orders = recent_orders(state, ROLE_FETCH).await?;
    Ok(aggregate_warehouse(user, &orders))
}

async fn dispatcher_dashboard(state: &AppState, user: &AuthUser) -> AppResult<DashboardData> {
    let orders = recent_orders(state, ROLE_FETCH).await?;
    Ok(aggregate_dispatcher(user, &orders))
}

async fn agent_dashboard(state: &AppState, user: &AuthUser) -> AppResult<DashboardData> {
    let leads = recent_leads(state, ROLE_FETCH).await?;
    Ok(aggregate_agent(user, &leads))
}

async fn recent_services(state: &AppState, limit: u64) -> AppResult<Vec<Service>> {
    Ok(ServiceRequests::find()
        .order_by_desc(RequestCol::CreatedAt)
        .limit(limit)
        .all(&state.orm)
        .await?)
}

async fn recent_orders(state: &AppState, limit: u64) -> AppResult<Vec<Order>> {
    Ok(InventoryOrders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .limit(limit)
        .all(&state.orm)
        .await?)
}

async fn recent_payments(state: &AppState, limit: u64) -> AppResult<Vec<Payment>> {
    Ok(Payments::find()
        .order_by_desc(PaymentCol::CreatedAt)
        .limit(limit)
        .all(&state.orm)
        .await?)
}

async fn recent_leads(state: &AppState, limit: u64) -> AppResult<Vec<Lead>> {
    Ok(InsuranceLeads::find()
        .order_by_desc(LeadCol::CreatedAt)
        .limit(limit)
        .all(&state.orm)
        .await?)
}

/// Substitute a prefix of the shared collection when the caller has nothing
/// of their own, and record the substitution by name.
fn with_sample_fallback<T: Clone>(
    mine: Vec<T>,
    all: &[T],
    take: usize,
    name: &str,
    sample_slices: &mut Vec<String>,
) -> Vec<T> {
    if mine.is_empty() && !all.is_empty() {
        sample_slices.push(name.to_string());
        all.iter().take(take).cloned().collect()
    } else {
        mine
    }
}

fn humanize(value: &str) -> String {
    value.replace('_', " ")
}

fn service_activity(services: &[Service], take: usize, title: impl Fn(&Service) -> String) -> Vec<ActivityItem> {
    services
        .iter()
        .take(take)
        .map(|s| ActivityItem {
            kind: ActivityKind::Service,
            title: title(s),
            time: s.created_at.with_timezone(&Utc),
            status: s.status.as_str().to_string(),
        })
        .collect()
}

fn order_activity(orders: &[Order], take: usize, title: impl Fn(&Order) -> String) -> Vec<ActivityItem> {
    orders
        .iter()
        .take(take)
        .map(|o| ActivityItem {
            kind: ActivityKind::Order,
            title: title(o),
            time: o.created_at.with_timezone(&Utc),
            status: o.status.as_str().to_string(),
        })
        .collect()
}

fn aggregate_admin(
    services: &[Service],
    orders: &[Order],
    payments: &[Payment],
    leads: &[Lead],
) -> DashboardData {
    let mut stats = BTreeMap::new();
    stats.insert("total_services".into(), services.len() as i64);
    stats.insert("total_orders".into(), orders.len() as i64);
    stats.insert(
        "total_payments".into(),
        payments.iter().map(|p| p.amount).sum(),
    );
    stats.insert("total_leads".into(), leads.len() as i64);
    stats.insert(
        "pending_services".into(),
        count(services, |s| s.status == ServiceStatus::Requested),
    );
    stats.insert(
        "pending_orders".into(),
        count(orders, |o| o.status == OrderStatus::Pending),
    );

    let mut activity = service_activity(services, 5, |s| {
        format!("New service request: {}", s.service_type)
    });
    activity.extend(order_activity(orders, 5, |o| {
        format!("Inventory order: {}", o.order_number)
    }));

    DashboardData {
        stats,
        activity,
        sample_slices: Vec::new(),
    }
}

fn aggregate_provider(
    user: &AuthUser,
    services: &[Service],
    orders: &[Order],
    payments: &[Payment],
    leads: &[Lead],
) -> DashboardData {
    let mut sample_slices = Vec::new();

    let mine: Vec<Service> = services
        .iter()
        .filter(|s| s.service_provider_id == Some(user.user_id))
        .cloned()
        .collect();
    let my_services = with_sample_fallback(mine, services, 3, "services", &mut sample_slices);

    let mine: Vec<Order> = orders
        .iter()
        .filter(|o| o.service_provider_id == user.user_id)
        .cloned()
        .collect();
    let my_orders = with_sample_fallback(mine, orders, 2, "orders", &mut sample_slices);

    let mine: Vec<Payment> = payments
        .iter()
        .filter(|p| p.payee_id == user.user_id)
        .cloned()
        .collect();
    let my_payments = with_sample_fallback(mine, payments, 2, "payments", &mut sample_slices);

    let mine: Vec<Lead> = leads
        .iter()
        .filter(|l| l.customer_id == user.user_id)
        .cloned()
        .collect();
    let my_leads = with_sample_fallback(mine, leads, 2, "leads", &mut sample_slices);

    let mut stats = BTreeMap::new();
    stats.insert("total_services".into(), my_services.len() as i64);
    stats.insert(
        "active_services".into(),
        count(&my_services, |s| s.status == ServiceStatus::InProgress),
    );
    stats.insert(
        "completed_services".into(),
        count(&my_services, |s| s.status == ServiceStatus::Completed),
    );
    stats.insert(
        "total_earnings".into(),
        my_payments
            .iter()
            .map(|p| p.net_amount.unwrap_or(p.amount))
            .sum(),
    );
    stats.insert(
        "pending_orders".into(),
        count(&my_orders, |o| o.status == OrderStatus::Pending),
    );

    let mut activity = service_activity(&my_services, 4, |s| {
        format!("Service: {}", humanize(&s.service_type))
    });
    activity.extend(order_activity(&my_orders, 3, |o| {
        format!("Parts order: {}", o.order_number)
    }));
    activity.extend(lead_activity(&my_leads, 2, |l| {
        format!("Insurance lead: {}", humanize(l.lead_type.as_str()))
    }));

    DashboardData {
        stats,
        activity,
        sample_slices,
    }
}

fn aggregate_owner(user: &AuthUser, services: &[Service], leads: &[Lead]) -> DashboardData {
    let mut sample_slices = Vec::new();

    let mine: Vec<Service> = services
        .iter()
        .filter(|s| s.customer_id == user.user_id)
        .cloned()
        .collect();
    let my_services = with_sample_fallback(mine, services, 3, "services", &mut sample_slices);

    let mine: Vec<Lead> = leads
        .iter()
        .filter(|l| l.customer_id == user.user_id)
        .cloned()
        .collect();
    let my_leads = with_sample_fallback(mine, leads, 2, "leads", &mut sample_slices);

    let mut stats = BTreeMap::new();
    stats.insert("total_services".into(), my_services.len() as i64);
    stats.insert(
        "pending_services".into(),
        count(&my_services, |s| s.status != ServiceStatus::Completed),
    );
    stats.insert(
        "completed_services".into(),
        count(&my_services, |s| s.status == ServiceStatus::Completed),
    );
    stats.insert(
        "total_spent".into(),
        my_services
            .iter()
            .map(|s| s.actual_cost.or(s.estimated_cost).unwrap_or(0))
            .sum(),
    );
    stats.insert("insurance_leads".into(), my_leads.len() as i64);

    let activity = service_activity(&my_services, 6, |s| {
        format!("{} - {}", humanize(&s.service_type), s.status)
    });

    DashboardData {
        stats,
        activity,
        sample_slices,
    }
}

fn aggregate_collector(user: &AuthUser, payments: &[Payment]) -> DashboardData {
    let mut sample_slices = Vec::new();

    let mine: Vec<Payment> = payments
        .iter()
        .filter(|p| p.collected_by == Some(user.user_id))
        .cloned()
        .collect();
    let my_payments = with_sample_fallback(mine, payments, 3, "payments", &mut sample_slices);

    let mut stats = BTreeMap::new();
    stats.insert("total_collections".into(), my_payments.len() as i64);
    stats.insert(
        "amount_collected".into(),
        my_payments
            .iter()
            .filter(|p| p.payment_status == PaymentStatus::Collected)
            .map(|p| p.amount)
            .sum(),
    );
    stats.insert(
        "pending_collections".into(),
        count(&my_payments, |p| p.payment_status == PaymentStatus::Pending),
    );
    stats.insert(
        "failed_collections".into(),
        count(&my_payments, |p| p.payment_status == PaymentStatus::Failed),
    );

    let activity = my_payments
        .iter()
        .take(6)
        .map(|p| ActivityItem {
            kind: ActivityKind::Payment,
            title: format!("Payment {} - {}", p.payment_ref, p.payment_status),
            time: p.created_at.with_timezone(&Utc),
            status: p.payment_status.as_str().to_string(),
        })
        .collect();

    DashboardData {
        stats,
        activity,
        sample_slices,
    }
}

fn aggregate_warehouse(user: &AuthUser, orders: &[Order]) -> DashboardData {
    let mut sample_slices = Vec::new();

    let mine: Vec<Order> = orders
        .iter()
        .filter(|o| o.packed_by == Some(user.user_id))
        .cloned()
        .collect();
    let pool: Vec<Order> = orders
        .iter()
        .filter(|o| matches!(o.status, OrderStatus::Approved | OrderStatus::Packed))
        .cloned()
        .collect();
    let my_orders = with_sample_fallback(mine, &pool, 3, "orders", &mut sample_slices);

    let today = Utc::now().date_naive();
    let mut stats = BTreeMap::new();
    stats.insert(
        "pending_packing".into(),
        count(orders, |o| o.status == OrderStatus::Approved),
    );
    stats.insert(
        "packed_today".into(),
        count(&my_orders, |o| {
            o.packed_by == Some(user.user_id)
                && o.packed_date.is_some_and(|d| d.date_naive() == today)
        }),
    );
    stats.insert(
        "total_packed".into(),
        count(&my_orders, |o| o.packed_by == Some(user.user_id)),
    );

    let activity = order_activity(&my_orders, 6, |o| {
        format!("Order {} - {}", o.order_number, o.status)
    });

    DashboardData {
        stats,
        activity,
        sample_slices,
    }
}

fn aggregate_dispatcher(user: &AuthUser, orders: &[Order]) -> DashboardData {
    let mut sample_slices = Vec::new();

    let mine: Vec<Order> = orders
        .iter()
        .filter(|o| o.dispatched_by == Some(user.user_id))
        .cloned()
        .collect();
    let pool: Vec<Order> = orders
        .iter()
        .filter(|o| matches!(o.status, OrderStatus::Packed | OrderStatus::Dispatched))
        .cloned()
        .collect();
    let my_orders = with_sample_fallback(mine, &pool, 3, "orders", &mut sample_slices);

    let today = Utc::now().date_naive();
    let mut stats = BTreeMap::new();
    stats.insert(
        "ready_for_dispatch".into(),
        count(orders, |o| o.status == OrderStatus::Packed),
    );
    stats.insert(
        "dispatched_today".into(),
        count(&my_orders, |o| {
            o.dispatched_by == Some(user.user_id)
                && o.dispatched_date.is_some_and(|d| d.date_naive() == today)
        }),
    );
    stats.insert(
        "total_dispatched".into(),
        count(&my_orders, |o| o.dispatched_by == Some(user.user_id)),
    );

    let activity = order_activity(&my_orders, 6, |o| {
        format!("Order {} - {}", o.order_number, o.status)
    });

    DashboardData {
        stats,
        activity,
        sample_slices,
    }
}

fn aggregate_agent(user: &AuthUser, leads: &[Lead]) -> DashboardData {
    let mut sample_slices = Vec::new();

    let mine: Vec<Lead> = leads
        .iter()
        .filter(|l| l.insurance_agent_id == Some(user.user_id))
        .cloned()
        .collect();
    let my_leads = with_sample_fallback(mine, leads, 3, "leads", &mut sample_slices);

    let mut stats = BTreeMap::new();
    stats.insert("total_leads".into(), my_leads.len() as i64);
    stats.insert(
        "new_leads".into(),
        count(&my_leads, |l| l.status == LeadStatus::New),
    );
    stats.insert(
        "converted_leads".into(),
        count(&my_leads, |l| l.status == LeadStatus::Converted),
    );
    stats.insert(
        "total_commission".into(),
        my_leads
            .iter()
            .filter_map(|l| l.converted_policy.as_ref())
            .filter_map(|p| p.get("commission_earned").and_then(|v| v.as_i64()))
            .sum(),
    );

    let activity = lead_activity(&my_leads, 6, |l| {
        format!("Insurance lead - {}", humanize(l.lead_type.as_str()))
    });

    DashboardData {
        stats,
        activity,
        sample_slices,
    }
}

fn lead_activity(leads: &[Lead], take: usize, title: impl Fn(&Lead) -> String) -> Vec<ActivityItem> {
    leads
        .iter()
        .take(take)
        .map(|l| ActivityItem {
            kind: ActivityKind::Lead,
            title: title(l),
            time: l.created_at.with_timezone(&Utc),
            status: l.status.as_str().to_string(),
        })
        .collect()
}

fn count<T>(items: &[T], pred: impl Fn(&T) -> bool) -> i64 {
    items.iter().filter(|i| pred(i)).count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeadType, Priority};
    use uuid::Uuid;

    fn now() -> chrono::DateTime<chrono::FixedOffset> {
        Utc::now().into()
    }

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    fn service(provider: Option<Uuid>, status: ServiceStatus) -> Service {
        Service {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            service_provider_id: provider,
            service_type: "oil_change".into(),
            description: String::new(),
            priority: Priority::Medium,
            status,
            scheduled_date: None,
            location: None,
            estimated_cost: Some(500),
            actual_cost: None,
            commission_amount: None,
            rating: None,
            feedback: None,
            notes: None,
            completed_date: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn order(provider: Uuid, status: OrderStatus) -> Order {
        Order {
            id: Uuid::new_v4(),
            service_provider_id: provider,
            order_number: "ORD-1".into(),
            total_amount: 250,
            commission_amount: 25,
            net_amount: 225,
            delivery_address: serde_json::json!({}),
            status,
            priority: Priority::Medium,
            packed_by: None,
            packed_date: None,
            dispatched_by: None,
            dispatched_date: None,
            tracking_number: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn payment(payee: Uuid, status: PaymentStatus, amount: i64) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            payee_id: payee,
            order_id: None,
            payment_ref: "PAY-1".into(),
            amount,
            net_amount: None,
            payment_status: status,
            payment_method: None,
            collected_by: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn lead(agent: Option<Uuid>, status: LeadStatus) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            insurance_agent_id: agent,
            lead_type: LeadType::NewPolicy,
            current_policy: None,
            coverage_required: None,
            budget_range: None,
            status,
            quotes_provided: serde_json::json!([]),
            converted_policy: None,
            priority: Priority::Medium,
            notes: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn admin_over_empty_data_is_all_zeros() {
        let data = aggregate_admin(&[], &[], &[], &[]);
        assert!(data.stats.values().all(|v| *v == 0));
        assert!(data.activity.is_empty());
        assert!(data.sample_slices.is_empty());
    }

    #[test]
    fn admin_counts_and_activity() {
        let services = vec![
            service(None, ServiceStatus::Requested),
            service(None, ServiceStatus::Completed),
        ];
        let orders = vec![order(Uuid::new_v4(), OrderStatus::Pending)];
        let payments = vec![
            payment(Uuid::new_v4(), PaymentStatus::Pending, 100),
            payment(Uuid::new_v4(), PaymentStatus::Collected, 250),
        ];

        let data = aggregate_admin(&services, &orders, &payments, &[]);
        assert_eq!(data.stats["total_services"], 2);
        assert_eq!(data.stats["pending_services"], 1);
        assert_eq!(data.stats["pending_orders"], 1);
        assert_eq!(data.stats["total_payments"], 350);
        assert_eq!(data.stats["total_leads"], 0);
        // 5 services + 5 orders max
        assert_eq!(data.activity.len(), 3);
    }

    #[test]
    fn provider_with_no_data_gets_named_sample_slices() {
        let me = user(UserRole::ServiceProvider);
        let other = Uuid::new_v4();
        let services: Vec<Service> = (0..5)
            .map(|_| service(Some(other), ServiceStatus::Requested))
            .collect();
        let orders: Vec<Order> = (0..4).map(|_| order(other, OrderStatus::Pending)).collect();
        let payments: Vec<Payment> = (0..3)
            .map(|_| payment(other, PaymentStatus::Pending, 10))
            .collect();
        let leads: Vec<Lead> = (0..3).map(|_| lead(None, LeadStatus::New)).collect();

        let data = aggregate_provider(&me, &services, &orders, &payments, &leads);

        // Exactly 3 services / 2 orders / 2 payments / 2 leads in the sample.
        assert_eq!(data.stats["total_services"], 3);
        assert_eq!(data.stats["pending_orders"], 2);
        assert_eq!(data.stats["total_earnings"], 20);
        assert_eq!(
            data.sample_slices,
            vec!["services", "orders", "payments", "leads"]
        );
        // 3 services + 2 orders + 2 leads of activity.
        assert_eq!(data.activity.len(), 7);
    }

    #[test]
    fn provider_with_own_data_sees_no_samples() {
        let me = user(UserRole::ServiceProvider);
        let services = vec![
            service(Some(me.user_id), ServiceStatus::InProgress),
            service(Some(Uuid::new_v4()), ServiceStatus::Requested),
        ];
        let orders = vec![order(me.user_id, OrderStatus::Pending)];
        let payments = vec![payment(me.user_id, PaymentStatus::Collected, 900)];
        let leads = vec![lead(None, LeadStatus::New)];

        let data = aggregate_provider(&me, &services, &orders, &payments, &leads);
        assert_eq!(data.stats["total_services"], 1);
        assert_eq!(data.stats["active_services"], 1);
        assert_eq!(data.stats["total_earnings"], 900);
        // Leads still fall back; nothing links a provider to a lead.
        assert_eq!(data.sample_slices, vec!["leads"]);
    }

    #[test]
    fn owner_spend_prefers_actual_cost() {
        let me = user(UserRole::VehicleOwner);
        let mut done = service(None, ServiceStatus::Completed);
        done.customer_id = me.user_id;
        done.actual_cost = Some(700);
        let mut open = service(None, ServiceStatus::Requested);
        open.customer_id = me.user_id;

        let data = aggregate_owner(&me, &[done, open], &[]);
        assert_eq!(data.stats["total_spent"], 700 + 500);
        assert_eq!(data.stats["pending_services"], 1);
        assert_eq!(data.stats["completed_services"], 1);
        assert!(data.sample_slices.is_empty());
    }

    #[test]
    fn warehouse_fallback_only_draws_from_packable_orders() {
        let me = user(UserRole::WarehouseStaff);
        let other = Uuid::new_v4();
        let orders = vec![
            order(other, OrderStatus::Pending),
            order(other, OrderStatus::Approved),
            order(other, OrderStatus::Packed),
            order(other, OrderStatus::Delivered),
        ];

        let data = aggregate_warehouse(&me, &orders);
        assert_eq!(data.stats["pending_packing"], 1);
        assert_eq!(data.stats["total_packed"], 0);
        assert_eq!(data.sample_slices, vec!["orders"]);
        // Sample holds the approved and packed orders only.
        assert_eq!(data.activity.len(), 2);
    }

    #[test]
    fn dispatcher_counts_todays_dispatches() {
        let me = user(UserRole::Dispatcher);
        let mut mine = order(Uuid::new_v4(), OrderStatus::Dispatched);
        mine.dispatched_by = Some(me.user_id);
        mine.dispatched_date = Some(now());
        let packed = order(Uuid::new_v4(), OrderStatus::Packed);

        let data = aggregate_dispatcher(&me, &[mine, packed]);
        assert_eq!(data.stats["ready_for_dispatch"], 1);
        assert_eq!(data.stats["dispatched_today"], 1);
        assert_eq!(data.stats["total_dispatched"], 1);
        assert!(data.sample_slices.is_empty());
    }

    #[test]
    fn agent_sums_commission_from_converted_policies() {
        let me = user(UserRole::InsuranceAgent);
        let mut converted = lead(Some(me.user_id), LeadStatus::Converted);
        converted.converted_policy =
            Some(serde_json::json!({ "commission_earned": 1500 }));
        let fresh = lead(Some(me.user_id), LeadStatus::New);

        let data = aggregate_agent(&me, &[converted, fresh]);
        assert_eq!(data.stats["total_leads"], 2);
        assert_eq!(data.stats["new_leads"], 1);
        assert_eq!(data.stats["converted_leads"], 1);
        assert_eq!(data.stats["total_commission"], 1500);
        assert!(data.sample_slices.is_empty());
    }
}
