use garagelink_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        leads::{AssignAgentRequest, CreateLeadRequest},
        services::{AssignProviderRequest, CompleteServiceRequest, CreateServiceRequest, RateServiceRequest},
    },
    entity::{
        commissions::{Column as CommissionCol, Entity as Commissions},
        users::ActiveModel as UserActive,
        vehicles::ActiveModel as VehicleActive,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{LeadType, UserRole, VehicleType},
    services::{lead_service, service_request_service},
    state::AppState,
    workflow::{CommissionStatus, LeadStatus, ServiceStatus},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, Statement};
use uuid::Uuid;

// Service request lifecycle plus the insurance lead hand-off.
#[tokio::test]
async fn service_request_lifecycle() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let admin = auth_user(&state, UserRole::Admin, "admin@test.local").await?;
    let owner = auth_user(&state, UserRole::VehicleOwner, "owner@test.local").await?;
    let provider = auth_user(&state, UserRole::ServiceProvider, "garage@test.local").await?;

    let vehicle_id = create_vehicle(&state, owner.user_id).await?;

    let created = service_request_service::create_request(
        &state,
        &owner,
        CreateServiceRequest {
            vehicle_id,
            service_type: "engine_repair".into(),
            description: "Engine stalls at idle".into(),
            priority: None,
            scheduled_date: None,
            location: None,
        },
    )
    .await?;
    let request = created.data.unwrap();
    assert_eq!(request.status, ServiceStatus::Requested);

    // Providers cannot start work before assignment.
    let err = service_request_service::start_work(&state, &provider, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden | AppError::InvalidTransition(_)));

    let assigned = service_request_service::assign_provider(
        &state,
        &admin,
        request.id,
        AssignProviderRequest {
            service_provider_id: provider.user_id,
            estimated_cost: 2_000,
            notes: None,
        },
    )
    .await?;
    let assigned = assigned.data.unwrap();
    assert_eq!(assigned.status, ServiceStatus::Assigned);
    assert_eq!(assigned.service_provider_id, Some(provider.user_id));

    service_request_service::start_work(&state, &provider, request.id).await?;

    let completed = service_request_service::complete_work(
        &state,
        &provider,
        request.id,
        CompleteServiceRequest {
            actual_cost: Some(2_500),
        },
    )
    .await?;
    let completed = completed.data.unwrap();
    assert_eq!(completed.status, ServiceStatus::Completed);
    assert!(completed.completed_date.is_some());
    // Default provider rate is 10%.
    assert_eq!(completed.actual_cost, Some(2_500));
    assert_eq!(completed.commission_amount, Some(250));

    let commission = Commissions::find()
        .filter(CommissionCol::TransactionId.eq(request.id))
        .one(&state.orm)
        .await?
        .expect("commission row for the service");
    assert_eq!(commission.user_id, provider.user_id);
    assert_eq!(commission.status, CommissionStatus::Calculated);
    assert_eq!(commission.net_amount, 2_250);

    // Completed requests cannot be cancelled, only rated.
    let err = service_request_service::cancel_request(&state, &owner, request.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let rated = service_request_service::rate_request(
        &state,
        &owner,
        request.id,
        RateServiceRequest {
            rating: 5,
            feedback: Some("quick fix".into()),
        },
    )
    .await?;
    assert_eq!(rated.data.unwrap().rating, Some(5));

    Ok(())
}

#[tokio::test]
async fn lead_assignment_marks_first_contact() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: no database configured.");
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let admin = auth_user(&state, UserRole::Admin, "admin2@test.local").await?;
    let owner = auth_user(&state, UserRole::VehicleOwner, "owner2@test.local").await?;
    let agent = auth_user(&state, UserRole::InsuranceAgent, "agent@test.local").await?;

    let vehicle_id = create_vehicle(&state, owner.user_id).await?;

    let created = lead_service::create_lead(
        &state,
        &owner,
        CreateLeadRequest {
            vehicle_id,
            lead_type: LeadType::NewPolicy,
            current_policy: None,
            coverage_required: Some("comprehensive".into()),
            budget_range: None,
        },
    )
    .await?;
    let lead = created.data.unwrap();
    assert_eq!(lead.status, LeadStatus::New);

    let assigned = lead_service::assign_agent(
        &state,
        &admin,
        lead.id,
        AssignAgentRequest {
            insurance_agent_id: agent.user_id,
            priority: None,
            notes: None,
        },
    )
    .await?;
    let assigned = assigned.data.unwrap();
    assert_eq!(assigned.status, LeadStatus::Contacted);
    assert_eq!(assigned.insurance_agent_id, Some(agent.user_id));

    // A second assignment is an illegal transition.
    let err = lead_service::assign_agent(
        &state,
        &admin,
        lead.id,
        AssignAgentRequest {
            insurance_agent_id: agent.user_id,
            priority: None,
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE commissions, payments, order_lines, inventory_orders, cart_items, \
         insurance_leads, service_requests, inventory_items, vehicles, audit_logs, users \
         RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn auth_user(state: &AppState, role: UserRole, email: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("dummy".into()),
        full_name: Set("Test User".into()),
        user_type: Set(role),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role,
    })
}

async fn create_vehicle(state: &AppState, owner_id: Uuid) -> anyhow::Result<Uuid> {
    let vehicle = VehicleActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        make: Set("Hero".into()),
        model: Set("Splendor".into()),
        year: Set(2021),
        registration_number: Set(format!("KA-01-{}", &Uuid::new_v4().to_string()[..8])),
        fuel_type: Set("petrol".into()),
        vehicle_type: Set(VehicleType::TwoWheeler),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    Ok(vehicle.id)
}
