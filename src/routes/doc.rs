use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartLine, CartList, UpdateCartItemRequest},
        dashboard::{ActivityItem, ActivityKind, DashboardData},
        inventory::{
            CreateInventoryItemRequest, InventoryList, StockAdjustRequest,
            UpdateInventoryItemRequest,
        },
        leads::{AssignAgentRequest, ConvertLeadRequest, CreateLeadRequest, LeadList, QuoteLeadRequest},
        orders::{CheckoutRequest, DispatchRequest, OrderList, OrderWithLines},
        payments::{
            CommissionList, CreatePaymentRequest, PaymentList, SettleCommissionsRequest,
            SettlementResult, TransactionEntry, TransactionFeed, TransactionKind,
        },
        services::{
            AssignProviderRequest, CompleteServiceRequest, CreateServiceRequest,
            RateServiceRequest, ServiceRequestList,
        },
        users::{AdminUpdateUserRequest, UpdateProfileRequest, UserList},
        vehicles::{CreateVehicleRequest, UpdateVehicleRequest, VehicleList},
    },
    models::{
        CartItem, Commission, InsuranceLead, InventoryItem, InventoryOrder, OrderLine, Payment,
        ServiceRequest, User, Vehicle,
    },
    response::{ApiResponse, Meta},
    routes::{
        auth, cart, dashboard, health, inventory, leads, orders, params, payments,
        service_requests, users, vehicles,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        users::me,
        users::update_me,
        users::list_users,
        users::admin_update_user,
        vehicles::list_vehicles,
        vehicles::create_vehicle,
        vehicles::get_vehicle,
        vehicles::update_vehicle,
        vehicles::delete_vehicle,
        service_requests::create_request,
        service_requests::list_requests,
        service_requests::get_request,
        service_requests::assign_provider,
        service_requests::start_work,
        service_requests::complete_work,
        service_requests::cancel_request,
        service_requests::rate_request,
        inventory::list_items,
        inventory::get_item,
        inventory::create_item,
        inventory::update_item,
        inventory::adjust_stock,
        inventory::list_low_stock,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        orders::checkout,
        orders::list_orders,
        orders::get_order,
        orders::approve_order,
        orders::pack_order,
        orders::dispatch_order,
        orders::deliver_order,
        orders::cancel_order,
        leads::create_lead,
        leads::list_leads,
        leads::get_lead,
        leads::assign_agent,
        leads::quote_lead,
        leads::convert_lead,
        leads::lose_lead,
        payments::create_payment,
        payments::list_payments,
        payments::collect_payment,
        payments::fail_payment,
        payments::transaction_feed,
        payments::list_commissions,
        payments::settle_commissions,
        dashboard::dashboard
    ),
    components(
        schemas(
            User,
            Vehicle,
            ServiceRequest,
            InventoryItem,
            CartItem,
            InventoryOrder,
            OrderLine,
            InsuranceLead,
            Payment,
            Commission,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserList,
            UpdateProfileRequest,
            AdminUpdateUserRequest,
            VehicleList,
            CreateVehicleRequest,
            UpdateVehicleRequest,
            ServiceRequestList,
            CreateServiceRequest,
            AssignProviderRequest,
            CompleteServiceRequest,
            RateServiceRequest,
            InventoryList,
            CreateInventoryItemRequest,
            UpdateInventoryItemRequest,
            StockAdjustRequest,
            CartList,
            CartLine,
            AddToCartRequest,
            UpdateCartItemRequest,
            OrderList,
            OrderWithLines,
            CheckoutRequest,
            DispatchRequest,
            LeadList,
            CreateLeadRequest,
            AssignAgentRequest,
            QuoteLeadRequest,
            ConvertLeadRequest,
            PaymentList,
            CommissionList,
            CreatePaymentRequest,
            TransactionEntry,
            TransactionKind,
            TransactionFeed,
            SettleCommissionsRequest,
            SettlementResult,
            DashboardData,
            ActivityItem,
            ActivityKind,
            params::Pagination,
            Meta,
            ApiResponse<User>,
            ApiResponse<DashboardData>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithLines>,
            ApiResponse<InventoryList>,
            ApiResponse<ServiceRequestList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Users", description = "Profile and admin user management"),
        (name = "Vehicles", description = "Vehicle registry"),
        (name = "ServiceRequests", description = "Service request workflow"),
        (name = "Inventory", description = "Parts catalogue and stock"),
        (name = "Cart", description = "Provider parts cart"),
        (name = "Orders", description = "Parts order fulfilment"),
        (name = "InsuranceLeads", description = "Insurance lead pipeline"),
        (name = "Payments", description = "Payments and transaction feed"),
        (name = "Commissions", description = "Commission ledger and settlement"),
        (name = "Dashboard", description = "Role-based dashboard"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
