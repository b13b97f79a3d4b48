//! Route definitions for the Gestionale platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Mail delivery webhook (public - authenticated by signature)
        .route("/webhook/mail", post(handlers::handle_mail_webhook))
        // Protected routes - registry
        .nest("/registry", registry_routes())
        // Protected routes - product catalog
        .nest("/catalog", catalog_routes())
        // Protected routes - purchase orders and receipts
        .nest("/orders", order_routes())
        .nest("/receipts", receipt_routes())
        // Protected routes - warehouse inventory
        .nest("/inventory", inventory_routes())
        // Protected routes - fleet management
        .nest("/fleet", fleet_routes())
        // Protected routes - employees and time tracking
        .nest("/employees", employee_routes())
        // Protected routes - notifications
        .nest("/notifications", notification_routes())
        // Protected routes - reports and exports
        .nest("/reports", report_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Registry routes (protected)
fn registry_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/customers/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::deactivate_customer),
        )
        .route(
            "/suppliers",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/suppliers/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::deactivate_supplier),
        )
        .route(
            "/representatives",
            get(handlers::list_representatives).post(handlers::create_representative),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product catalog routes (protected)
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::deactivate_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase order routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/receivable", get(handlers::list_receivable_orders))
        .route(
            "/:order_id",
            get(handlers::get_order).put(handlers::update_order),
        )
        .route("/:order_id/status", put(handlers::update_order_status))
        .route("/:order_id/cancel", post(handlers::cancel_order))
        // Receipt reconciliation closes the order lifecycle
        .route("/:order_id/receive", post(handlers::receive_order))
        .route("/:order_id/receipt", get(handlers::get_order_receipt))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Receipt routes (protected)
fn receipt_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_receipts))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Warehouse inventory routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/lots", get(handlers::list_lots))
        .route("/lots/expiring", get(handlers::list_expiring_lots))
        .route("/lots/expired", get(handlers::list_expired_lots))
        .route("/lots/:lot_id", get(handlers::get_lot))
        .route("/low-stock", get(handlers::list_low_stock))
        .route("/summary", get(handlers::stock_summary))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Fleet management routes (protected)
fn fleet_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/vehicles",
            get(handlers::list_vehicles).post(handlers::create_vehicle),
        )
        .route(
            "/vehicles/:vehicle_id",
            get(handlers::get_vehicle).put(handlers::update_vehicle),
        )
        .route(
            "/vehicles/:vehicle_id/refuels",
            get(handlers::list_refuels).post(handlers::record_refuel),
        )
        .route(
            "/vehicles/:vehicle_id/maintenance",
            get(handlers::list_maintenance).post(handlers::create_maintenance),
        )
        .route(
            "/maintenance/:maintenance_id/complete",
            post(handlers::complete_maintenance),
        )
        .route(
            "/vehicles/:vehicle_id/documents",
            get(handlers::list_vehicle_documents).post(handlers::create_vehicle_document),
        )
        .route(
            "/vehicles/:vehicle_id/statistics",
            get(handlers::get_vehicle_statistics),
        )
        .route("/documents/expiring", get(handlers::list_expiring_documents))
        .route("/fuel-types", get(handlers::list_fuel_types))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Employee routes (protected)
fn employee_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/:employee_id",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::deactivate_employee),
        )
        .route(
            "/:employee_id/work-days",
            get(handlers::list_work_days).post(handlers::record_work_day),
        )
        .route(
            "/work-days/:work_day_id/confirm",
            post(handlers::confirm_work_day),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Notification routes (protected)
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/unread-count", get(handlers::get_unread_count))
        .route("/mark-all-read", post(handlers::mark_all_as_read))
        .route("/:notification_id/read", post(handlers::mark_as_read))
        .route(
            "/:notification_id/dismiss",
            post(handlers::dismiss_notification),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Report routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard_metrics))
        .route("/orders.csv", get(handlers::export_orders_csv))
        .route("/inventory.csv", get(handlers::export_inventory_csv))
        .route("/fleet-costs.csv", get(handlers::export_fleet_costs_csv))
        .route_layer(middleware::from_fn(auth_middleware))
}
