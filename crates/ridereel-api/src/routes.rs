use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::state::AppState;
use crate::{auth, checkout, events, imports, middleware::require_auth, purchases, riders, stats};

/// Build the full REST surface. Paths and verbs match what the storefront
/// and admin pages already call.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/events", get(events::list_events))
        .route("/api/events/{id}", get(events::get_event))
        .route("/api/riders", get(riders::list_riders))
        .route("/api/riders/{id}", get(riders::get_rider))
        // Buyer actions: always public.
        .route("/api/purchases", post(purchases::create_purchase))
        .route("/api/purchases/check", get(purchases::check_purchase))
        .route("/api/create-payment-intent", post(checkout::create_payment_intent))
        .route("/paypal/setup", get(checkout::paypal_setup))
        .route("/paypal/order", post(checkout::create_paypal_order))
        .route("/paypal/order/{order_id}/capture", post(checkout::capture_paypal_order))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/api/user", get(auth::current_user))
        .route("/api/events", post(events::create_event))
        .route("/api/events/{id}", delete(events::delete_event))
        .route("/api/riders", post(riders::create_rider))
        .route("/api/riders/{id}", delete(riders::delete_rider))
        .route("/api/riders/import/preview", post(imports::preview_import))
        .route("/api/riders/import", post(imports::import_riders))
        .route("/api/riders/export", get(imports::export_riders))
        .route("/api/stats/sales", get(stats::sales_by_event))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}
