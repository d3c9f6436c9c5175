use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_booking, create_comment, decide_booking, get_booking_by_id, get_item,
    list_bookings_for_booker, list_bookings_for_owner, list_items_for_owner,
};

/// Creates the API router with all booking and item-view endpoints
///
/// Booking lifecycle:
/// - POST /bookings - Request a booking
/// - PATCH /bookings/:id?approved= - Approve or reject a booking
/// - GET /bookings/:id - Get booking details
/// - GET /bookings?state= - List bookings as booker
/// - GET /bookings/owner?state= - List bookings on owned items
///
/// Item views:
/// - GET /items - Owner's items with last/next bookings and comments
/// - GET /items/:id - Item details
/// - POST /items/:id/comment - Comment after a finished booking
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Booking lifecycle
        .route("/bookings", post(create_booking).get(list_bookings_for_booker))
        .route("/bookings/owner", get(list_bookings_for_owner))
        .route("/bookings/:id", patch(decide_booking).get(get_booking_by_id))
        // Item views
        .route("/items", get(list_items_for_owner))
        .route("/items/:id", get(get_item))
        .route("/items/:id/comment", post(create_comment))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
