//! Route definitions for the Fishing Vessel Settlement Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/vessels", vessel_routes())
        .nest("/crew-members", crew_member_routes())
        .nest("/fish-types", fish_type_routes())
        .nest("/trips", trip_routes())
        .nest("/weekly-sheets", weekly_sheet_routes())
}

/// Vessel management routes
fn vessel_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::vessel::list_vessels).post(handlers::vessel::create_vessel),
        )
        .route(
            "/:vessel_id",
            get(handlers::vessel::get_vessel)
                .put(handlers::vessel::update_vessel)
                .delete(handlers::vessel::deactivate_vessel),
        )
}

/// Crew member management routes
fn crew_member_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::crew_member::list_crew_members)
                .post(handlers::crew_member::create_crew_member),
        )
        .route(
            "/:crew_member_id",
            get(handlers::crew_member::get_crew_member)
                .put(handlers::crew_member::update_crew_member)
                .delete(handlers::crew_member::deactivate_crew_member),
        )
}

/// Fish type and rate routes
fn fish_type_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::fish_type::list_fish_types).post(handlers::fish_type::create_fish_type),
        )
        .route(
            "/:fish_type_id",
            get(handlers::fish_type::get_fish_type).put(handlers::fish_type::update_fish_type),
        )
        .route(
            "/:fish_type_id/rates",
            get(handlers::fish_type::list_rates).post(handlers::fish_type::add_rate),
        )
        .route(
            "/:fish_type_id/rates/current",
            get(handlers::fish_type::current_rate),
        )
}

/// Trip lifecycle routes
fn trip_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::trip::list_trips).post(handlers::trip::create_trip),
        )
        .route(
            "/:trip_id",
            get(handlers::trip::get_trip).put(handlers::trip::update_trip),
        )
        .route("/:trip_id/crew", post(handlers::trip::assign_crew))
        .route("/:trip_id/bills", post(handlers::trip::add_bills))
        .route("/:trip_id/purchases", post(handlers::trip::add_purchases))
        .route("/:trip_id/expenses", post(handlers::trip::add_expenses))
        .route(
            "/:trip_id/expenses/:expense_id/approve",
            post(handlers::trip::approve_expense),
        )
        .route(
            "/:trip_id/expenses/:expense_id/reject",
            post(handlers::trip::reject_expense),
        )
        .route("/:trip_id/finalize", post(handlers::trip::finalize_trip))
        .route("/:trip_id/close", post(handlers::trip::close_trip))
        .route("/:trip_id/reopen", post(handlers::trip::reopen_trip))
}

/// Weekly settlement sheet routes
fn weekly_sheet_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::weekly_sheet::list_sheets).post(handlers::weekly_sheet::create_sheet),
        )
        .route("/:sheet_id", get(handlers::weekly_sheet::get_sheet))
        .route(
            "/:sheet_id/expenses",
            post(handlers::weekly_sheet::add_expenses),
        )
        .route(
            "/:sheet_id/expenses/:expense_id/approve",
            post(handlers::weekly_sheet::approve_expense),
        )
        .route(
            "/:sheet_id/credits",
            post(handlers::weekly_sheet::add_credits),
        )
        .route(
            "/:sheet_id/calculate",
            get(handlers::weekly_sheet::calculate),
        )
        .route("/:sheet_id/finalize", post(handlers::weekly_sheet::finalize))
        .route("/:sheet_id/reopen", post(handlers::weekly_sheet::reopen))
        .route(
            "/:sheet_id/mark-paid",
            post(handlers::weekly_sheet::mark_paid),
        )
}
