use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::{auth, chat, handlers, librarian, listings, middleware::metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config().server.static_dir.clone();

    // API routes
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Listings
        .route(
            "/listings",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route("/listings/mine", get(listings::my_listings))
        .route(
            "/listings/images",
            post(listings::upload_images).layer(DefaultBodyLimit::max(listings::MAX_UPLOAD_BYTES)),
        )
        .route("/listings/{id}", delete(listings::delete_listing))
        .route("/listings/{id}/sold", post(listings::mark_sold))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/profile", put(auth::update_profile))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        // Librarian
        .route("/librarian", post(librarian::ask))
        .route("/librarian/suggestions", get(librarian::suggestions))
        // Chat
        .route("/chat", post(chat::open_chat))
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state);

    // Serve the web UI with SPA fallback
    let index_path = static_dir.join("index.html");
    let serve_dir = ServeDir::new(&static_dir).fallback(ServeFile::new(index_path));

    Router::new()
        .nest("/api/v1", api_routes)
        .fallback_service(serve_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
