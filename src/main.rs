use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use community_platform::config::Config;
use community_platform::web::middleware::auth as auth_middleware;
use community_platform::web::routes::{api, event, organization, profile, project};
use community_platform::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Connect to the database
    let config = Config::from_env();
    info!("Connecting to database: {}", config.database_url);

    let pool = SqlitePoolOptions::new()
        .connect(&config.database_url)
        .await
        .expect("Cannot connect to the database");

    let host = config.host.clone();
    let port = config.port;
    let state = AppState::new(pool, config);

    // 3. Session-protected command routes under one middleware layer
    let protected_routes = Router::new()
        .route(
            "/event/:slug/participants",
            post(event::event_participants_handler),
        )
        .route(
            "/event/:slug/waiting-list",
            post(event::event_waiting_list_handler),
        )
        .route(
            "/event/:slug/participant-limit",
            post(event::event_participant_limit_handler),
        )
        .route(
            "/event/:slug/participants/suggestions",
            get(event::participant_suggestions_handler),
        )
        .layer(middleware::from_fn(auth_middleware::require_session));

    // 4. Public entity pages: anonymous allowed, session picked up when present
    let page_routes = Router::new()
        .route("/event/:slug", get(event::event_detail_handler))
        .route("/profile/:username", get(profile::profile_handler))
        .route("/organization/:slug", get(organization::organization_handler))
        .route("/project/:slug", get(project::project_handler))
        .layer(middleware::from_fn(auth_middleware::optional_session));

    // 5. Key-protected REST API
    let api_routes = Router::new()
        .route("/api/v1/profile/:username", get(api::api_profile_handler))
        .route("/api/v1/project/:slug", get(api::api_project_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_api_key,
        ));

    let app = Router::new()
        .merge(page_routes)
        .merge(protected_routes)
        .merge(api_routes)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // 6. Start the server (with fallback port)
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Could not bind on {}: {}. Trying fallback {}:{}", addr, e, host, port + 1);
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind on fallback port")
        }
    };

    let bound_addr = listener.local_addr().expect("Listener has a local address");
    info!("Server running on http://{}", bound_addr);

    axum::serve(listener, app).await.expect("Server failed");
}
