//! # Routes
//!
//! Every route and its access level are declared once in [`endpoints`]; the
//! router attaches the matching guards. Handlers never check access
//! themselves.

use crate::auth::{verify_admin, verify_owner, verify_token};
use crate::handlers::{self, carts, menu, payments, reviews, stats, tokens, users};
use crate::state::AppState;
use axum::{
    handler::Handler,
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{self, MethodRouter},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Who may call a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any valid token
    Token,
    /// Valid token whose email equals the path's email
    Owner,
    /// Valid token for a user whose stored role is admin
    Admin,
}

/// One (method, path) pair with its access level
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
    pub access: Access,
    route: MethodRouter<AppState>,
}

impl Endpoint {
    pub fn get<H, T>(path: &'static str, access: Access, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::GET, path, access, routing::get(handler))
    }

    pub fn post<H, T>(path: &'static str, access: Access, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::POST, path, access, routing::post(handler))
    }

    pub fn patch<H, T>(path: &'static str, access: Access, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::PATCH, path, access, routing::patch(handler))
    }

    pub fn delete<H, T>(path: &'static str, access: Access, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self::new(Method::DELETE, path, access, routing::delete(handler))
    }

    fn new(method: Method, path: &'static str, access: Access, route: MethodRouter<AppState>) -> Self {
        Self {
            method,
            path,
            access,
            route,
        }
    }

    /// Wrap the route in its guards. The last layer added runs first, so
    /// token verification always precedes the role or owner check.
    fn guarded(self, state: &AppState) -> MethodRouter<AppState> {
        let token = from_fn_with_state(state.clone(), verify_token);
        match self.access {
            Access::Public => self.route,
            Access::Token => self.route.route_layer(token),
            Access::Owner => self
                .route
                .route_layer(from_fn_with_state(state.clone(), verify_owner))
                .route_layer(token),
            Access::Admin => self
                .route
                .route_layer(from_fn_with_state(state.clone(), verify_admin))
                .route_layer(token),
        }
    }
}

/// The full route table
///
/// `/users/admin/{key}` is shared: PATCH promotes by user id, GET checks the
/// admin flag by email.
pub fn endpoints() -> Vec<Endpoint> {
    use Access::*;

    vec![
        Endpoint::get("/", Public, handlers::root),
        Endpoint::get("/health", Public, handlers::health),
        // Menu
        Endpoint::get("/menu", Public, menu::list),
        Endpoint::post("/menu", Admin, menu::create),
        Endpoint::get("/menu/{id}", Public, menu::get_one),
        Endpoint::patch("/menu/{id}", Admin, menu::update),
        Endpoint::delete("/menu/{id}", Admin, menu::delete),
        // Reviews
        Endpoint::get("/reviews", Public, reviews::list),
        // Carts
        Endpoint::get("/carts", Public, carts::list),
        Endpoint::post("/carts", Public, carts::create),
        Endpoint::delete("/carts/{id}", Public, carts::delete),
        // Users
        Endpoint::get("/users", Admin, users::list),
        Endpoint::post("/users", Public, users::create),
        Endpoint::delete("/users/{id}", Admin, users::delete),
        Endpoint::patch("/users/admin/{key}", Admin, users::promote),
        Endpoint::get("/users/admin/{key}", Owner, users::admin_status),
        // Tokens
        Endpoint::post("/jwt", Public, tokens::issue),
        // Payments
        Endpoint::post("/create-payment-intent", Public, payments::create_intent),
        Endpoint::post("/payments", Public, payments::record),
        Endpoint::get("/payments/{email}", Owner, payments::history),
        // Stats
        Endpoint::get("/admin-stats", Admin, stats::admin_stats),
        Endpoint::get("/order-stats", Admin, stats::order_stats),
    ]
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    // Routes on the same path merge their methods
    let router = endpoints()
        .into_iter()
        .fold(Router::new(), |router, endpoint| {
            let path = endpoint.path;
            router.route(path, endpoint.guarded(&state))
        });

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
