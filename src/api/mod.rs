pub mod auth;
pub mod error;
mod orders;
mod products;
mod users;
pub mod validation;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/me", get(auth::me))
        .route("/api/users", get(users::list_users))
        .route("/api/users/:id", get(users::get_user))
        .route("/products", get(products::list_products));

    // Routes that need a session cookie
    let protected_routes = Router::new()
        .route("/products", post(products::create_product))
        .route(
            "/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/orders", post(orders::create_order))
        .route("/users/:id/orders", get(orders::user_orders))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest("/auth", auth_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Food Store API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::{seeders, Store};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<AppState>) {
        let (tx, _rx) = mpsc::channel(100);
        let store = Store::new(tx);
        let hash = auth::hash_password("12345").unwrap();
        seeders::seed_demo_data(&store, &hash).unwrap();

        let state = Arc::new(AppState::new(Config::default(), store));
        (create_router(state.clone()), state)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Log in as the demo user and return the `sid=...` cookie pair
    async fn login(app: &Router) -> String {
        let response = send(
            app,
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "demo@example.com", "password": "12345" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let (app, _) = app();

        let response = send(&app, Method::GET, "/", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Food Store API is running");

        let response = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_order_flow() {
        let (app, state) = app();
        let cookie = login(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/orders",
            Some(&cookie),
            Some(json!({
                "user_id": 1,
                "items": [
                    { "product_id": 1, "quantity": 3 },
                    { "product_id": 2, "quantity": 5 }
                ]
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["order"]["id"], 1);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);

        let response = send(
            &app,
            Method::POST,
            "/orders",
            Some(&cookie),
            Some(json!({ "items": [{ "product_id": 1, "quantity": 20 }] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let stock: Vec<i64> = state.store.list_products().iter().map(|p| p.stock).collect();
        assert_eq!(stock, vec![7, 10]);

        let response = send(&app, Method::GET, "/users/1/orders", Some(&cookie), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let response = send(&app, Method::GET, "/users/99/orders", Some(&cookie), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_order_validation() {
        let (app, _) = app();
        let cookie = login(&app).await;

        for body in [
            json!({ "user_id": 0, "items": [{ "product_id": 1, "quantity": 1 }] }),
            json!({ "items": [] }),
            json!({ "items": [{ "product_id": 1, "quantity": 0 }] }),
            json!({ "items": [{ "product_id": 42, "quantity": 1 }] }),
            json!({ "user_id": 9, "items": [{ "product_id": 1, "quantity": 1 }] }),
        ] {
            let response = send(&app, Method::POST, "/orders", Some(&cookie), Some(body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_order_without_user_id_uses_session_user() {
        let (app, _) = app();
        let cookie = login(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/orders",
            Some(&cookie),
            Some(json!({ "items": [{ "product_id": 2, "quantity": 1 }] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["order"]["user_id"], 1);
    }

    #[tokio::test]
    async fn test_protected_routes_require_session() {
        let (app, _) = app();

        let response = send(
            &app,
            Method::POST,
            "/orders",
            None,
            Some(json!({ "items": [{ "product_id": 1, "quantity": 1 }] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&app, Method::DELETE, "/products/1", Some("sid=bogus"), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&app, Method::GET, "/me", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Listing products stays public
        let response = send(&app, Method::GET, "/products", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_product_crud() {
        let (app, _) = app();
        let cookie = login(&app).await;

        let response = send(
            &app,
            Method::POST,
            "/products",
            Some(&cookie),
            Some(json!({ "id": 77, "name": " Eggs ", "category": "Dairy", "stock": 12, "price": 420 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        assert_eq!(created["id"], 3);
        assert_eq!(created["name"], "Eggs");

        let response = send(
            &app,
            Method::POST,
            "/products",
            Some(&cookie),
            Some(json!({ "name": "", "stock": 1, "price": 1 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::PUT,
            "/products/3",
            Some(&cookie),
            Some(json!({ "name": "Eggs (6)", "category": "Dairy", "stock": 6, "price": 250 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["stock"], 6);

        let response = send(
            &app,
            Method::PUT,
            "/products/50",
            Some(&cookie),
            Some(json!({ "name": "Ghost", "stock": 1, "price": 1 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::DELETE, "/products/3", Some(&cookie), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["deleted"], 3);

        let response = send(&app, Method::DELETE, "/products/3", Some(&cookie), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::DELETE, "/products/abc", Some(&cookie), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_login_logout() {
        let (app, _) = app();

        let response = send(
            &app,
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "name": "Demo Again", "email": "demo@example.com", "password": "x" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "name": " Ann ", "email": "ann@example.com", "password": "" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &app,
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "name": " Ann ", "email": "ann@example.com", "password": "pw" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let user = json_body(response).await;
        assert_eq!(user["id"], 2);
        assert_eq!(user["name"], "Ann");
        assert_eq!(user["role"], "customer");
        assert!(user.get("password_hash").is_none());

        let response = send(
            &app,
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "ann@example.com", "password": "wrong" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let cookie = login(&app).await;
        let response = send(&app, Method::GET, "/me", Some(&cookie), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["email"], "demo@example.com");

        let response = send(&app, Method::POST, "/auth/logout", Some(&cookie), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cleared.starts_with("sid=;"));
        assert!(cleared.contains("HttpOnly"));
        assert!(cleared.contains("SameSite=Lax"));
        assert!(cleared.contains("Max-Age=0"));

        let response = send(&app, Method::GET, "/me", Some(&cookie), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_users_endpoints() {
        let (app, _) = app();

        let response = send(&app, Method::GET, "/api/users", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let users = json_body(response).await;
        assert_eq!(users[0]["email"], "demo@example.com");
        assert!(users[0].get("password_hash").is_none());

        let response = send(&app, Method::GET, "/api/users/1", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, "/api/users/5", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/api/users/0", None, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let (app, _) = app();

        let response = send(&app, Method::DELETE, "/api/users", None, None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _) = app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["message"], "invalid JSON");
    }
}
