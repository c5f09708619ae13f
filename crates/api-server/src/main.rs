use application::UserApp;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use domain::{DomainError, User};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

mod config;
use config::Config;

#[derive(Clone)]
struct AppState {
    user_app: Arc<UserApp>,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    message: String,
    version: String,
    environment: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("api_server=debug,tower_http=debug")
        .init();

    info!("🚀 Starting User API Server");

    // Load configuration from environment
    let config = Config::from_env();

    info!("💾 Using database: {}", config.database_path);
    info!("🌐 API server will bind to: {}:{}", config.api_host, config.api_port);

    // Wire the user application against the durable store
    let user_app = Arc::new(UserApp::new(&config.database_path));
    let app_state = AppState { user_app };

    let app = app(app_state);

    // Run the server
    let bind_address = format!("{}:{}", config.api_host, config.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("🌐 API Server listening on http://{}", bind_address);
    info!("📖 API Documentation:");
    info!("   GET    /api/user/GetUsers          - List all users");
    info!("   GET    /api/user/GetUserById/:id   - Get user by id");
    info!("   POST   /api/user/CreateUser        - Create a user");
    info!("   PUT    /api/user/UpdateUser        - Update a user");
    info!("   DELETE /api/user/DeleteUser/:id    - Delete a user");
    info!("   GET    /api/status                 - System status");
    info!("   GET    /health                     - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // User CRUD endpoints
        .route("/api/user/GetUsers", get(get_users))
        .route("/api/user/GetUserById/:id", get(get_user_by_id))
        .route("/api/user/CreateUser", post(create_user))
        .route("/api/user/UpdateUser", put(update_user))
        .route("/api/user/DeleteUser/:id", delete(delete_user))
        // System info endpoints
        .route("/api/status", get(get_system_status))
        // Health check
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Handler functions
async fn get_users(State(state): State<AppState>) -> impl IntoResponse {
    match state.user_app.user_service.get_all_users().await {
        Ok(users) => Json(users).into_response(),
        Err(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to list users: {}", e))
                .into_response()
        }
    }
}

async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.user_app.user_service.get_user_by_id(id).await {
        Ok(user) => Json(user).into_response(),
        Err(e @ DomainError::UserNotFound(_)) => {
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        Err(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to get user: {}", e))
                .into_response()
        }
    }
}

async fn create_user(
    State(state): State<AppState>,
    payload: Option<Json<User>>,
) -> impl IntoResponse {
    // A missing or undeserializable body reaches the service as None
    let user = payload.map(|Json(user)| user);

    match state.user_app.user_service.create_user(user.clone()).await {
        Ok(rows) if rows > 0 => match user {
            Some(user) => {
                info!("✅ Created user {}", user.id);
                let location = format!("/api/user/GetUserById/{}", user.id);
                (StatusCode::CREATED, [(header::LOCATION, location)], Json(user)).into_response()
            }
            None => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error creating user".to_string())
                    .into_response()
            }
        },
        Ok(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Error creating user".to_string()).into_response()
        }
        Err(e @ DomainError::InvalidArgument(_)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to create user: {}", e))
                .into_response()
        }
    }
}

async fn update_user(
    State(state): State<AppState>,
    payload: Option<Json<User>>,
) -> impl IntoResponse {
    let user = payload.map(|Json(user)| user);

    match state.user_app.user_service.update_user(user).await {
        Ok(rows) if rows > 0 => StatusCode::NO_CONTENT.into_response(),
        Ok(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Error updating user".to_string()).into_response()
        }
        Err(e @ DomainError::UserNotFound(_)) => {
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        Err(e @ DomainError::InvalidArgument(_)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to update user: {}", e))
                .into_response()
        }
    }
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.user_app.user_service.delete_user(id).await {
        Ok(rows) if rows > 0 => {
            info!("🗑️  Deleted user {}", id);
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Error deleting user".to_string()).into_response()
        }
        Err(e @ DomainError::UserNotFound(_)) => {
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        Err(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to delete user: {}", e))
                .into_response()
        }
    }
}

async fn get_system_status() -> impl IntoResponse {
    let status = StatusResponse {
        message: "User API Server is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: std::env::var("ENV").unwrap_or_else(|_| "development".to_string()),
    };
    Json(status)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_user_id() -> Uuid {
        Uuid::parse_str("0bd7888d-28e0-4f99-be78-bc4987c4ba9c").unwrap()
    }

    fn test_user() -> User {
        User::new(
            test_user_id(),
            "Nawaf".to_string(),
            "nawaf.maqbali@rihal.om".to_string(),
        )
    }

    /// The empty-default record the original suite used to probe the
    /// bad-request path.
    fn empty_user() -> User {
        User::new(Uuid::nil(), String::new(), String::new())
    }

    async fn client(seed_data: bool) -> Router {
        let user_app = UserApp::in_memory();
        if seed_data {
            user_app
                .user_service
                .create_user(Some(test_user()))
                .await
                .unwrap();
        }
        app(AppState {
            user_app: Arc::new(user_app),
        })
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn with_json_body(method: &str, uri: &str, user: &User) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(user).unwrap()))
            .unwrap()
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(
        response: axum::response::Response,
    ) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_users_with_data_seed_returns_list_of_users() {
        let app = client(true).await;

        let response = app.oneshot(get("/api/user/GetUsers")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let users: Vec<User> = json_body(response).await;
        assert_eq!(users, vec![test_user()]);
    }

    #[tokio::test]
    async fn get_users_with_no_data_seed_returns_empty_list() {
        let app = client(false).await;

        let response = app.oneshot(get("/api/user/GetUsers")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let users: Vec<User> = json_body(response).await;
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn get_user_by_id_with_valid_id_returns_user() {
        let app = client(true).await;

        let response = app
            .oneshot(get(&format!("/api/user/GetUserById/{}", test_user_id())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let user: User = json_body(response).await;
        assert_eq!(user.id, test_user_id());
    }

    #[tokio::test]
    async fn get_user_by_id_with_invalid_id_returns_not_found() {
        let app = client(false).await;

        let response = app
            .oneshot(get(&format!("/api/user/GetUserById/{}", test_user_id())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_user_with_valid_user_returns_created() {
        let app = client(false).await;

        let response = app
            .oneshot(with_json_body("POST", "/api/user/CreateUser", &test_user()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        assert_eq!(
            location,
            Some(format!("/api/user/GetUserById/{}", test_user_id()))
        );
        let created: User = json_body(response).await;
        assert_eq!(created, test_user());
    }

    #[tokio::test]
    async fn create_user_with_empty_user_returns_bad_request() {
        let app = client(false).await;

        let response = app
            .oneshot(with_json_body("POST", "/api/user/CreateUser", &empty_user()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_user_with_no_body_returns_bad_request() {
        let app = client(false).await;

        let response = app
            .oneshot(request("POST", "/api/user/CreateUser"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_user_with_valid_user_returns_no_content() {
        let app = client(true).await;
        let mut user = test_user();
        user.name = "Mohammed".to_string();

        let response = app
            .oneshot(with_json_body("PUT", "/api/user/UpdateUser", &user))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn update_user_with_empty_user_returns_bad_request() {
        let app = client(true).await;

        let response = app
            .oneshot(with_json_body("PUT", "/api/user/UpdateUser", &empty_user()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_user_with_unknown_user_returns_not_found() {
        let app = client(false).await;

        let response = app
            .oneshot(with_json_body("PUT", "/api/user/UpdateUser", &test_user()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_user_with_valid_id_returns_no_content() {
        let app = client(true).await;

        let response = app
            .oneshot(request(
                "DELETE",
                &format!("/api/user/DeleteUser/{}", test_user_id()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_user_with_invalid_id_returns_not_found() {
        let app = client(false).await;

        let response = app
            .oneshot(request(
                "DELETE",
                &format!("/api/user/DeleteUser/{}", test_user_id()),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn created_user_lifecycle_end_to_end() {
        let app = client(false).await;
        let uri = format!("/api/user/GetUserById/{}", test_user_id());

        // POST a user, then GET it back with matching fields
        let response = app
            .clone()
            .oneshot(with_json_body("POST", "/api/user/CreateUser", &test_user()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: User = json_body(response).await;
        assert_eq!(fetched, test_user());

        // DELETE it, then the GET turns into a 404
        let response = app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/user/DeleteUser/{}", test_user_id()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let app = client(false).await;

        let response = app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = json_body(response).await;
        assert_eq!(body["status"], "healthy");
    }
}
