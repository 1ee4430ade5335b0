//! Application router assembly.
//!
//! Mounts every route group under `/api` and attaches the shared pool and
//! token utilities as request extensions.

use crate::api;
use crate::api::common::ApiResponse;
use crate::auth;
use crate::auth::service::ManagerBootstrap;
use crate::utils::jwt::JwtUtils;
use axum::{Extension, Router, response::Json, routing::get};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Builds the complete application router.
///
/// `protect_resource_routes` puts the project and task routes behind the
/// same manager check as the administrative routes. `manager_bootstrap`
/// names the account that is made a manager when it registers.
pub fn build_router(
    pool: SqlitePool,
    jwt_utils: Arc<JwtUtils>,
    protect_resource_routes: bool,
    manager_bootstrap: ManagerBootstrap,
) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api/Auth", auth::routes::auth_router())
        .nest(
            "/api/Projects",
            api::project::routes::project_router(protect_resource_routes),
        )
        .nest(
            "/api/Tasks",
            api::task::routes::task_router(protect_resource_routes),
        )
        .nest("/api/Setup", api::setup::routes::setup_router())
        .layer(Extension(pool))
        .layer(Extension(jwt_utils))
        .layer(Extension(manager_bootstrap))
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "ProjectDesk API",
            "version": env!("CARGO_PKG_VERSION")
        }),
        "Welcome to ProjectDesk API",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::services::role_service::RoleService;
    use crate::utils::jwt::TEST_SECRET;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        pool: SqlitePool,
        jwt: Arc<JwtUtils>,
    }

    impl TestApp {
        async fn new(protect: bool) -> Self {
            Self::with_bootstrap(protect, ManagerBootstrap::default()).await
        }

        async fn with_bootstrap(protect: bool, bootstrap: ManagerBootstrap) -> Self {
            let pool = test_pool().await;
            let jwt = Arc::new(JwtUtils::new(TEST_SECRET, 4 * 60 * 60).unwrap());
            let router = build_router(pool.clone(), jwt.clone(), protect, bootstrap);
            Self { router, pool, jwt }
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }

        async fn register(&self, email: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/Auth/Register",
                    None,
                    Some(json!({ "name": "Test", "email": email, "password": "Passw0rd!" })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            body["token"].as_str().unwrap().to_string()
        }

        async fn login(&self, email: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/Auth/Login",
                    None,
                    Some(json!({ "email": email, "password": "Passw0rd!" })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            body["token"].as_str().unwrap().to_string()
        }

        async fn manager_token(&self) -> String {
            self.register("boss@example.com").await;
            let roles = RoleService::new(&self.pool);
            roles.create_role("manager").await.unwrap();
            roles
                .add_user_to_role("boss@example.com", "manager")
                .await
                .unwrap();
            self.login("boss@example.com").await
        }
    }

    fn project_body(name: &str) -> Value {
        json!({
            "name": name,
            "description": "Quarterly planning",
            "startDate": "2024-01-01T00:00:00Z",
            "endDate": "2024-03-31T00:00:00Z"
        })
    }

    fn task_body(project_id: i64) -> Value {
        json!({
            "title": "Draft roadmap",
            "description": "First pass",
            "deadline": "2024-02-01T00:00:00Z",
            "isCompleted": false,
            "projectId": project_id
        })
    }

    #[tokio::test]
    async fn test_root_handler() {
        let app = TestApp::new(false).await;
        let (status, body) = app.send(Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["service"], "ProjectDesk API");
    }

    #[tokio::test]
    async fn test_register_and_login_flow() {
        let app = TestApp::new(false).await;
        let token = app.register("ada@example.com").await;
        let claims = app.jwt.validate_token(&token).unwrap();
        assert_eq!(claims.email(), Some("ada@example.com"));

        let (status, body) = app
            .send(
                Method::POST,
                "/api/Auth/Login",
                None,
                Some(json!({ "email": "ada@example.com", "password": "Passw0rd!" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], true);
        assert_eq!(body["expiresIn"], 4 * 60 * 60);
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_rejected() {
        let app = TestApp::new(false).await;
        app.register("ada@example.com").await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/Auth/Register",
                None,
                Some(json!({ "name": "Other", "email": "ada@example.com", "password": "An0ther!pw" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["errorType"], "already_exists");
    }

    #[tokio::test]
    async fn test_weak_password_reports_each_rule() {
        let app = TestApp::new(false).await;
        let (status, body) = app
            .send(
                Method::POST,
                "/api/Auth/Register",
                None,
                Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "abc" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let details = body["error"]["details"].as_array().unwrap();
        // length, digit, uppercase, non-alphanumeric
        assert_eq!(details.len(), 4);
        assert!(details.iter().all(|d| d["field"] == "password"));
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let app = TestApp::new(false).await;
        app.register("ada@example.com").await;

        let (wrong_status, wrong_body) = app
            .send(
                Method::POST,
                "/api/Auth/Login",
                None,
                Some(json!({ "email": "ada@example.com", "password": "Wr0ng!pass" })),
            )
            .await;
        let (unknown_status, unknown_body) = app
            .send(
                Method::POST,
                "/api/Auth/Login",
                None,
                Some(json!({ "email": "ghost@example.com", "password": "Passw0rd!" })),
            )
            .await;

        assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
        assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
        assert_eq!(wrong_body["message"], unknown_body["message"]);
        assert_eq!(wrong_body["error"], unknown_body["error"]);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = TestApp::new(false).await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/Auth/Login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_setup_requires_manager_token() {
        let app = TestApp::new(false).await;

        let (status, _) = app
            .send(Method::GET, "/api/Setup/GetAllRoles", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .send(Method::GET, "/api/Setup/GetAllRoles", Some("not-a-token"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let plain = app.register("ada@example.com").await;
        let (status, _) = app
            .send(Method::GET, "/api/Setup/GetAllRoles", Some(&plain), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let manager = app.manager_token().await;
        let (status, body) = app
            .send(Method::GET, "/api/Setup/GetAllRoles", Some(&manager), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "manager");
    }

    #[tokio::test]
    async fn test_bootstrap_manager_can_administer_roles() {
        let bootstrap = ManagerBootstrap::new(Some("boss@example.com".to_string()));
        let app = TestApp::with_bootstrap(false, bootstrap).await;

        let plain = app.register("ada@example.com").await;
        let (status, _) = app
            .send(Method::GET, "/api/Setup/GetAllRoles", Some(&plain), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let boss = app.register("boss@example.com").await;
        let (status, body) = app
            .send(Method::GET, "/api/Setup/GetAllRoles", Some(&boss), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "manager");

        // a later login still carries the role
        let relogin = app.login("boss@example.com").await;
        let (status, _) = app
            .send(Method::GET, "/api/Setup/GetAllUsers", Some(&relogin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_setup_role_administration() {
        let app = TestApp::new(false).await;
        let manager = app.manager_token().await;
        app.register("ada@example.com").await;

        let (status, _) = app
            .send(
                Method::POST,
                "/api/Setup/CreateRole?roleName=auditor",
                Some(&manager),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/Setup/CreateRole?roleName=auditor",
                Some(&manager),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/Setup/AddUserToRole?email=ada@example.com&roleName=auditor",
                Some(&manager),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/Setup/AddUserToRole?email=ada@example.com&roleName=missing",
                Some(&manager),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send(
                Method::GET,
                "/api/Setup/GetUserRoles?email=ada@example.com",
                Some(&manager),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["auditor"]));

        let (status, _) = app
            .send(Method::GET, "/api/Setup/GetUserRoles", Some(&manager), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/Setup/AddClaimToRole?roleName=auditor&claimType=scope&claimValue=read",
                Some(&manager),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let token = app.login("ada@example.com").await;
        let claims = app.jwt.validate_token(&token).unwrap();
        assert_eq!(claims.roles(), vec!["auditor"]);
        assert_eq!(claims.first("scope"), Some("read"));

        let (status, _) = app
            .send(
                Method::POST,
                "/api/Setup/RemoveUserFromRole?email=ada@example.com&roleName=auditor",
                Some(&manager),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/Setup/RemoveUserFromRole?email=ada@example.com&roleName=auditor",
                Some(&manager),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_user_listing_hides_password_hashes() {
        let app = TestApp::new(false).await;
        let manager = app.manager_token().await;

        let (status, body) = app
            .send(Method::GET, "/api/Setup/GetAllUsers", Some(&manager), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_project_crud_statuses() {
        let app = TestApp::new(false).await;

        let (status, created) = app
            .send(Method::POST, "/api/Projects", None, Some(project_body("Roadmap")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let uri = format!("/api/Projects/{id}");
        let (status, fetched) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Roadmap");
        assert_eq!(fetched["tasks"], json!([]));

        let (status, _) = app
            .send(Method::PUT, &uri, None, Some(project_body("Renamed")))
            .await;
        assert_eq!(status, StatusCode::OK);
        let (_, fetched) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(fetched["name"], "Renamed");

        let (status, _) = app
            .send(Method::PUT, "/api/Projects/999", None, Some(project_body("Nope")))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .send(Method::POST, "/api/Projects", None, Some(project_body("")))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"][0]["field"], "name");

        let (status, _) = app.send(Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.send(Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_task_crud_and_project_reference() {
        let app = TestApp::new(false).await;

        let (status, _) = app
            .send(Method::POST, "/api/Tasks", None, Some(task_body(42)))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, tasks) = app.send(Method::GET, "/api/Tasks", None, None).await;
        assert_eq!(tasks, json!([]));

        let (_, project) = app
            .send(Method::POST, "/api/Projects", None, Some(project_body("Roadmap")))
            .await;
        let project_id = project["id"].as_i64().unwrap();

        let (status, task) = app
            .send(Method::POST, "/api/Tasks", None, Some(task_body(project_id)))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let task_uri = format!("/api/Tasks/{}", task["id"]);

        let mut update = task_body(project_id);
        update["isCompleted"] = json!(true);
        let (status, body) = app.send(Method::PUT, &task_uri, None, Some(update)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (_, fetched) = app.send(Method::GET, &task_uri, None, None).await;
        assert_eq!(fetched["isCompleted"], true);

        let (_, project) = app
            .send(Method::GET, &format!("/api/Projects/{project_id}"), None, None)
            .await;
        assert_eq!(project["tasks"].as_array().unwrap().len(), 1);

        let (status, _) = app
            .send(Method::PUT, &task_uri, None, Some(task_body(777)))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send(Method::DELETE, &task_uri, None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send(Method::DELETE, &task_uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deleting_project_cascades_to_tasks() {
        let app = TestApp::new(false).await;
        let (_, project) = app
            .send(Method::POST, "/api/Projects", None, Some(project_body("Roadmap")))
            .await;
        let project_id = project["id"].as_i64().unwrap();
        let (_, task) = app
            .send(Method::POST, "/api/Tasks", None, Some(task_body(project_id)))
            .await;

        let (status, _) = app
            .send(
                Method::DELETE,
                &format!("/api/Projects/{project_id}"),
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app
            .send(Method::GET, &format!("/api/Tasks/{}", task["id"]), None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_protected_resource_routes() {
        let app = TestApp::new(true).await;

        let (status, _) = app.send(Method::GET, "/api/Projects", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let plain = app.register("ada@example.com").await;
        let (status, _) = app
            .send(Method::GET, "/api/Tasks", Some(&plain), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let manager = app.manager_token().await;
        let (status, _) = app
            .send(Method::GET, "/api/Projects", Some(&manager), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let app = TestApp::new(false).await;
        app.manager_token().await;

        let mut claims = app
            .jwt
            .validate_token(&app.login("boss@example.com").await)
            .unwrap();
        claims.iat -= 2 * 60 * 60 * 24;
        claims.nbf = claims.iat;
        claims.exp = claims.iat + 60;
        let expired = app.jwt.encode_claims(&claims).unwrap();

        let (status, _) = app
            .send(Method::GET, "/api/Setup/GetAllRoles", Some(&expired), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
