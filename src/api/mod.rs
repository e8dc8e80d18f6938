// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{IdentityClaims, Role},
    models::{LoginRequest, SignupRequest},
    state::AppState,
};

pub mod health;
pub mod login;
pub mod session;
pub mod signup;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/login", post(login::login))
        .route("/auth", get(session::session))
        .route("/signup", post(signup::signup))
        .route("/users/me", get(users::get_current_user))
        .route("/admin/users", get(users::list_users))
        .with_state(state);

    Router::new()
        .route("/health", get(health::liveness))
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        login::login,
        session::session,
        signup::signup,
        users::get_current_user,
        users::list_users,
        health::liveness
    ),
    components(
        schemas(
            IdentityClaims,
            Role,
            LoginRequest,
            SignupRequest,
            health::HealthResponse
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Auth", description = "Login, signup and session resolution"),
        (name = "Users", description = "User profiles"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::auth::testing::SECRET;
    use crate::auth::{password, ManualClock, Role, SigningKeys};
    use crate::state::AppState;
    use crate::storage::{InMemoryUserRepository, NewUser, UserRecord, UserRepository};

    pub const T0: i64 = 1_700_000_000;
    pub const PASSWORD: &str = "correct-horse-battery";

    pub struct TestApp {
        pub router: Router,
        pub state: AppState,
        pub clock: ManualClock,
        pub users: Arc<InMemoryUserRepository>,
    }

    impl TestApp {
        pub fn new() -> Self {
            let clock = ManualClock::at(T0);
            let users = Arc::new(InMemoryUserRepository::new());
            let state = AppState::new(
                SigningKeys::from_secret(SECRET).unwrap(),
                users.clone(),
                Arc::new(clock.clone()),
            )
            .with_token_ttl(60);
            Self {
                router: super::router(state.clone()),
                state,
                clock,
                users,
            }
        }

        pub async fn add_user(&self, name: &str, email: &str, role: Role) -> UserRecord {
            self.users
                .create(NewUser {
                    name: name.to_string(),
                    email: email.to_string(),
                    role,
                    password_hash: password::hash(PASSWORD).unwrap(),
                })
                .await
                .unwrap()
        }

        pub fn token_for(&self, record: &UserRecord) -> String {
            self.state.issuer.issue(&record.profile(), 60).unwrap().token
        }

        pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, body)
        }
    }

    pub fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }
}
