//! View models and commands over the real HTTP client and a fake REST backend

use chrono::{Duration, Utc};
use farm_app::cli::{self, App};
use farm_app::config::Command;
use farm_app::views::Dashboard;
use farm_app::{guard, AppError, Navigation, Route};
use farm_client::session::unsigned_token;
use farm_client::*;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signed_in_session() -> Session {
    let token = unsigned_token(&Claims {
        exp: Some((Utc::now() + Duration::hours(1)).timestamp()),
        ..Default::default()
    });
    Session::new(MemoryTokenStore::with_token(token))
}

fn client(server: &MockServer, session: Session) -> FarmClient {
    FarmClient::new(ClientConfig::new(format!("{}/v1", server.uri())), session).unwrap()
}

async fn mount_weather(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"temperature": 24, "expectedRain": 12, "humidity": 65}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn dashboard_loads_over_http() {
    let server = MockServer::start().await;
    mount_weather(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/plots"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "plots": [
                    {"id": 1, "name": "North Field A", "acreage": "5.2", "status": "growing"},
                    {"id": 2, "name": "South Field B", "acreage": 3.8, "status": "ready"}
                ],
                "pagination": {"page": 1, "limit": 2, "total": 3, "totalPages": 2}
            }
        })))
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(Arc::new(client(&server, signed_in_session())));
    dashboard.load().await;
    let state = dashboard.state().await;

    assert_eq!(state.error, None);
    assert_eq!(state.plots.len(), 2);
    assert_eq!(state.plots[0].acreage, 5.2);
    assert!(state.pagination.has_more());
    assert_eq!(state.summary().temperature.as_deref(), Some("24°C"));
    assert_eq!(state.summary().expected_rain.as_deref(), Some("12mm"));
}

#[tokio::test]
async fn dashboard_failure_leaves_empty_state() {
    let server = MockServer::start().await;
    mount_weather(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/plots"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(Arc::new(client(&server, signed_in_session())));
    dashboard.load().await;
    let state = dashboard.state().await;

    assert!(state.plots.is_empty());
    assert!(state.weather.is_none());
    assert!(!state.loading);
    assert_eq!(
        state.error.as_deref(),
        Some("Failed to load dashboard data. Please try again later.")
    );
}

#[tokio::test]
async fn expired_session_is_redirected_to_login() {
    let server = MockServer::start().await;
    let expired = unsigned_token(&Claims {
        exp: Some((Utc::now() - Duration::minutes(1)).timestamp()),
        ..Default::default()
    });
    let app = App::remote(client(
        &server,
        Session::new(MemoryTokenStore::with_token(expired)),
    ));

    assert!(!app.is_authenticated());
    let err = cli::execute(&app, Command::Whoami, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Redirected(Route::Login)));

    // No request was made
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn login_then_protected_command() {
    let server = MockServer::start().await;
    let token = unsigned_token(&Claims {
        exp: Some((Utc::now() + Duration::hours(1)).timestamp()),
        ..Default::default()
    });

    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .and(body_json(json!({"email": "farmer@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"token": token, "user": {"id": 1, "name": "Amina", "email": "farmer@example.com"}}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": 1, "name": "Amina", "email": "farmer@example.com"}
        })))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let app = App::remote(client(&server, session.clone()));
    assert_eq!(
        guard(Route::Dashboard, app.is_authenticated()),
        Navigation::Redirect(Route::Login)
    );

    let out = cli::execute(
        &app,
        Command::Login {
            email: "farmer@example.com".into(),
            password: "secret".into(),
        },
        Utc::now(),
    )
    .await
    .unwrap();
    assert_eq!(out, "Signed in as Amina <farmer@example.com>");
    assert_eq!(session.token().as_deref(), Some(token.as_str()));

    let out = cli::execute(&app, Command::Whoami, Utc::now()).await.unwrap();
    assert_eq!(out, "Amina <farmer@example.com>");

    // Signed in users are sent away from the auth screens
    let err = cli::execute(
        &app,
        Command::Signup {
            name: "Amina".into(),
            email: "farmer@example.com".into(),
            password: "secret".into(),
        },
        Utc::now(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Redirected(Route::Dashboard)));
}

#[tokio::test]
async fn server_rejection_logs_user_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/reminders"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .mount(&server)
        .await;

    let session = signed_in_session();
    let mut events = session.subscribe();
    let app = App::remote(client(&server, session.clone()));

    let err = cli::execute(&app, Command::Reminders { reminder_type: None }, Utc::now())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Unauthorized - please login");
    assert!(session.token().is_none());
    assert!(!app.is_authenticated());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoginRequired);
}
