//! HTTP-level tests for the farm client against a fake REST backend

use chrono::{Duration, Utc};
use farm_client::session::unsigned_token;
use farm_client::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn valid_token() -> String {
    unsigned_token(&Claims {
        email: Some("farmer@example.com".into()),
        exp: Some((Utc::now() + Duration::hours(2)).timestamp()),
        ..Default::default()
    })
}

fn client_for(server: &MockServer, session: Session) -> FarmClient {
    FarmClient::new(ClientConfig::new(server.uri()), session).unwrap()
}

#[tokio::test]
async fn bearer_token_attached() {
    let server = MockServer::start().await;
    let token = valid_token();

    Mock::given(method("GET"))
        .and(path("/crops"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 1, "name": "Wheat", "category": "major_crops"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new(MemoryTokenStore::with_token(token));
    let crops = client_for(&server, session).fetch_crops().await.unwrap();

    assert_eq!(crops.len(), 1);
    assert_eq!(crops[0].category, Some(CropCategory::MajorCrops));
}

#[tokio::test]
async fn unauthorized_clears_token_and_signals() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plots"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})),
        )
        .mount(&server)
        .await;

    let session = Session::new(MemoryTokenStore::with_token(valid_token()));
    let mut events = session.subscribe();
    let client = client_for(&server, session.clone());

    let err = client.fetch_plots(&PlotQuery::default()).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Unauthorized - please login");
    assert!(session.token().is_none());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoginRequired);
}

#[tokio::test]
async fn plot_listing_with_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plots"))
        .and(query_param("page", "2"))
        .and(query_param("status", "growing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "plots": [
                    {"id": 4, "name": "East Field", "acreage": 2.5, "status": "growing"}
                ],
                "pagination": {"page": 2, "limit": 1, "total": 3, "totalPages": 3}
            }
        })))
        .mount(&server)
        .await;

    let query = PlotQuery {
        page: Some(2),
        status: Some(PlotStatus::Growing),
        ..Default::default()
    };
    let page = client_for(&server, Session::in_memory())
        .fetch_plots(&query)
        .await
        .unwrap();

    assert_eq!(page.plots[0].name, "East Field");
    assert_eq!(page.pagination.total_pages, 3);
    assert!(page.pagination.has_more());
}

#[tokio::test]
async fn legacy_raw_array_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plots/status/harvested"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "North Field A", "acres": 5.2, "status": "harvested"},
            {"id": 2, "name": "South Field B", "acres": 3.8, "status": "harvested"}
        ])))
        .mount(&server)
        .await;

    let page = client_for(&server, Session::in_memory())
        .fetch_plots_by_status(&PlotStatus::Harvested, None)
        .await
        .unwrap();

    assert_eq!(page.plots.len(), 2);
    assert_eq!(page.plots[1].acreage, 3.8);
    assert!(!page.pagination.has_more());
}

#[tokio::test]
async fn add_plot_round_trip_preserves_fields() {
    let server = MockServer::start().await;

    let new_plot = NewPlot {
        name: "River Bend".into(),
        acreage: 4.75,
        location: None,
        caretaker_id: Some(3),
        current_crop_id: Some(1),
        status: PlotStatus::Planting,
        planted_date: Some("2024-03-01".into()),
        expected_harvest_date: None,
        notes: None,
    };

    Mock::given(method("POST"))
        .and(path("/plots"))
        .and(body_json(json!({
            "name": "River Bend",
            "acreage": 4.75,
            "caretaker_id": 3,
            "current_crop_id": 1,
            "status": "planting",
            "planted_date": "2024-03-01"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "id": 11,
                "name": "River Bend",
                "acreage": "4.75",
                "caretaker_id": 3,
                "status": "planting",
                "planted_date": "2024-03-01"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server, Session::in_memory())
        .create_plot(&new_plot)
        .await
        .unwrap();

    assert_eq!(created.name, new_plot.name);
    assert_eq!(created.acreage, new_plot.acreage);
    assert_eq!(created.caretaker_id, new_plot.caretaker_id);
}

#[tokio::test]
async fn rejected_envelope_surfaces_message() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/plots/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Plot has active crops"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server, Session::in_memory())
        .delete_plot(9)
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Plot has active crops");
}

#[tokio::test]
async fn server_error_message_extracted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "Weather feed down"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, Session::in_memory())
        .fetch_weather()
        .await
        .unwrap_err();

    assert!(matches!(err, FarmError::Server { status: 503, .. }));
    assert_eq!(err.user_message(), "Weather feed down");
}

#[tokio::test]
async fn login_stores_token() {
    let server = MockServer::start().await;
    let token = valid_token();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "farmer@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"token": token, "user": {"id": 1, "name": "Farmer", "email": "farmer@example.com"}}
        })))
        .mount(&server)
        .await;

    let session = Session::in_memory();
    let client = client_for(&server, session.clone());

    let payload = client
        .login(&LoginRequest {
            email: "farmer@example.com".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();

    assert_eq!(payload.user.unwrap().name, "Farmer");
    assert_eq!(session.token().as_deref(), Some(token.as_str()));
    assert!(session.is_authenticated());

    client.logout().unwrap();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn reminders_query_and_mark_done() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reminders/upcoming"))
        .and(query_param("days", "7"))
        .and(query_param("type", "watering"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 5, "plot_id": 2, "type": "watering", "due_date": "2024-05-01", "sent": false}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/reminders/5/done"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": null})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Session::in_memory());
    let upcoming = client
        .fetch_upcoming_reminders(7, Some(&ReminderType::Watering))
        .await
        .unwrap();

    assert_eq!(upcoming[0].reminder_type, ReminderType::Watering);
    client.mark_reminder_done(upcoming[0].id).await.unwrap();
}

#[tokio::test]
async fn report_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/financial"))
        .and(query_param("timeframe", "quarter"))
        .and(query_param("plot_id", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"total_expenses": 1200}
        })))
        .mount(&server)
        .await;

    let report = client_for(&server, Session::in_memory())
        .fetch_financial_overview(&ReportQuery {
            timeframe: Timeframe::Quarter,
            plot_id: Some(4),
        })
        .await
        .unwrap();

    assert_eq!(report["total_expenses"], 1200);
}

#[tokio::test]
async fn file_session_survives_new_client() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let token_path = dir.path().join("session.json");
    let token = valid_token();

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": 1, "name": "Farmer", "email": "farmer@example.com"}
        })))
        .mount(&server)
        .await;

    Session::new(FileTokenStore::new(&token_path))
        .sign_in(&token)
        .unwrap();

    let client = client_for(&server, Session::new(FileTokenStore::new(&token_path)));
    let me = client.me().await.unwrap();
    assert_eq!(me.email, "farmer@example.com");
}
