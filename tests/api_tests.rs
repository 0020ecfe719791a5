use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use trip_management::config::EnvironmentConfig;
use trip_management::database::seed::{
    seed_default_drivers, DEFAULT_ADMIN_EMAIL, DEFAULT_DRIVER_EMAIL,
};
use trip_management::models::driver::DriverRole;
use trip_management::repositories::MemoryStore;
use trip_management::routes::create_router;
use trip_management::state::AppState;
use trip_management::utils::jwt::{generate_token, JwtConfig};

struct TestApp {
    router: Router,
    jwt: JwtConfig,
}

impl TestApp {
    async fn new() -> Self {
        let config = EnvironmentConfig {
            jwt_secret: "api-test-secret".to_string(),
            ..EnvironmentConfig::default()
        };
        let jwt = JwtConfig::from(&config);
        let state = AppState::in_memory(config, MemoryStore::new());
        seed_default_drivers(state.drivers.as_ref()).await.unwrap();

        Self {
            router: create_router(state),
            jwt,
        }
    }

    fn token(&self, email: &str, role: DriverRole) -> String {
        generate_token(email, role, &self.jwt).unwrap()
    }

    fn admin(&self) -> String {
        self.token(DEFAULT_ADMIN_EMAIL, DriverRole::Admin)
    }

    fn driver(&self) -> String {
        self.token(DEFAULT_DRIVER_EMAIL, DriverRole::Driver)
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
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
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create_place(&self, name: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/admin/places",
                Some(&self.admin()),
                Some(json!({
                    "name": name,
                    "address": format!("Calle {} 123", name),
                    "latitude": -34.6,
                    "longitude": -58.4
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/api/driver/trips", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_driver_cannot_use_admin_routes() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(Method::GET, "/api/admin/trips/dashboard", Some(&app.driver()), None)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_driver_trip_flow() {
    let app = TestApp::new().await;
    let a = app.create_place("A").await;
    let b = app.create_place("B").await;
    let token = app.driver();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/driver/trips",
            Some(&token),
            Some(json!({ "name": "Mi ruta", "place_ids": [a, b] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let trip = &body["data"];
    assert_eq!(trip["status"], "PLANNED");
    assert_eq!(trip["route_points"][0]["position"], 1);
    assert_eq!(trip["route_points"][0]["place_name"], "A");
    let trip_id = trip["id"].as_str().unwrap().to_string();
    let second_point = trip["route_points"][1]["id"].as_str().unwrap().to_string();
    let first_point = trip["route_points"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/driver/trips/{}/points/{}/visit", trip_id, second_point);
    let (status, body) = app.call(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "IN_PROGRESS");
    assert_eq!(body["data"]["route_points"][1]["status"], "VISITED");

    let uri = format!("/api/driver/trips/{}/points/{}/visit", trip_id, first_point);
    let (status, body) = app.call(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert!(body["data"]["completed_at"].is_string());

    let (status, body) = app
        .call(Method::GET, "/api/driver/trips", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .call(Method::GET, "/api/admin/trips/dashboard", Some(&app.admin()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_trips"], 1);
    assert_eq!(body["total_completed"], 1);
    assert_eq!(body["recent_completed_trips"][0]["visited_points"], 2);
}

#[tokio::test]
async fn test_single_place_is_validation_error() {
    let app = TestApp::new().await;
    let a = app.create_place("A").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/driver/trips",
            Some(&app.driver()),
            Some(json!({ "place_ids": [a] })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_other_driver_gets_forbidden() {
    let app = TestApp::new().await;
    let a = app.create_place("A").await;
    let b = app.create_place("B").await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/admin/drivers",
            Some(&app.admin()),
            Some(json!({ "email": "Otro@Example.com", "name": "Otro" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .call(
            Method::POST,
            "/api/driver/trips",
            Some(&app.driver()),
            Some(json!({ "place_ids": [a, b] })),
        )
        .await;
    let trip_id = body["data"]["id"].as_str().unwrap().to_string();

    let other = app.token("otro@example.com", DriverRole::Driver);
    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/driver/trips/{}", trip_id),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("el viaje pertenece a otro conductor"));
}

#[tokio::test]
async fn test_admin_creates_trip_for_inactive_driver() {
    let app = TestApp::new().await;
    let a = app.create_place("A").await;
    let b = app.create_place("B").await;
    let admin = app.admin();

    let (_, body) = app
        .call(
            Method::POST,
            "/api/admin/drivers",
            Some(&admin),
            Some(json!({ "email": "baja@example.com", "name": "Baja", "role": "DRIVER" })),
        )
        .await;
    let driver_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/drivers/{}", driver_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/admin/trips",
            Some(&admin),
            Some(json!({ "driver_id": driver_id, "place_ids": [a, b] })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "PRECONDITION_FAILED");
}

#[tokio::test]
async fn test_duplicate_driver_email_is_conflict() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(
            Method::POST,
            "/api/admin/drivers",
            Some(&app.admin()),
            Some(json!({ "email": DEFAULT_DRIVER_EMAIL, "name": "Copia" })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_invalid_place_payload() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(
            Method::POST,
            "/api/admin/places",
            Some(&app.admin()),
            Some(json!({ "name": "  ", "address": "Calle 1", "latitude": 120.0, "longitude": 0.0 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_deactivated_place_leaves_selection_list() {
    let app = TestApp::new().await;
    let a = app.create_place("A").await;
    app.create_place("B").await;

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/places/{}", a),
            Some(&app.admin()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, active) = app
        .call(Method::GET, "/api/places", Some(&app.driver()), None)
        .await;
    let names: Vec<&str> = active
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["B"]);

    let (_, all) = app
        .call(Method::GET, "/api/admin/places/all", Some(&app.admin()), None)
        .await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_trip_id_is_json_validation_error() {
    let app = TestApp::new().await;
    let (status, body) = app
        .call(Method::GET, "/api/admin/trips/not-a-uuid", Some(&app.admin()), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Validation Error");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_malformed_json_body_is_json_validation_error() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/driver/trips")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.driver()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"place_ids\": ["))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
