//! Flujo completo contra PostgreSQL real.
//! Se omite cuando `DATABASE_URL` no está definida.

use axum::body::{to_bytes, Body};
use http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use fleetmadox_api::config::database::DatabaseConfig;
use fleetmadox_api::config::environment::EnvironmentConfig;
use fleetmadox_api::database::DatabaseConnection;
use fleetmadox_api::models::user::Role;
use fleetmadox_api::repositories::user_repository::{NewUser, UserRepository};
use fleetmadox_api::utils::password::hash_password;
use fleetmadox_api::{create_app, AppState};

async fn setup() -> Option<(Router, UserRepository)> {
    setup_with_pool().await.map(|(app, users, _)| (app, users))
}

async fn setup_with_pool() -> Option<(Router, UserRepository, PgPool)> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL no definida, se omite la prueba");
        return None;
    }
    let config = DatabaseConfig::from_env().unwrap();
    let connection = DatabaseConnection::new(&config).await.unwrap();
    connection.run_migrations().await.unwrap();

    let pool = connection.pool().clone();
    let app = create_app(AppState::new(
        pool.clone(),
        EnvironmentConfig::for_tests("db_flow_secret"),
    ));
    Some((app, UserRepository::new(pool.clone()), pool))
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
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
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn create_user(users: &UserRepository, role: Role, email: &str) -> i32 {
    users
        .create(NewUser {
            name: format!("Flow {}", role),
            address: None,
            mobile: None,
            role,
            nic: None,
            employee_number: None,
            email: email.to_string(),
            password_hash: hash_password("Secret@123").unwrap(),
            is_active: true,
        })
        .await
        .unwrap()
        .id
}

async fn admin_token(app: &Router, users: &UserRepository, suffix: i64) -> String {
    let email = format!("admin.{}@fleetmadox.test", suffix);
    users
        .create(NewUser {
            name: "Flow Admin".to_string(),
            address: None,
            mobile: None,
            role: Role::Admin,
            nic: None,
            employee_number: None,
            email: email.clone(),
            password_hash: hash_password("Admin@123").unwrap(),
            is_active: true,
        })
        .await
        .unwrap();

    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "Admin@123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_spare_part_install_and_replace_flow() {
    let Some((app, users)) = setup().await else {
        return;
    };
    let suffix = Utc::now().timestamp_micros();
    let token = admin_token(&app, &users, suffix).await;

    let (status, bus) = call(
        &app,
        Method::POST,
        "/api/bus",
        Some(&token),
        Some(json!({ "no_plate": format!("FLOW-{}", suffix), "brand": "Tata" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bus_id = bus["id"].as_i64().unwrap();

    let (status, part) = call(
        &app,
        Method::POST,
        "/api/spare-part",
        Some(&token),
        Some(json!({ "part_name": format!("Brake pad {}", suffix) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let part_id = part["data"]["id"].as_i64().unwrap();

    let install = |boundary: f64| {
        json!({
            "spare_part_id": part_id,
            "bus_id": bus_id,
            "install_odometer": 1000.0,
            "distance_limit": 5000.0,
            "boundary_limit": boundary,
            "brand": "Bosch"
        })
    };

    let (status, body) = call(&app, Method::POST, "/api/spare-part/vehicle", Some(&token), Some(install(5000.0))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Boundary limit must be less than distance limit");

    let (status, installed) = call(&app, Method::POST, "/api/spare-part/vehicle", Some(&token), Some(install(500.0))).await;
    assert_eq!(status, StatusCode::CREATED);
    let installation_id = installed["data"]["id"].as_i64().unwrap();

    let (status, wear) = call(
        &app,
        Method::GET,
        &format!("/api/spare-part/vehicle/bus/{}/status", bus_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wear["data"].as_array().unwrap().len(), 1);
    assert_eq!(wear["data"][0]["status"], "OK");

    let replace_uri = format!("/api/spare-part/vehicle/{}/replace", installation_id);
    let (status, replaced) = call(&app, Method::POST, &replace_uri, Some(&token), Some(install(400.0))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(replaced["data"]["oldPart"]["is_active"], false);

    let (status, body) = call(&app, Method::POST, &replace_uri, Some(&token), Some(install(400.0))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "This spare part has already been replaced");

    let (status, logs) = call(
        &app,
        Method::GET,
        &format!("/api/spare-part/maintenance-logs?bus_id={}", bus_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_fuel_efficiency_reports_for_new_bus() {
    let Some((app, users)) = setup().await else {
        return;
    };
    let suffix = Utc::now().timestamp_micros();
    let token = admin_token(&app, &users, suffix).await;

    let (status, bus) = call(
        &app,
        Method::POST,
        "/api/bus",
        Some(&token),
        Some(json!({ "no_plate": format!("EFF-{}", suffix) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bus_id = bus["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/api/fuel-efficiency/buses/{}?range=all", bus_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], "all");
    assert_eq!(body["data"]["avgKmPerLiter"], 0.0);
    assert_eq!(body["data"]["status"], "no_data");

    let (status, body) = call(&app, Method::GET, "/api/fuel-efficiency/buses/0", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Bus not found");

    let (status, body) = call(&app, Method::GET, "/api/fuel-efficiency/alerts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], "week");
}

#[tokio::test]
async fn test_bus_round_trip_and_delete() {
    let Some((app, users)) = setup().await else {
        return;
    };
    let suffix = Utc::now().timestamp_micros();
    let token = admin_token(&app, &users, suffix).await;
    let plate = format!("RT-{}", suffix);

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/bus",
        Some(&token),
        Some(json!({
            "no_plate": plate,
            "brand": "Ashok Leyland",
            "model": "Viking",
            "number_of_seats": 54,
            "fuel_type": "diesel",
            "year_of_manufacture": 2019
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bus_uri = format!("/api/bus/{}", created["id"]);

    let (status, fetched) = call(&app, Method::GET, &bus_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["no_plate"], plate.as_str());
    assert_eq!(fetched["number_of_seats"], 54);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/bus",
        Some(&token),
        Some(json!({ "no_plate": plate })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (status, body) = call(&app, Method::DELETE, &bus_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bus deleted successfully");

    let (status, body) = call(&app, Method::GET, &bus_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Bus not found");

    let (status, _) = call(&app, Method::DELETE, &bus_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assignment_requires_bus_and_driver() {
    let Some((app, users)) = setup().await else {
        return;
    };
    let suffix = Utc::now().timestamp_micros();
    let token = admin_token(&app, &users, suffix).await;
    let accountant_id = create_user(&users, Role::Accountant, &format!("acc.{}@fleetmadox.test", suffix)).await;
    let driver_id = create_user(&users, Role::Driver, &format!("drv.{}@fleetmadox.test", suffix)).await;

    let (status, bus) = call(
        &app,
        Method::POST,
        "/api/bus",
        Some(&token),
        Some(json!({ "no_plate": format!("AS-{}", suffix) })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bus_id = bus["id"].as_i64().unwrap();

    let assignment = |vehicle_id: i64, employee_id: i32| {
        json!({
            "vehicleId": vehicle_id,
            "employeeId": employee_id,
            "startDate": "2026-01-01",
            "route": "Colombo - Kandy"
        })
    };

    let (status, body) = call(&app, Method::POST, "/api/assignments", Some(&token), Some(assignment(i32::MAX as i64, driver_id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Vehicle not found");

    let (status, body) = call(&app, Method::POST, "/api/assignments", Some(&token), Some(assignment(bus_id, i32::MAX))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, body) = call(&app, Method::POST, "/api/assignments", Some(&token), Some(assignment(bus_id, accountant_id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User is not a driver");

    let (status, created) = call(&app, Method::POST, "/api/assignments", Some(&token), Some(assignment(bus_id, driver_id))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["vehicle_id"], bus_id);
    assert_eq!(created["employee_id"], driver_id);

    let assignment_uri = format!("/api/assignments/{}", created["id"]);
    let (status, fetched) = call(&app, Method::GET, &assignment_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["route"], "Colombo - Kandy");

    let (status, _) = call(&app, Method::DELETE, &assignment_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::GET, &assignment_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Assignment not found");

    let (status, _) = call(&app, Method::DELETE, &assignment_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_inactive_bus_appears_in_efficiency_alerts() {
    let Some((app, users, pool)) = setup_with_pool().await else {
        return;
    };
    let suffix = Utc::now().timestamp_micros();
    let token = admin_token(&app, &users, suffix).await;
    let driver_id = create_user(&users, Role::Driver, &format!("drv.alert.{}@fleetmadox.test", suffix)).await;

    let (status, bus) = call(
        &app,
        Method::POST,
        "/api/bus",
        Some(&token),
        Some(json!({ "no_plate": format!("OFF-{}", suffix), "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let bus_id = bus["id"].as_i64().unwrap() as i32;

    let today = Utc::now().date_naive();
    let assignment_id: i32 = sqlx::query_scalar(
        "INSERT INTO vehicle_driver_assignment (vehicle_id, employee_id, start_date, route) \
         VALUES ($1, $2, NOW() - INTERVAL '1 day', 'Depot loop') RETURNING vehicle_driver_assignmentid",
    )
    .bind(bus_id)
    .bind(driver_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    // 100 km con 50 litros: 2.0 km/L
    for (reading_type, km) in [("morning", 20_000.0_f64), ("evening", 20_100.0)] {
        sqlx::query(
            "INSERT INTO odometer_reading (assignment_id, bus_id, driver_id, reading_type, reading_km, reading_date) \
             VALUES ($1, $2, $3, $4::odometer_reading_type, $5::numeric, $6)",
        )
        .bind(assignment_id)
        .bind(bus_id)
        .bind(driver_id)
        .bind(reading_type)
        .bind(km)
        .bind(today)
        .execute(&pool)
        .await
        .unwrap();
    }
    sqlx::query(
        "INSERT INTO fuel_entries (assignment_id, bus_id, driver_id, fuel_date, odometer_at_fueling, \
         liters_filled, price_per_liter, total_cost, fuel_station) \
         VALUES ($1, $2, $3, $4, 20100, 50, 3.4, 170, 'Depot pump')",
    )
    .bind(assignment_id)
    .bind(bus_id)
    .bind(driver_id)
    .bind(today)
    .execute(&pool)
    .await
    .unwrap();

    let (status, body) = call(&app, Method::GET, "/api/fuel-efficiency/alerts?range=week", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let alert = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["type"] == "bus" && a["entityId"] == bus_id)
        .cloned()
        .expect("inactive bus alert");
    assert_eq!(alert["efficiency"], 2.0);
    assert_eq!(alert["severity"], "critical");

    let (status, buses) = call(&app, Method::GET, "/api/fuel-efficiency/buses?range=week", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(buses["data"].as_array().unwrap().iter().all(|b| b["busId"] != bus_id));
}
