//! Tests de comportamiento contra PostgreSQL.
//!
//! Necesitan `DATABASE_URL`; correr con `cargo test -- --ignored`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use taller_backend::config::EnvironmentConfig;
use taller_backend::utils::jwt::{generate_token, JwtConfig};
use taller_backend::{create_app, AppState};

const ADMIN_ROLE: &str = "00000000-0000-0000-0000-000000000001";
const MECHANIC_ROLE: &str = "00000000-0000-0000-0000-000000000003";
const SIGNATURE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

struct TestApp {
    app: axum::Router,
    pool: PgPool,
    token: String,
    branch_id: Uuid,
}

impl TestApp {
    async fn new(pool: PgPool) -> Self {
        Self::with_role(pool, ADMIN_ROLE).await
    }

    async fn with_role(pool: PgPool, role: &str) -> Self {
        let config = EnvironmentConfig::for_tests();
        let role_id = Uuid::parse_str(role).unwrap();
        let branch_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        sqlx::query("INSERT INTO branches (id, name) VALUES ($1, 'Sucursal Centro')")
            .bind(branch_id)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO users (id, branch_id, role_id, name, email, password_hash)
             VALUES ($1, $2, $3, 'Usuario Test', $4, 'hash')",
        )
        .bind(user_id)
        .bind(branch_id)
        .bind(role_id)
        .bind(format!("{}@taller.test", user_id))
        .execute(&pool)
        .await
        .unwrap();

        let token = generate_token(user_id, branch_id, role_id, &JwtConfig::from(&config))
            .unwrap()
            .token;
        let app = create_app(AppState::new(pool.clone(), config, None));

        Self { app, pool, token, branch_id }
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn create_client(&self) -> Uuid {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/clients",
                Some(json!({ "name": "Juan Pérez", "whatsapp": "3001234567" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        Uuid::parse_str(body["data"]["client"]["id"].as_str().unwrap()).unwrap()
    }

    async fn create_vehicle(&self, client_id: Uuid, plate: &str) -> Uuid {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/vehicles",
                Some(json!({ "clientId": client_id, "plate": plate, "brand": "Mazda", "model": "3" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        Uuid::parse_str(body["data"]["vehicle"]["id"].as_str().unwrap()).unwrap()
    }

    async fn create_service(&self, client_id: Uuid, vehicle_id: Uuid, extra: Value) -> Value {
        let mut payload = json!({
            "clientId": client_id,
            "vehicleId": vehicle_id,
            "problemDescription": "Ruido en la suspensión",
        });
        if let (Some(target), Some(fields)) = (payload.as_object_mut(), extra.as_object()) {
            target.extend(fields.clone());
        }

        let (status, body) = self.call(Method::POST, "/api/services", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["service"].clone()
    }

    async fn create_mechanic(&self, percentage: u32) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/mechanics",
                Some(json!({ "name": "Carlos Ruiz", "commissionPercentage": percentage })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["mechanic"]["id"].clone()
    }

    async fn create_appointment(&self, client_id: Uuid, vehicle_id: Uuid) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/appointments",
                Some(json!({
                    "clientId": client_id,
                    "vehicleId": vehicle_id,
                    "scheduledDate": "2030-05-10T14:00:00Z",
                    "serviceType": "Mantenimiento",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["appointment"]["id"].as_str().unwrap().to_string()
    }

    async fn set_status(&self, service_id: &str, status_id: i32) -> Value {
        let (status, body) = self
            .call(
                Method::PUT,
                &format!("/api/services/{}/status", service_id),
                Some(json!({ "statusId": status_id })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["service"].clone()
    }

    async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    async fn log_count(&self, service_id: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM service_status_logs WHERE service_id = $1")
            .bind(Uuid::parse_str(service_id).unwrap())
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_client_requires_phone_or_whatsapp(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, body) = app
        .call(Method::POST, "/api/clients", Some(json!({ "name": "Sin Contacto" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_whatsapp_only_client_gets_phone(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/clients",
            Some(json!({ "name": "Juan Pérez", "whatsapp": "3001234567" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["client"]["phone"], "3001234567");
    assert_eq!(body["data"]["client"]["branchId"], app.branch_id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_duplicate_plate_is_conflict(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    app.create_vehicle(client_id, "ABC123").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/vehicles",
            Some(json!({ "clientId": client_id, "plate": "abc-123", "brand": "Kia", "model": "Rio" })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("ABC123"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_status_change_writes_one_log_row(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "XYZ987").await;
    let service = app.create_service(client_id, vehicle_id, json!({})).await;
    let service_id = service["id"].as_str().unwrap().to_string();
    let before = app.log_count(&service_id).await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/services/{}/status", service_id),
            Some(json!({ "statusId": 3, "notes": "Inicia reparación" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(app.log_count(&service_id).await, before + 1);
    assert_eq!(body["data"]["log"]["oldStatusId"], 1);
    assert_eq!(body["data"]["log"]["newStatusId"], 3);
    assert!(body["data"]["service"]["startedAt"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_unknown_status_is_not_found(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "NOP456").await;
    let service = app.create_service(client_id, vehicle_id, json!({})).await;

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/services/{}/status", service["id"].as_str().unwrap()),
            Some(json!({ "statusId": 99 })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_submitted_commission_is_kept(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "COM111").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/mechanics",
            Some(json!({ "name": "Carlos Ruiz", "commissionPercentage": 10 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let mechanic_id = body["data"]["mechanic"]["id"].clone();

    let service = app
        .create_service(
            client_id,
            vehicle_id,
            json!({ "mechanicId": mechanic_id, "totalAmount": 500000, "mechanicCommission": 12345.67 }),
        )
        .await;
    assert_eq!(service["mechanicCommission"], json!(12345.67));

    let computed = app
        .create_service(
            client_id,
            vehicle_id,
            json!({ "mechanicId": mechanic_id, "totalAmount": 500000 }),
        )
        .await;
    assert_eq!(computed["mechanicCommission"], json!(50000.0));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_client_with_active_appointment_cannot_be_deleted(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "CIT222").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/appointments",
            Some(json!({
                "clientId": client_id,
                "vehicleId": vehicle_id,
                "scheduledDate": "2030-05-10T14:00:00Z",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, _) = app
        .call(Method::DELETE, &format!("/api/clients/{}", client_id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(Method::GET, &format!("/api/clients/{}", client_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], true);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_reception_creates_received_service(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/reception/receive-vehicle",
            Some(json!({
                "client": { "name": "Ana Gómez", "phone": "3109876543" },
                "vehicle": { "plate": "rec-333", "brand": "Renault", "model": "Logan" },
                "problemDescription": "Cambio de aceite",
                "kilometraje": 45200,
                "nivelCombustible": 40,
                "checklist": { "lucesOk": true, "frenosOk": true },
                "signature": SIGNATURE,
                "signedBy": "Ana Gómez",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let service = &body["data"]["service"];
    assert_eq!(service["statusId"], 1);
    assert_eq!(service["lucesOk"], true);
    assert_eq!(service["kilometraje"], 45200);
    assert_eq!(body["data"]["vehicle"]["plate"], "REC333");
    assert_eq!(body["data"]["vehicle"]["mileage"], 45200);
    assert_eq!(app.log_count(service["id"].as_str().unwrap()).await, 1);

    let (status, body) = app.call(Method::GET, "/api/reception/today", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_reception_rejects_plate_of_other_client(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let owner = app.create_client().await;
    app.create_vehicle(owner, "OWN444").await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/reception/receive-vehicle",
            Some(json!({
                "client": { "name": "Otra Persona", "phone": "3201112233" },
                "vehicle": { "plate": "OWN444", "brand": "Mazda", "model": "3" },
                "problemDescription": "Revisión",
                "signature": SIGNATURE,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let services: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM services")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(clients, 1);
    assert_eq!(services, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_role_without_permission_is_forbidden(pool: PgPool) {
    let app = TestApp::with_role(pool, MECHANIC_ROLE).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/clients",
            Some(json!({ "name": "Juan Pérez", "phone": "3001234567" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app.call(Method::GET, "/api/services", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_reception_links_appointment_only_once(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "APT555").await;
    let appointment_id = app.create_appointment(client_id, vehicle_id).await;

    let reception = json!({
        "clientId": client_id,
        "vehicleId": vehicle_id,
        "appointmentId": appointment_id,
        "problemDescription": "Mantenimiento de 50.000 km",
        "signature": SIGNATURE,
    });

    let (status, body) = app
        .call(Method::POST, "/api/reception/receive-vehicle", Some(reception.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let service_id = body["data"]["service"]["id"].clone();

    let (_, body) = app
        .call(Method::GET, &format!("/api/appointments/{}", appointment_id), None)
        .await;
    assert_eq!(body["data"]["status"], "COMPLETED");
    assert_eq!(body["data"]["serviceId"], service_id);

    let (status, _) = app
        .call(Method::POST, "/api/reception/receive-vehicle", Some(reception))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app
        .call(Method::GET, &format!("/api/appointments/{}", appointment_id), None)
        .await;
    assert_eq!(body["data"]["serviceId"], service_id);
    assert_eq!(app.count("services").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_reception_rejects_appointment_of_other_vehicle(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let scheduled_vehicle = app.create_vehicle(client_id, "VEH111").await;
    let other_vehicle = app.create_vehicle(client_id, "VEH222").await;
    let appointment_id = app.create_appointment(client_id, scheduled_vehicle).await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/reception/receive-vehicle",
            Some(json!({
                "clientId": client_id,
                "vehicleId": other_vehicle,
                "appointmentId": appointment_id,
                "problemDescription": "Revisión",
                "signature": SIGNATURE,
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count("services").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_reception_on_existing_open_service(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "EXS777").await;
    let service = app.create_service(client_id, vehicle_id, json!({})).await;
    let service_id = service["id"].as_str().unwrap().to_string();

    let reception = json!({
        "clientId": client_id,
        "vehicleId": vehicle_id,
        "serviceId": service_id,
        "problemDescription": "Ruido en la suspensión",
        "kilometraje": 81000,
        "checklist": { "frenosOk": true },
        "signature": SIGNATURE,
    });

    let (status, body) = app
        .call(Method::POST, "/api/reception/receive-vehicle", Some(reception.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["service"]["id"], service_id.as_str());
    assert!(body["data"]["service"]["receivedAt"].is_string());
    assert_eq!(body["data"]["service"]["frenosOk"], true);
    assert_eq!(app.count("services").await, 1);
    assert_eq!(app.log_count(&service_id).await, 1);

    app.set_status(&service_id, 4).await;
    let (status, _) = app
        .call(Method::POST, "/api/reception/receive-vehicle", Some(reception))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_service_update_recomputes_commission_unless_submitted(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "UPD888").await;
    let mechanic_id = app.create_mechanic(10).await;
    let service = app
        .create_service(
            client_id,
            vehicle_id,
            json!({ "mechanicId": mechanic_id, "totalAmount": 100000 }),
        )
        .await;
    assert_eq!(service["mechanicCommission"], json!(10000.0));
    let uri = format!("/api/services/{}", service["id"].as_str().unwrap());

    let (status, body) = app.call(Method::PUT, &uri, Some(json!({ "totalAmount": 200000 }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["service"]["mechanicCommission"], json!(20000.0));

    let (_, body) = app
        .call(Method::PUT, &uri, Some(json!({ "totalAmount": 300000, "mechanicCommission": 1234.5 })))
        .await;
    assert_eq!(body["data"]["service"]["mechanicCommission"], json!(1234.5));

    let (_, body) = app
        .call(Method::PUT, &uri, Some(json!({ "diagnosis": "Amortiguador trasero" })))
        .await;
    assert_eq!(body["data"]["service"]["mechanicCommission"], json!(1234.5));
    assert_eq!(body["data"]["service"]["diagnosis"], "Amortiguador trasero");

    let (_, body) = app.call(Method::PUT, &uri, Some(json!({ "diagnosis": "" }))).await;
    assert!(body["data"]["service"]["diagnosis"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_leaving_terminado_clears_completed_at(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "TER999").await;
    let service = app.create_service(client_id, vehicle_id, json!({})).await;
    let service_id = service["id"].as_str().unwrap().to_string();

    let started = app.set_status(&service_id, 3).await;
    let finished = app.set_status(&service_id, 4).await;
    assert!(finished["completedAt"].is_string());
    assert_eq!(finished["startedAt"], started["startedAt"]);

    let reopened = app.set_status(&service_id, 3).await;
    assert!(reopened["completedAt"].is_null());
    assert_eq!(reopened["startedAt"], started["startedAt"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_status_history_is_newest_first(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "HIS123").await;
    let service = app.create_service(client_id, vehicle_id, json!({})).await;
    let service_id = service["id"].as_str().unwrap().to_string();

    app.set_status(&service_id, 2).await;
    app.set_status(&service_id, 3).await;

    let (status, body) = app
        .call(Method::GET, &format!("/api/services/{}/status-history", service_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let entries = body["data"].as_array().unwrap();
    let transitions: Vec<(Value, Value)> = entries
        .iter()
        .map(|e| (e["oldStatusId"].clone(), e["newStatusId"].clone()))
        .collect();
    assert_eq!(
        transitions,
        vec![(json!(2), json!(3)), (json!(1), json!(2)), (Value::Null, json!(1))]
    );
    assert_eq!(entries[0]["newStatusName"], "EN PROCESO");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_closed_appointment_cannot_become_service(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "CLO321").await;

    let cancelled = app.create_appointment(client_id, vehicle_id).await;
    let (status, _) = app
        .call(Method::DELETE, &format!("/api/appointments/{}", cancelled), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .call(Method::POST, &format!("/api/appointments/{}/service", cancelled), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let converted = app.create_appointment(client_id, vehicle_id).await;
    let uri = format!("/api/appointments/{}/service", converted);
    let (status, body) = app.call(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["service"]["problemDescription"], "Mantenimiento");

    let (status, _) = app.call(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count("services").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_completed_appointment_keeps_its_status(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "KEE654").await;
    let appointment_id = app.create_appointment(client_id, vehicle_id).await;
    let uri = format!("/api/appointments/{}", appointment_id);

    let (status, _) = app.call(Method::POST, &format!("{}/service", uri), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.call(Method::PUT, &uri, Some(json!({ "status": "CANCELLED" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.call(Method::PUT, &uri, Some(json!({ "status": "SCHEDULED" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.call(Method::PUT, &uri, Some(json!({ "notes": "Cliente avisado" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["appointment"]["status"], "COMPLETED");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_mechanic_with_open_service_cannot_be_deactivated(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "MEC147").await;
    let mechanic_id = app.create_mechanic(10).await;
    app.create_service(client_id, vehicle_id, json!({ "mechanicId": mechanic_id }))
        .await;
    let uri = format!("/api/mechanics/{}", mechanic_id.as_str().unwrap());

    let (status, _) = app.call(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.call(Method::PUT, &uri, Some(json!({ "isActive": false }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.call(Method::GET, &uri, None).await;
    assert_eq!(body["data"]["isActive"], true);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_vehicle_with_opportunity_cannot_be_deleted(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let vehicle_id = app.create_vehicle(client_id, "OPO258").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/opportunities",
            Some(json!({
                "clientId": client_id,
                "vehicleId": vehicle_id,
                "type": "MAINTENANCE",
                "description": "Cambio de correa de distribución",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, body) = app
        .call(Method::DELETE, &format!("/api/vehicles/{}", vehicle_id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("1 oportunidad"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_client_update_rejects_bad_contact(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let client_id = app.create_client().await;
    let uri = format!("/api/clients/{}", client_id);

    let (status, body) = app
        .call(Method::PUT, &uri, Some(json!({ "phone": "abc", "email": "nope" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, body) = app.call(Method::GET, &uri, None).await;
    assert_eq!(body["data"]["phone"], "3001234567");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_malformed_path_uses_error_envelope(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, body) = app.call(Method::GET, "/api/clients/no-es-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
}
