//! Router tests over the in-memory store

use std::sync::Arc;

use admin_server::AppState;
use admin_server::api::create_router;
use admin_server::db::Database;
use admin_server::db::memory::MemoryStore;
use axum::Router;
use axum::body::Body;
use chrono_tz::Tz;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shared::models::{MenuItem, Staff, StaffRole};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: AppState,
    store: Arc<MemoryStore>,
    owner: Staff,
    rival_owner: Staff,
    pizza: MenuItem,
}

fn setup() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let restaurant = store.add_restaurant("Luigi's");
    let pizza = store.add_menu_item(restaurant.id, "Pizza", Decimal::new(1200, 2));
    let owner = store.add_staff(restaurant.id, "owner@luigis.test", StaffRole::Owner);

    let rival = store.add_restaurant("Rival");
    let rival_owner = store.add_staff(rival.id, "owner@rival.test", StaffRole::Owner);

    let state = AppState::with_database(Database::memory(store.clone()), "test-secret", Tz::UTC);
    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        owner,
        rival_owner,
        pizza,
    }
}

impl TestApp {
    fn token(&self, staff: &Staff) -> String {
        self.state
            .jwt
            .create_token(staff.user_id.unwrap(), Some(&staff.email))
            .unwrap()
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
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create_order(&self, token: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/orders",
                Some(token),
                Some(json!({
                    "items": [{ "menuItemId": self.pizza.id, "quantity": 2 }],
                    "phone": "5551234567",
                    "customerName": "Ana"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }
}

#[tokio::test]
async fn health_is_public() {
    let app = setup();
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn api_requires_bearer_token() {
    let app = setup();
    let (status, body) = app.call(Method::GET, "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 1001);

    let (status, _) = app
        .call(Method::GET, "/api/orders", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn caller_without_restaurant_gets_404() {
    let app = setup();
    let stranger = app
        .state
        .jwt
        .create_token(uuid::Uuid::new_v4(), None)
        .unwrap();
    let (status, body) = app
        .call(Method::GET, "/api/orders", Some(&stranger), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No restaurant found");
}

#[tokio::test]
async fn order_lifecycle() {
    let app = setup();
    let token = app.token(&app.owner);

    let order = app.create_order(&token).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount"], 24.0);
    assert_eq!(order["order_items"][0]["menu_item_name"], "Pizza");
    let uri = format!("/api/orders/{}", order["id"].as_str().unwrap());

    let (status, body) = app
        .call(Method::PATCH, &uri, Some(&token), Some(json!({ "status": "confirmed" })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "confirmed");

    let (status, body) = app
        .call(Method::PATCH, &uri, Some(&token), Some(json!({ "status": "completed" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4010);

    let (status, body) = app
        .call(Method::DELETE, &uri, Some(&token), Some(json!({ "reason": "Out of dough" })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "cancelled");
    assert_eq!(body["data"]["notes"], "Cancellation reason: Out of dough");

    let (status, body) = app
        .call(Method::DELETE, &uri, Some(&token), Some(json!({ "reason": "Again" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4011);

    let (status, body) = app.call(Method::GET, "/api/orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["limit"], 50);
}

#[tokio::test]
async fn cross_tenant_access_is_forbidden_before_body_validation() {
    let app = setup();
    let order = app.create_order(&app.token(&app.owner)).await;
    let uri = format!("/api/orders/{}", order["id"].as_str().unwrap());
    let rival = app.token(&app.rival_owner);

    let (status, _) = app.call(Method::GET, &uri, Some(&rival), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Body is invalid on purpose: tenancy is checked first
    let (status, body) = app
        .call(Method::PATCH, &uri, Some(&rival), Some(json!({ "status": 42 })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 3003);

    let (status, _) = app
        .call(Method::DELETE, &uri, Some(&rival), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_order_validation_errors() {
    let app = setup();
    let token = app.token(&app.owner);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/orders",
            Some(&token),
            Some(json!({ "items": [], "phone": "5551234567" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "At least one item required");

    let (status, body) = app
        .call(
            Method::POST,
            "/api/orders",
            Some(&token),
            Some(json!({
                "items": [{ "menuItemId": uuid::Uuid::new_v4(), "quantity": 1 }],
                "phone": "5551234567"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/orders",
            Some(&token),
            Some(json!({
                "items": [{ "menuItemId": app.pizza.id, "quantity": 0 }],
                "phone": "5551234567"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Quantity must be between 1 and 99");

    let (status, body) = app
        .call(Method::POST, "/api/orders", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn reports_and_stats() {
    let app = setup();
    let token = app.token(&app.owner);
    let order = app.create_order(&token).await;
    let uri = format!("/api/orders/{}", order["id"].as_str().unwrap());
    for status in ["confirmed", "preparing", "ready", "completed"] {
        let (code, body) = app
            .call(Method::PATCH, &uri, Some(&token), Some(json!({ "status": status })))
            .await;
        assert_eq!(code, StatusCode::OK, "{body}");
    }

    let (status, body) = app
        .call(Method::GET, "/api/orders/stats?period=today", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalOrders"], 1);
    assert_eq!(body["data"]["totalRevenue"], 24.0);
    assert_eq!(body["data"]["ordersByStatus"]["completed"], 1);

    let (status, body) = app
        .call(Method::GET, "/api/reports/sales", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["period"], "7d");
    assert_eq!(body["data"]["summary"]["totalOrders"], 1);

    let (status, body) = app
        .call(Method::GET, "/api/reports/menu", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["period"], "30d");
    assert_eq!(body["data"]["popularItems"][0]["name"], "Pizza");
    assert_eq!(body["data"]["popularItems"][0]["avgPrice"], 12.0);

    let (status, body) = app
        .call(Method::GET, "/api/reports/sales?period=5y", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["period"], "5y");
    assert_eq!(body["data"]["summary"]["totalOrders"], 0);

    let (status, body) = app
        .call(Method::GET, "/api/orders/stats?period=decade", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["period"], "decade");
    assert_eq!(body["data"]["totalOrders"], 0);

    let (status, body) = app.call(Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["todaysOrders"], 1);
    assert_eq!(body["data"]["activeOrders"], 0);
    assert_eq!(body["data"]["menuItems"], 1);
}

#[tokio::test]
async fn kitchen_staff_cannot_view_reports_or_manage_staff() {
    let app = setup();
    let cook = app
        .store
        .add_staff(app.owner.restaurant_id, "cook@luigis.test", StaffRole::Kitchen);
    let token = app.token(&cook);

    let (status, _) = app
        .call(Method::GET, "/api/reports/sales", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/staff/{}/role", app.owner.id);
    let (status, body) = app
        .call(Method::PATCH, &uri, Some(&token), Some(json!({ "role": "kitchen" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);
}

#[tokio::test]
async fn staff_management() {
    let app = setup();
    let token = app.token(&app.owner);
    let clerk = app
        .store
        .add_staff(app.owner.restaurant_id, "clerk@luigis.test", StaffRole::Staff);

    let (status, body) = app.call(Method::GET, "/api/staff", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let uri = format!("/api/staff/{}/permissions", clerk.id);
    let (status, body) = app
        .call(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "permissions": { "can_view_reports": true } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["can_view_reports"], true);

    let (status, body) = app
        .call(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "permissions": { "can_delete_everything": true } })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid permission key: can_delete_everything");

    let uri = format!("/api/staff/{}/profile", clerk.id);
    let (status, body) = app
        .call(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "profile": { "email": "owner@luigis.test" } })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already in use");

    let uri = format!("/api/staff/{}/toggle-active", app.owner.id);
    let (status, _) = app.call(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/staff/{}/role", app.rival_owner.id);
    let (status, _) = app
        .call(Method::PATCH, &uri, Some(&token), Some(json!({ "role": "staff" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.call(Method::GET, "/api/staff/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalStaff"], 2);
    assert_eq!(body["data"]["admins"], 1);
}

#[tokio::test]
async fn manager_cannot_lock_out_owner() {
    let app = setup();
    let manager = app
        .store
        .add_staff(app.owner.restaurant_id, "manager@luigis.test", StaffRole::Manager);
    let token = app.token(&manager);

    let uri = format!("/api/staff/{}/toggle-active", app.owner.id);
    let (status, body) = app.call(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2004);

    let uri = format!("/api/staff/{}/profile", app.owner.id);
    let (status, body) = app
        .call(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "profile": { "email": "manager-owned@luigis.test" } })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2004);

    let (status, _) = app
        .call(Method::GET, "/api/orders", Some(&app.token(&app.owner)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deactivated_staff_is_rejected() {
    let app = setup();
    let clerk = app
        .store
        .add_staff(app.owner.restaurant_id, "clerk@luigis.test", StaffRole::Staff);
    let clerk_token = app.token(&clerk);

    let uri = format!("/api/staff/{}/toggle-active", clerk.id);
    let (status, body) = app
        .call(Method::POST, &uri, Some(&app.token(&app.owner)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    let (status, body) = app
        .call(Method::GET, "/api/orders", Some(&clerk_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 1007);
}

#[tokio::test]
async fn restaurant_and_locations() {
    let app = setup();
    let token = app.token(&app.owner);

    let (status, body) = app.call(Method::GET, "/api/restaurant", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Luigi's");

    let (status, body) = app.call(Method::GET, "/api/locations", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}
