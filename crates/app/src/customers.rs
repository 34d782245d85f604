use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use esales_core::{validation, Customer};

use crate::problem::ApiError;
use crate::router::AppState;
use crate::telemetry::observe;

const RESOURCE: &str = "customers";

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    observe(RESOURCE, "list", async move {
        let mut uow = state.storage().begin().await?;
        let customers = uow.customers().list().await?;
        Ok(Json(customers))
    })
    .await
}

pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Customer>, ApiError> {
    observe(RESOURCE, "get", async move {
        let Path(id) = path?;
        let mut uow = state.storage().begin().await?;
        let customer = uow.customers().find(id).await?.ok_or(ApiError::NotFound)?;
        Ok(Json(customer))
    })
    .await
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> Result<Response, ApiError> {
    observe(RESOURCE, "create", async move {
        let Json(customer) = payload?;
        validation::validate_new_customer(&customer)?;

        let mut uow = state.storage().begin().await?;
        let created = uow.customers().add(&customer).await?;
        uow.commit().await?;

        info!(stage = "api", customer_id = created.customer_id, "customer created");
        let location = format!("/api/Customers/{}", created.customer_id);
        Ok((
            StatusCode::CREATED,
            [(header::LOCATION, location)],
            Json(created),
        )
            .into_response())
    })
    .await
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    observe(RESOURCE, "update", async move {
        let Path(id) = path?;
        let Json(customer) = payload?;
        validation::validate_customer_update(id, &customer)?;

        let mut uow = state.storage().begin().await?;
        if !uow.customers().save(&customer).await? {
            return Err(ApiError::NotFound);
        }
        uow.commit().await?;

        info!(stage = "api", customer_id = id, "customer updated");
        Ok(StatusCode::NO_CONTENT)
    })
    .await
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Customer>, ApiError> {
    observe(RESOURCE, "delete", async move {
        let Path(id) = path?;
        let mut uow = state.storage().begin().await?;
        let customer = uow.customers().find(id).await?.ok_or(ApiError::NotFound)?;
        uow.customers().remove(id).await?;
        uow.commit().await?;

        info!(stage = "api", customer_id = id, "customer deleted");
        Ok(Json(customer))
    })
    .await
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::router::test_support::TestApp;

    fn customer_body(name: &str, phone: &str) -> serde_json::Value {
        json!({
            "Name": name,
            "Email": "buyer@example.com",
            "Phone": phone,
            "RegistrationDate": "2024-02-01"
        })
    }

    #[tokio::test]
    async fn create_returns_created_customer_with_location() {
        let app = TestApp::new().await;

        let response = app
            .send(
                Method::POST,
                "/api/Customers",
                Some(customer_body("Ada", "555-010-2030")),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED);
        let body = response.json();
        let id = body["CustomerId"].as_i64().expect("id");
        assert!(id > 0);
        assert_eq!(body["Name"], "Ada");
        assert_eq!(body["RegistrationDate"], "2024-02-01");
        assert_eq!(
            response.location.as_deref(),
            Some(format!("/api/Customers/{id}").as_str())
        );

        let fetched = app
            .send(Method::GET, &format!("/api/Customers/{id}"), None)
            .await;
        assert_eq!(fetched.status, StatusCode::OK);
        assert_eq!(fetched.json()["Phone"], "555-010-2030");
    }

    #[tokio::test]
    async fn create_rejects_invalid_phone() {
        let app = TestApp::new().await;

        for phone in ["5550102030", "555-010-203", "555.010.2030", "(555) 010-2030"] {
            let response = app
                .send(Method::POST, "/api/Customers", Some(customer_body("Ada", phone)))
                .await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST, "{phone}");
            assert!(response.json()["detail"]
                .as_str()
                .expect("detail")
                .starts_with("Phone number format is invalid."));
        }

        let listed = app.send(Method::GET, "/api/Customers", None).await;
        assert_eq!(listed.json(), json!([]));
    }

    #[tokio::test]
    async fn create_rejects_names_longer_than_99_characters() {
        let app = TestApp::new().await;

        let response = app
            .send(
                Method::POST,
                "/api/Customers",
                Some(customer_body(&"n".repeat(100), "555-010-2030")),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json()["detail"], "Name cannot exceed 99 characters.");

        let accepted = app
            .send(
                Method::POST,
                "/api/Customers",
                Some(customer_body(&"n".repeat(99), "555-010-2030")),
            )
            .await;
        assert_eq!(accepted.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn create_rejects_malformed_json() {
        let app = TestApp::new().await;
        let response = app
            .send(Method::POST, "/api/Customers", Some(json!({ "Name": "Ada" })))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_unknown_customer_returns_not_found() {
        let app = TestApp::new().await;
        let response = app.send(Method::GET, "/api/Customers/404", None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_stored_fields() {
        let app = TestApp::new().await;
        let existing = app.seed_customer("Ada").await;
        let id = existing.customer_id;

        let response = app
            .send(
                Method::PUT,
                &format!("/api/Customers/{id}"),
                Some(json!({
                    "CustomerId": id,
                    "Name": "Ada King",
                    "Email": "countess@example.com",
                    "Phone": "555-777-8888",
                    "RegistrationDate": "2023-11-05"
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);

        let fetched = app
            .send(Method::GET, &format!("/api/Customers/{id}"), None)
            .await
            .json();
        assert_eq!(fetched["Name"], "Ada King");
        assert_eq!(fetched["Email"], "countess@example.com");
        assert_eq!(fetched["Phone"], "555-777-8888");
        assert_eq!(fetched["RegistrationDate"], "2023-11-05");
    }

    #[tokio::test]
    async fn update_rejects_short_phone() {
        let app = TestApp::new().await;
        let existing = app.seed_customer("Ada").await;
        let id = existing.customer_id;

        let response = app
            .send(
                Method::PUT,
                &format!("/api/Customers/{id}"),
                Some(json!({
                    "CustomerId": id,
                    "Name": "Ada",
                    "Phone": "123-456-789"
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.json()["detail"]
            .as_str()
            .expect("detail")
            .contains("Phone number format is invalid."));
    }

    #[tokio::test]
    async fn update_rejects_id_mismatch_and_reports_missing() {
        let app = TestApp::new().await;

        let mismatch = app
            .send(
                Method::PUT,
                "/api/Customers/5",
                Some(json!({ "CustomerId": 6, "Name": "Ada", "Phone": "555-010-2030" })),
            )
            .await;
        assert_eq!(mismatch.status, StatusCode::BAD_REQUEST);

        let missing = app
            .send(
                Method::PUT,
                "/api/Customers/5",
                Some(json!({ "CustomerId": 5, "Name": "Ada", "Phone": "555-010-2030" })),
            )
            .await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_returns_removed_customer() {
        let app = TestApp::new().await;
        let existing = app.seed_customer("Ada").await;
        let uri = format!("/api/Customers/{}", existing.customer_id);

        let response = app.send(Method::DELETE, &uri, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json()["Name"], "Ada");

        let again = app.send(Method::DELETE, &uri, None).await;
        assert_eq!(again.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_refuses_customer_with_orders() {
        let app = TestApp::new().await;
        let product = app.seed_product("Widget").await;
        let customer = app.seed_customer("Ada").await;
        let created = app
            .send(
                Method::POST,
                "/api/Orders",
                Some(json!({
                    "ProductId": product.product_id,
                    "CustomerId": customer.customer_id,
                    "Quantity": 1,
                    "OrderDate": "2024-01-01"
                })),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED);

        let response = app
            .send(
                Method::DELETE,
                &format!("/api/Customers/{}", customer.customer_id),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CONFLICT);

        let still_there = app
            .send(
                Method::GET,
                &format!("/api/Customers/{}", customer.customer_id),
                None,
            )
            .await;
        assert_eq!(still_there.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn update_rejects_names_longer_than_99_characters() {
        let app = TestApp::new().await;
        let existing = app.seed_customer("Ada").await;
        let id = existing.customer_id;

        let response = app
            .send(
                Method::PUT,
                &format!("/api/Customers/{id}"),
                Some(json!({
                    "CustomerId": id,
                    "Name": "n".repeat(100),
                    "Phone": "555-010-2030"
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.json()["detail"], "Name cannot exceed 99 characters.");

        let fetched = app
            .send(Method::GET, &format!("/api/Customers/{id}"), None)
            .await
            .json();
        assert_eq!(fetched["Name"], "Ada");
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_validation_problem() {
        let app = TestApp::new().await;
        let response = app.send(Method::GET, "/api/Customers/abc", None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.content_type.as_deref(),
            Some("application/problem+json")
        );
        assert_eq!(response.json()["type"], "validation_error");
    }
}
