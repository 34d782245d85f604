use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use esales_storage::Database;

use crate::{customers, orders, products, telemetry};

#[derive(Clone)]
pub struct AppState {
    metrics: PrometheusHandle,
    storage: Database,
}

impl AppState {
    pub fn new(metrics: PrometheusHandle, storage: Database) -> Self {
        Self { metrics, storage }
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn storage(&self) -> &Database {
        &self.storage
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .nest("/api", api_router())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/Customers", get(customers::list).post(customers::create))
        .route(
            "/Customers/:id",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/Products", get(products::list))
        .route("/Orders", get(orders::list).post(orders::create))
        .route("/Orders/WithCustomer", get(orders::list_with_customer))
        .route(
            "/Orders/:id",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
        .route("/OrdersDto", get(orders::list))
        .route("/OrdersDto/:id", put(orders::update_by_dto))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = telemetry::render_metrics(state.metrics());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use chrono::NaiveDate;
    use esales_core::{Customer, Product};
    use esales_storage::Database;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::{app_router, AppState};
    use crate::telemetry;

    pub struct TestApp {
        pub state: AppState,
        _dir: TempDir,
    }

    pub struct TestResponse {
        pub status: StatusCode,
        pub location: Option<String>,
        pub content_type: Option<String>,
        pub body: String,
    }

    impl TestResponse {
        pub fn json(&self) -> Value {
            serde_json::from_str(&self.body).expect("response body should be json")
        }
    }

    impl TestApp {
        pub async fn new() -> Self {
            let metrics = telemetry::init_metrics().expect("metrics init");
            let dir = tempfile::tempdir().expect("tempdir");
            let url = format!("sqlite://{}", dir.path().join("api.db").display());
            let database = Database::connect(&url).await.expect("connect");
            database.run_migrations().await.expect("migrations");

            Self {
                state: AppState::new(metrics, database),
                _dir: dir,
            }
        }

        pub fn router(&self) -> Router {
            app_router(self.state.clone())
        }

        pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(json) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string())),
                None => builder.body(Body::empty()),
            }
            .expect("request");

            let response = self
                .router()
                .oneshot(request)
                .await
                .expect("handler should respond");
            let status = response.status();
            let header_text = |name: header::HeaderName| {
                response
                    .headers()
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            };
            let location = header_text(header::LOCATION);
            let content_type = header_text(header::CONTENT_TYPE);
            let bytes = response
                .into_body()
                .collect()
                .await
                .expect("body should read")
                .to_bytes();

            TestResponse {
                status,
                location,
                content_type,
                body: String::from_utf8(bytes.to_vec()).expect("utf-8"),
            }
        }

        pub async fn seed_product(&self, name: &str) -> Product {
            let mut uow = self.state.storage().begin().await.expect("begin");
            let product = uow.products().add(name, None).await.expect("add product");
            uow.commit().await.expect("commit");
            product
        }

        pub async fn seed_customer(&self, name: &str) -> Customer {
            let mut uow = self.state.storage().begin().await.expect("begin");
            let customer = uow
                .customers()
                .add(&Customer {
                    customer_id: 0,
                    name: name.to_string(),
                    email: format!("{}@example.com", name.to_lowercase()),
                    phone: "555-010-2030".to_string(),
                    registration_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                })
                .await
                .expect("add customer");
            uow.commit().await.expect("commit");
            customer
        }
    }
}
