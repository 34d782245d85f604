use axum::{extract::State, Json};

use esales_core::Product;

use crate::problem::ApiError;
use crate::router::AppState;
use crate::telemetry::observe;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    observe("products", "list", async move {
        let mut uow = state.storage().begin().await?;
        let products = uow.products().list().await?;
        Ok(Json(products))
    })
    .await
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::router::test_support::TestApp;

    #[tokio::test]
    async fn lists_all_products() {
        let app = TestApp::new().await;
        let empty = app.send(Method::GET, "/api/Products", None).await;
        assert_eq!(empty.status, StatusCode::OK);
        assert_eq!(empty.json(), json!([]));

        let widget = app.seed_product("Widget").await;
        let gadget = app.seed_product("Gadget").await;

        let response = app.send(Method::GET, "/api/Products", None).await;
        assert_eq!(
            response.json(),
            json!([
                { "ProductId": widget.product_id, "Name": "Widget" },
                { "ProductId": gadget.product_id, "Name": "Gadget" }
            ])
        );
    }

    #[tokio::test]
    async fn products_are_read_only() {
        let app = TestApp::new().await;
        let response = app
            .send(
                Method::POST,
                "/api/Products",
                Some(json!({ "ProductId": 0, "Name": "Sneaky" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
