use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use esales_core::{validation, Order, OrderDto, OrderWithCustomer, ValidationError};
use esales_storage::UnitOfWork;

use crate::problem::ApiError;
use crate::router::AppState;
use crate::telemetry::observe;

const RESOURCE: &str = "orders";

/// Orders flattened to product and customer names. Served at both
/// `/api/Orders` and `/api/OrdersDto`.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<OrderDto>>, ApiError> {
    observe(RESOURCE, "list", async move {
        let mut uow = state.storage().begin().await?;
        let orders = uow.orders().list_views().await?;
        Ok(Json(orders))
    })
    .await
}

pub async fn list_with_customer(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderWithCustomer>>, ApiError> {
    observe(RESOURCE, "list_with_customer", async move {
        let mut uow = state.storage().begin().await?;
        let orders = uow.orders().list_with_customer().await?;
        Ok(Json(orders))
    })
    .await
}

pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<OrderDto>, ApiError> {
    observe(RESOURCE, "get", async move {
        let Path(id) = path?;
        let mut uow = state.storage().begin().await?;
        let order = uow.orders().find_view(id).await?.ok_or(ApiError::NotFound)?;
        Ok(Json(order))
    })
    .await
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Order>, JsonRejection>,
) -> Result<Response, ApiError> {
    observe(RESOURCE, "create", async move {
        let Json(order) = payload?;

        let mut uow = state.storage().begin().await?;
        ensure_references(&mut uow, &order).await?;
        validation::validate_quantity(order.quantity)?;

        let created = uow.orders().add(&order).await?;
        uow.commit().await?;

        info!(
            stage = "api",
            order_id = created.order_id,
            product_id = created.product_id,
            customer_id = created.customer_id,
            "order created"
        );
        let location = format!("/api/Orders/{}", created.order_id);
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
    payload: Result<Json<Order>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    observe(RESOURCE, "update", async move {
        let Path(id) = path?;
        let Json(order) = payload?;
        validation::validate_order_update(id, &order)?;

        let mut uow = state.storage().begin().await?;
        if uow.orders().find(id).await?.is_none() {
            return Err(ApiError::NotFound);
        }
        ensure_references(&mut uow, &order).await?;

        uow.orders().save(&order).await?;
        uow.commit().await?;

        info!(stage = "api", order_id = id, "order updated");
        Ok(StatusCode::NO_CONTENT)
    })
    .await
}

/// Updates an order from its flattened view, resolving names back to ids.
pub async fn update_by_dto(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<OrderDto>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    observe(RESOURCE, "update_by_dto", async move {
        let Path(id) = path?;
        let Json(dto) = payload?;
        validation::validate_order_dto_update(id, &dto)?;

        let mut uow = state.storage().begin().await?;
        if uow.orders().find(id).await?.is_none() {
            return Err(ApiError::NotFound);
        }

        let product_ids = uow.products().ids_by_name(&dto.product).await?;
        let customer_ids = uow.customers().ids_by_name(&dto.customer).await?;
        let (Some(product_id), Some(customer_id)) =
            (single(&product_ids), single(&customer_ids))
        else {
            warn!(
                stage = "api",
                order_id = id,
                product_matches = product_ids.len(),
                customer_matches = customer_ids.len(),
                "order names did not resolve to exactly one row"
            );
            return Err(ValidationError::UnresolvedReference.into());
        };
        validation::validate_quantity(dto.quantity)?;

        let order = Order {
            order_id: id,
            product_id,
            customer_id,
            quantity: dto.quantity,
            order_date: dto.order_date,
        };
        uow.orders().save(&order).await?;
        uow.commit().await?;

        info!(stage = "api", order_id = id, "order updated from view");
        Ok(StatusCode::NO_CONTENT)
    })
    .await
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Order>, ApiError> {
    observe(RESOURCE, "delete", async move {
        let Path(id) = path?;
        validation::validate_order_id(id)?;

        let mut uow = state.storage().begin().await.map_err(delete_failed)?;
        let order = uow
            .orders()
            .find(id)
            .await
            .map_err(delete_failed)?
            .ok_or(ApiError::NotFound)?;
        uow.orders().remove(id).await.map_err(delete_failed)?;
        uow.commit().await.map_err(delete_failed)?;

        info!(stage = "api", order_id = id, "order deleted");
        Ok(Json(order))
    })
    .await
}

/// Rejects orders whose product or customer id does not exist, product first.
async fn ensure_references(uow: &mut UnitOfWork, order: &Order) -> Result<(), ApiError> {
    if !uow.products().exists(order.product_id).await? {
        return Err(ValidationError::UnknownProduct.into());
    }
    if !uow.customers().exists(order.customer_id).await? {
        return Err(ValidationError::UnknownCustomer.into());
    }
    Ok(())
}

fn delete_failed(err: impl std::fmt::Display) -> ApiError {
    ApiError::Internal(format!("An error occurred while deleting the order: {err}"))
}

fn single(ids: &[i64]) -> Option<i64> {
    match ids {
        [id] => Some(*id),
        _ => None,
    }
}
