use esales_core::{Customer, Order, OrderDto, OrderWithCustomer, Product};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Client for the sales API rooted at `{base_url}api/`.
#[derive(Clone)]
pub struct SalesApiClient {
    http: Client,
    base_url: Url,
}

impl SalesApiClient {
    /// Creates a client. `base_url` should end with a slash so relative
    /// paths join beneath it.
    pub fn new(base_url: Url, http: Client) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.request(Method::GET, "api/Products")?.send().await?;
        parse_json(response).await
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, ClientError> {
        let response = self.request(Method::GET, "api/Customers")?.send().await?;
        parse_json(response).await
    }

    pub async fn list_orders_with_customer(&self) -> Result<Vec<OrderWithCustomer>, ClientError> {
        let response = self
            .request(Method::GET, "api/Orders/WithCustomer")?
            .send()
            .await?;
        parse_json(response).await
    }

    /// Posts a new order. Any 2xx status counts as accepted; the echoed row
    /// and `Location` are passed along when the server supplies them.
    pub async fn create_order(&self, order: &Order) -> Result<CreatedOrder, ClientError> {
        let response = self
            .request(Method::POST, "api/Orders")?
            .json(order)
            .send()
            .await?;
        let response = check_status(response).await?;
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let order = response.json().await.ok();
        Ok(CreatedOrder { order, location })
    }

    /// Deletes an order. Returns the removed row when the body decodes.
    pub async fn delete_order(&self, id: i64) -> Result<Option<Order>, ClientError> {
        let response = self
            .request(Method::DELETE, &format!("api/Orders/{id}"))?
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await.ok())
    }

    pub async fn list_order_dtos(&self) -> Result<Vec<OrderDto>, ClientError> {
        let response = self.request(Method::GET, "api/OrdersDto")?.send().await?;
        parse_json(response).await
    }

    pub async fn update_order_dto(&self, dto: &OrderDto) -> Result<(), ClientError> {
        let path = format!("api/OrdersDto/{}", dto.order_id);
        let response = self.request(Method::PUT, &path)?.json(dto).send().await?;
        check_status(response).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        debug!(stage = "client", %method, %url, "sending request");
        Ok(self.http.request(method, url))
    }
}

/// Result of a successful order creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedOrder {
    pub order: Option<Order>,
    pub location: Option<String>,
}

/// Errors produced by the sales API client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build url: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ClientError {
    /// Raw response text for a rejected request.
    pub fn server_response(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<unavailable>"));
        return Err(ClientError::Status { status, body });
    }
    Ok(response)
}

async fn parse_json<T>(response: Response) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let response = check_status(response).await?;
    Ok(response.json().await?)
}
