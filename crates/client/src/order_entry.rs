use chrono::NaiveDate;
use esales_core::{Customer, Order, Product};
use tracing::{info, warn};

use crate::api::{ClientError, SalesApiClient};
use crate::dialogs::{Dialogs, MessageKind};
use crate::LOAD_FAILED;

/// Selections made on the order entry screen.
#[derive(Debug, Default, Clone)]
pub struct OrderEntryState {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub selected_product: Option<usize>,
    pub selected_customer: Option<usize>,
    /// Raw quantity input; anything that is not a positive integer is rejected on submit.
    pub quantity: String,
    pub order_date: Option<NaiveDate>,
}

impl OrderEntryState {
    /// Opens the screen with both selectors populated.
    pub async fn open(api: &SalesApiClient, dialogs: &mut dyn Dialogs) -> Self {
        let mut state = Self::default();
        state.load(api, dialogs).await;
        state
    }

    /// Fetches products and customers. Returns `false` after reporting a failure.
    pub async fn load(&mut self, api: &SalesApiClient, dialogs: &mut dyn Dialogs) -> bool {
        match fetch_choices(api).await {
            Ok((products, customers)) => {
                self.products = products;
                self.customers = customers;
                self.selected_product = None;
                self.selected_customer = None;
                true
            }
            Err(err) => {
                warn!(stage = "client", error = %err, "loading order entry choices failed");
                dialogs.message(MessageKind::Error, "", LOAD_FAILED);
                false
            }
        }
    }

    /// Builds the order described by the current selections, if complete.
    pub fn draft(&self) -> Option<Order> {
        let product = self.products.get(self.selected_product?)?;
        let customer = self.customers.get(self.selected_customer?)?;
        let quantity = self.quantity.trim().parse::<i32>().unwrap_or(0);
        if quantity <= 0 {
            return None;
        }

        Some(Order {
            order_id: 0,
            product_id: product.product_id,
            customer_id: customer.customer_id,
            quantity,
            order_date: self.order_date?,
        })
    }

    /// Posts the drafted order. Returns `true` when the server accepted it.
    pub async fn submit(&self, api: &SalesApiClient, dialogs: &mut dyn Dialogs) -> bool {
        let Some(order) = self.draft() else {
            dialogs.message(
                MessageKind::Warning,
                "",
                "Please fill in all fields correctly.",
            );
            return false;
        };

        match api.create_order(&order).await {
            Ok(created) => {
                info!(stage = "client", location = ?created.location, "order submitted");
                dialogs.message(MessageKind::Information, "", "Order added successfully!");
                true
            }
            Err(ClientError::Status { status, .. }) => {
                warn!(stage = "client", %status, "order rejected");
                dialogs.message(MessageKind::Error, "", "Failed to add order.");
                false
            }
            Err(err) => {
                dialogs.message(
                    MessageKind::Error,
                    "Error",
                    &format!("An error occurred: {err}"),
                );
                false
            }
        }
    }
}

async fn fetch_choices(
    api: &SalesApiClient,
) -> Result<(Vec<Product>, Vec<Customer>), ClientError> {
    let products = api.list_products().await?;
    let customers = api.list_customers().await?;
    Ok((products, customers))
}
