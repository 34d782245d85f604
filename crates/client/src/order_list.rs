use esales_core::OrderDto;
use tracing::{info, warn};

use crate::api::{ClientError, SalesApiClient};
use crate::dialogs::{Dialogs, MessageKind};
use crate::LOAD_FAILED;

/// Rows shown on the order list screen and the currently selected one.
#[derive(Debug, Default, Clone)]
pub struct OrderListState {
    pub orders: Vec<OrderDto>,
    pub selected: Option<usize>,
}

impl OrderListState {
    pub async fn open(api: &SalesApiClient, dialogs: &mut dyn Dialogs) -> Self {
        let mut state = Self::default();
        state.load(api, dialogs).await;
        state
    }

    /// Replaces the rows with `GET /api/OrdersDto`. Clears the selection.
    pub async fn load(&mut self, api: &SalesApiClient, dialogs: &mut dyn Dialogs) -> bool {
        match api.list_order_dtos().await {
            Ok(orders) => {
                self.orders = orders;
                self.selected = None;
                true
            }
            Err(err) => {
                warn!(stage = "client", error = %err, "loading orders failed");
                dialogs.message(MessageKind::Error, "", LOAD_FAILED);
                false
            }
        }
    }

    pub fn selected_order(&self) -> Option<&OrderDto> {
        self.orders.get(self.selected?)
    }

    /// Mutable access to the selected row for in-place editing.
    pub fn selected_order_mut(&mut self) -> Option<&mut OrderDto> {
        let index = self.selected?;
        self.orders.get_mut(index)
    }

    /// Deletes the selected order after confirmation, then reloads.
    pub async fn delete_selected(&mut self, api: &SalesApiClient, dialogs: &mut dyn Dialogs) {
        let Some(order_id) = self.selected_order().map(|order| order.order_id) else {
            dialogs.message(
                MessageKind::Warning,
                "Selection Error",
                "Please select an order to delete.",
            );
            return;
        };

        let question = format!("Are you sure you want to delete the order with ID {order_id}?");
        if !dialogs.confirm("Confirm Deletion", &question) {
            return;
        }

        match api.delete_order(order_id).await {
            Ok(_) => {
                info!(stage = "client", order_id, "order deleted");
                dialogs.message(
                    MessageKind::Information,
                    "Success",
                    "Order deleted successfully!",
                );
                self.load(api, dialogs).await;
            }
            Err(err) => report_failure(dialogs, "Failed to delete order.", &err),
        }
    }

    /// Sends the selected row, as edited, to `PUT /api/OrdersDto/{id}`, then reloads.
    pub async fn save_selected(&mut self, api: &SalesApiClient, dialogs: &mut dyn Dialogs) {
        let Some(order) = self.selected_order().cloned() else {
            dialogs.message(
                MessageKind::Warning,
                "Selection Error",
                "Please select an order to edit.",
            );
            return;
        };

        if order.product.trim().is_empty() || order.customer.trim().is_empty() || order.quantity <= 0
        {
            dialogs.message(
                MessageKind::Warning,
                "Validation Error",
                "Please ensure all fields are filled correctly.",
            );
            return;
        }

        match api.update_order_dto(&order).await {
            Ok(()) => {
                info!(stage = "client", order_id = order.order_id, "order updated");
                dialogs.message(
                    MessageKind::Information,
                    "Success",
                    "Order updated successfully!",
                );
                self.load(api, dialogs).await;
            }
            Err(err) => report_failure(dialogs, "Failed to update order.", &err),
        }
    }
}

fn report_failure(dialogs: &mut dyn Dialogs, prefix: &str, err: &ClientError) {
    warn!(stage = "client", error = %err, "{prefix}");
    let text = match err.server_response() {
        Some(body) => format!("{prefix} Server response: {body}"),
        None => format!("An error occurred: {err}"),
    };
    dialogs.message(MessageKind::Error, "Error", &text);
}
