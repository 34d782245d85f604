//! Terminal front-end for placing and managing orders.
//!
//! ```bash
//! ESALES_API_URL=http://localhost:8080/ cargo run -p esales-client --bin esales-desk
//! ```

use chrono::Utc;
use dialoguer::{Confirm, Input, Select};
use esales_client::{Dialogs, MessageKind, OrderEntryState, OrderListState, SalesApiClient};
use esales_core::types::iso_date;
use reqwest::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

struct TerminalDialogs;

impl Dialogs for TerminalDialogs {
    fn message(&mut self, kind: MessageKind, title: &str, text: &str) {
        let marker = match kind {
            MessageKind::Information => "i",
            MessageKind::Warning => "!",
            MessageKind::Error => "x",
        };
        if title.is_empty() {
            println!("[{marker}] {text}");
        } else {
            println!("[{marker}] {title}: {text}");
        }
    }

    fn confirm(&mut self, title: &str, text: &str) -> bool {
        println!("{title}");
        Confirm::new()
            .with_prompt(text)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    esales_util::load_env_file();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let base_url = Url::parse(&esales_util::api_base_url())?;
    info!(stage = "client", %base_url, "connecting to sales API");
    let api = SalesApiClient::new(base_url, Client::builder().build()?);
    let mut dialogs = TerminalDialogs;

    let items = ["Place an order", "View orders", "Quit"];
    loop {
        let selection = Select::new()
            .with_prompt("E-Sales")
            .items(&items)
            .default(0)
            .interact()?;

        match selection {
            0 => place_order(&api, &mut dialogs).await?,
            1 => manage_orders(&api, &mut dialogs).await?,
            _ => return Ok(()),
        }
    }
}

async fn place_order(
    api: &SalesApiClient,
    dialogs: &mut TerminalDialogs,
) -> Result<(), dialoguer::Error> {
    let mut state = OrderEntryState::open(api, dialogs).await;
    if state.products.is_empty() && state.customers.is_empty() {
        return Ok(());
    }

    let products: Vec<&str> = state.products.iter().map(|p| p.name.as_str()).collect();
    state.selected_product = Select::new()
        .with_prompt("Product")
        .items(&products)
        .interact_opt()?;

    let customers: Vec<&str> = state.customers.iter().map(|c| c.name.as_str()).collect();
    state.selected_customer = Select::new()
        .with_prompt("Customer")
        .items(&customers)
        .interact_opt()?;

    state.quantity = Input::new()
        .with_prompt("Quantity")
        .allow_empty(true)
        .interact_text()?;

    let date: String = Input::new()
        .with_prompt("Order date (YYYY-MM-DD)")
        .with_initial_text(Utc::now().date_naive().to_string())
        .allow_empty(true)
        .interact_text()?;
    state.order_date = iso_date::parse(&date).ok();

    state.submit(api, dialogs).await;
    Ok(())
}

async fn manage_orders(
    api: &SalesApiClient,
    dialogs: &mut TerminalDialogs,
) -> Result<(), dialoguer::Error> {
    let mut state = OrderListState::open(api, dialogs).await;
    let actions = ["Select order", "Edit selected", "Delete selected", "Reload", "Back"];

    loop {
        print_orders(&state);
        let action = Select::new()
            .with_prompt("Orders")
            .items(&actions)
            .default(0)
            .interact()?;

        match action {
            0 => {
                let rows: Vec<String> = state
                    .orders
                    .iter()
                    .map(|o| format!("#{} {} / {} x{}", o.order_id, o.product, o.customer, o.quantity))
                    .collect();
                if !rows.is_empty() {
                    state.selected = Select::new()
                        .with_prompt("Order")
                        .items(&rows)
                        .interact_opt()?;
                }
            }
            1 => {
                if let Some(row) = state.selected_order_mut() {
                    row.product = Input::new()
                        .with_prompt("Product")
                        .with_initial_text(row.product.clone())
                        .allow_empty(true)
                        .interact_text()?;
                    row.customer = Input::new()
                        .with_prompt("Customer")
                        .with_initial_text(row.customer.clone())
                        .allow_empty(true)
                        .interact_text()?;
                    row.quantity = Input::new()
                        .with_prompt("Quantity")
                        .with_initial_text(row.quantity.to_string())
                        .interact_text()?;
                    let date: String = Input::new()
                        .with_prompt("Order date (YYYY-MM-DD)")
                        .with_initial_text(row.order_date.to_string())
                        .interact_text()?;
                    if let Ok(parsed) = iso_date::parse(&date) {
                        row.order_date = parsed;
                    }
                }
                state.save_selected(api, dialogs).await;
            }
            2 => state.delete_selected(api, dialogs).await,
            3 => {
                state.load(api, dialogs).await;
            }
            _ => return Ok(()),
        }
    }
}

fn print_orders(state: &OrderListState) {
    println!(
        "{:<3}{:>6}  {:<24}{:<24}{:>8}  {}",
        "", "ID", "Product", "Customer", "Qty", "Date"
    );
    for (index, order) in state.orders.iter().enumerate() {
        let marker = if state.selected == Some(index) { ">" } else { "" };
        println!(
            "{:<3}{:>6}  {:<24}{:<24}{:>8}  {}",
            marker, order.order_id, order.product, order.customer, order.quantity, order.order_date
        );
    }
}
