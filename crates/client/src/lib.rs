pub mod api;
pub mod dialogs;
pub mod order_entry;
pub mod order_list;

pub use api::{ClientError, CreatedOrder, SalesApiClient};
pub use dialogs::{Dialogs, MessageKind};
pub use order_entry::OrderEntryState;
pub use order_list::OrderListState;

/// Shown when a screen cannot fetch its initial data.
pub const LOAD_FAILED: &str = "Error occurred while loading data. Contact administrator";
