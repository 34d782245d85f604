//! Domain types and field rules for the sales-order service.
pub mod types;
pub mod validation;

pub use types::{Customer, CustomerSummary, Order, OrderDto, OrderWithCustomer, Product};
pub use validation::ValidationError;
