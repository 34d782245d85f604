//! Field rules shared by the API handlers and the client screens.

use thiserror::Error;

use crate::types::{Customer, Order, OrderDto};

/// Longest customer name accepted, in UTF-16 code units.
pub const MAX_CUSTOMER_NAME_LEN: usize = 99;

/// Business-rule violations. The `Display` text is what API callers see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Phone number format is invalid. Use xxx-xxx-xxxx.")]
    InvalidPhone,
    #[error("Name cannot exceed 99 characters.")]
    NameTooLong,
    #[error("Customer ID mismatch.")]
    CustomerIdMismatch,
    #[error("Order ID mismatch.")]
    OrderIdMismatch,
    #[error("Invalid order ID.")]
    InvalidOrderId,
    #[error("Invalid ProductId.")]
    UnknownProduct,
    #[error("Invalid CustomerId.")]
    UnknownCustomer,
    #[error("Quantity must be greater than 0.")]
    NonPositiveQuantity,
    #[error("Invalid Product or Customer.")]
    UnresolvedReference,
}

/// Checks the `DDD-DDD-DDDD` phone layout (ASCII digits only).
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let groups: Vec<&str> = phone.split('-').collect();
    let well_formed = matches!(groups.as_slice(), [a, b, c]
        if a.len() == 3 && b.len() == 3 && c.len() == 4
            && groups.iter().all(|g| g.bytes().all(|byte| byte.is_ascii_digit())));

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

pub fn validate_customer_name(name: &str) -> Result<(), ValidationError> {
    if name.encode_utf16().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), ValidationError> {
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity);
    }
    Ok(())
}

/// Rules applied before a customer is inserted: phone first, then name.
pub fn validate_new_customer(customer: &Customer) -> Result<(), ValidationError> {
    validate_phone(&customer.phone)?;
    validate_customer_name(&customer.name)
}

/// Rules applied before a customer update touches the store.
pub fn validate_customer_update(path_id: i64, customer: &Customer) -> Result<(), ValidationError> {
    if path_id != customer.customer_id {
        return Err(ValidationError::CustomerIdMismatch);
    }
    validate_phone(&customer.phone)?;
    validate_customer_name(&customer.name)
}

/// Rules applied before an id-based order update touches the store.
pub fn validate_order_update(path_id: i64, order: &Order) -> Result<(), ValidationError> {
    if path_id != order.order_id {
        return Err(ValidationError::OrderIdMismatch);
    }
    validate_quantity(order.quantity)
}

/// Rules applied before a name-based order update touches the store.
pub fn validate_order_dto_update(path_id: i64, dto: &OrderDto) -> Result<(), ValidationError> {
    if path_id != dto.order_id {
        return Err(ValidationError::OrderIdMismatch);
    }
    Ok(())
}

/// Order deletion refuses non-positive ids before any lookup.
pub fn validate_order_id(id: i64) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::InvalidOrderId);
    }
    Ok(())
}
