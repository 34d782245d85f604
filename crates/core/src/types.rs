use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Customer record as exchanged over the API and stored in `customers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    /// Assigned by the store; ignored on create.
    #[serde(default)]
    pub customer_id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: String,
    #[serde(default = "today", with = "iso_date")]
    pub registration_date: NaiveDate,
}

/// Product offered for ordering. Read-only through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Order row referencing a product and a customer by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    #[serde(default)]
    pub order_id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub quantity: i32,
    #[serde(with = "iso_date")]
    pub order_date: NaiveDate,
}

/// Flattened order view carrying product and customer names instead of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderDto {
    pub order_id: i64,
    pub product: String,
    pub customer: String,
    pub quantity: i32,
    #[serde(with = "iso_date")]
    pub order_date: NaiveDate,
}

/// Order view enriched with the customer's contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderWithCustomer {
    pub order_id: i64,
    pub quantity: i32,
    #[serde(with = "iso_date")]
    pub order_date: NaiveDate,
    pub product: String,
    pub customer: CustomerSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerSummary {
    pub customer_id: i64,
    pub name: String,
    pub phone: String,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Serializes dates as `YYYY-MM-DD`.
///
/// Deserialization also accepts ISO-8601 date-time strings
/// (`2024-01-01T00:00:00`, `2024-01-01T00:00:00Z`) and keeps the date part.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }

    /// Parses a date or date-time string into its calendar date.
    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        let trimmed = raw.trim();
        let date_part = trimmed
            .split_once(['T', ' '])
            .map(|(date, _)| date)
            .unwrap_or(trimmed);
        NaiveDate::parse_from_str(date_part, FORMAT)
            .map_err(|err| format!("invalid date '{raw}': {err}"))
    }
}
