use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Column bindings and ranking cutoffs for one dataset kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    pub date_field: String,
    pub date_format: String,
    pub amount_field: Option<String>,
    pub store_field: String,
    pub group_field: String,
    pub contact_field: Option<String>,
    pub product_field: Option<String>,
    pub top_n: usize,
}

impl DatasetSchema {
    pub fn orders() -> Self {
        Self {
            date_field: "Дата статуса".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            amount_field: Some("Сумма заказа".to_string()),
            store_field: "Магазин".to_string(),
            group_field: "group".to_string(),
            contact_field: Some("Контактный телефон".to_string()),
            product_field: None,
            top_n: 5,
        }
    }

    pub fn cart() -> Self {
        Self {
            date_field: "Дата статуса".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            amount_field: None,
            store_field: "Магазин".to_string(),
            group_field: "group".to_string(),
            contact_field: None,
            product_field: Some("Товар".to_string()),
            top_n: 8,
        }
    }

    /// Columns that must be present in the header row for a load to succeed.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut required = vec![
            self.date_field.as_str(),
            self.store_field.as_str(),
            self.group_field.as_str(),
        ];
        if let Some(amount) = self.amount_field.as_deref() {
            required.push(amount);
        }
        if let Some(product) = self.product_field.as_deref() {
            required.push(product);
        }
        required
    }
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self::orders()
    }
}
