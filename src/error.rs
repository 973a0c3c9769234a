use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Cart is empty: add items before checking out")]
    EmptyCart,
    #[error("Unknown item: {0}")]
    UnknownItem(String),
    #[error("Invalid quantity for {item}: {quantity}")]
    InvalidQuantity { item: String, quantity: String },
    #[error("Customer ID already exists: {0}")]
    DuplicateCustomer(String),
    #[error("No account found with ID {0}")]
    CustomerNotFound(String),
    #[error("Authentication failed for customer {0}")]
    AuthenticationFailed(String),
    #[error("Invalid order ID: {0}")]
    InvalidOrderId(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
