pub mod aggregate;
pub mod dataset;
pub mod filter;
pub mod schema;
