pub mod stock;

pub use stock::{InventoryError, InventoryService};
