pub mod duck_warehouse;
pub mod warehouse;
