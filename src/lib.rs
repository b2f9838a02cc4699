pub mod api;
pub mod config;
pub mod country;
pub mod db;
pub mod error;
pub mod fetch;
pub mod frame;
pub mod normalize;
pub mod pipeline;
pub mod utils;

#[cfg(test)]
mod fixtures;
