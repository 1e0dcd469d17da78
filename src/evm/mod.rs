pub mod api;
mod handler;
pub mod precompiles;
pub mod spec;
pub mod transaction;
