pub mod errors;
pub mod models;
pub mod ports;
pub mod registry;

pub use models::RoleKey;
pub use registry::RoleRegistry;
