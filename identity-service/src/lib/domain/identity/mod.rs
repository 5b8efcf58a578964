pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use errors::IdentityError;
pub use models::NormalizedEmail;
pub use models::Principal;
pub use models::PrincipalId;
pub use service::IdentityService;
