pub mod argon2;
pub mod errors;

pub use argon2::CredentialHasher;
pub use errors::HashError;
