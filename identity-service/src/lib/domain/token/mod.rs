pub mod errors;
pub mod issuer;
pub mod ledger;
pub mod models;
pub mod ports;

pub use issuer::TokenIssuer;
pub use ledger::RefreshTokenLedger;
