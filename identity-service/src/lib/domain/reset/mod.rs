pub mod errors;
pub mod models;
pub mod ports;
pub mod workflow;

pub use workflow::PasswordResetWorkflow;
