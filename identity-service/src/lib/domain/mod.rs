pub mod access;
pub mod clock;
pub mod identity;
pub mod reset;
pub mod role;
pub mod token;
