//! Embeddable identity and access-control engine.
//!
//! Authenticates credentials, issues and rotates session tokens, runs the
//! password-reset and email-verification lifecycles, and resolves role-based
//! authorization for a host application's user records. The host supplies
//! storage, a clock, and a notification channel through the port traits; the
//! engine never assumes a particular database or transport.
//!
//! The public surface is [`IdentityService`] (registration, login, refresh,
//! logout, password change/reset, email verification) and
//! [`AccessWorkflowService`] (admin-facing verification/approval/activation
//! toggles and role management). Token ledger, role registry, and access
//! gate are internal collaborators behind those two services.

pub mod config;
pub mod domain;

pub use domain::access;
pub use domain::identity;

pub use domain::access::service::AccessWorkflowService;
pub use domain::identity::service::IdentityService;
