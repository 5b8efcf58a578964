pub mod errors;
pub mod gate;
pub mod service;

pub use errors::AccessError;
pub use gate::AccessRequirements;
pub use gate::BlockReason;
pub use service::AccessWorkflowService;
