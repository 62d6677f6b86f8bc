//! Turn order.
//!
//! The scheduler keeps the active players in rotation; the policy decides
//! whether a safe step ends a turn.

pub mod policy;
pub mod scheduler;

pub use policy::TurnPolicy;
pub use scheduler::TurnScheduler;
