//! Domain error types.
//!
//! These errors represent validation failures when assembling domain
//! values. They are distinct from provider and storage errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// The selection has no origin/destination pair yet
    #[error("trip selection is missing an origin or destination")]
    MissingEndpoints,

    /// A trip must belong to a user
    #[error("user id must not be empty")]
    EmptyUserId,
}
