/// Ownership checks
///
/// Routes are scoped under a `user_id` path segment. After authentication the
/// segment must equal the verified subject, otherwise the request is
/// forbidden. Task lookups are additionally filtered by owner in SQL, so a
/// task owned by someone else is reported as not found rather than forbidden.
///
/// # Example
///
/// ```
/// use todo_shared::auth::authorization::{require_owner, AuthzError};
/// use todo_shared::auth::UserId;
///
/// let subject = UserId::new("alice").unwrap();
/// assert!(require_owner("alice", &subject).is_ok());
/// assert!(matches!(require_owner("bob", &subject), Err(AuthzError::OwnershipMismatch)));
/// ```

use super::guard::UserId;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Path user ID differs from the token subject
    #[error("Cannot access other users' tasks")]
    OwnershipMismatch,
}

/// Checks that the `user_id` path segment belongs to the caller
///
/// Comparison is exact; no case folding or trimming.
pub fn require_owner(path_user_id: &str, subject: &UserId) -> Result<(), AuthzError> {
    if path_user_id != subject.as_str() {
        tracing::debug!(
            path_user_id = %path_user_id,
            subject = %subject,
            "Ownership check failed"
        );
        return Err(AuthzError::OwnershipMismatch);
    }

    Ok(())
}
