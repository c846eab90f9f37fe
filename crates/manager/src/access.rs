use majoba_core::error::CoreError;
use majoba_db::models::user::User;

/// Reject non-staff requesters.
pub fn require_staff(requester: &User, action: &str) -> Result<(), CoreError> {
    if requester.is_staff && requester.is_active {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "User '{}' is not allowed to {action}",
            requester.username
        )))
    }
}
