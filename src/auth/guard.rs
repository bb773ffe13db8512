use crate::{error::AppError, models::User};

/// Allows a mutation of account `target_id` only when it is the caller's own account.
///
/// Identity equality is the whole authorization model: there are no roles or scopes.
pub fn authorize(current: &User, target_id: i32) -> Result<(), AppError> {
    if current.id == target_id {
        Ok(())
    } else {
        log::warn!(
            "User {} attempted to modify account {}",
            current.id,
            target_id
        );
        Err(AppError::InsufficientPermissions)
    }
}
