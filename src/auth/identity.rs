use crate::{auth::token::Claims, error::AppError, models::User};
use sqlx::PgExecutor;

/// Loads the account named by a verified token's subject.
///
/// An unknown subject is reported exactly like a bad token, so the auth error channel
/// cannot be used to probe which emails are registered.
pub async fn resolve<'e, E>(executor: E, claims: &Claims) -> Result<User, AppError>
where
    E: PgExecutor<'e>,
{
    if claims.sub.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    match User::find_by_email(executor, &claims.sub).await? {
        Some(user) => Ok(user),
        None => {
            log::debug!("Token subject does not match any account");
            Err(AppError::InvalidCredentials)
        }
    }
}
