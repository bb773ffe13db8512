pub mod extractors;
pub mod guard;
pub mod identity;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::CurrentUser;
pub use guard::authorize;
pub use password::PasswordHasher;
pub use token::{Claims, TokenKeys};

/// Form body of `POST /auth/token`, in the OAuth2 password-grant shape.
///
/// `username` carries the account's email address. It is not format-checked: a value
/// that is not a registered email simply fails the lookup.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response structure after a successful login or refresh.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed JWT to present as `Authorization: Bearer <token>`.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
