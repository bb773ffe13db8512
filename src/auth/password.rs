use crate::error::AppError;

/// Salted one-way hashing of account passwords with bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Returns `Ok(false)` for a wrong password. Only a digest bcrypt cannot parse is an error.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, AppError> {
        Ok(bcrypt::verify(password, digest)?)
    }

    /// Runs [`hash`](Self::hash) on the blocking pool so request workers stay free.
    pub async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    pub async fn verify_blocking(&self, password: String, digest: String) -> Result<bool, AppError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest)).await?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
