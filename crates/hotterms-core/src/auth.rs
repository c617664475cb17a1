use crate::error::{HotTermsError, Result};

pub const DEFAULT_ADMIN_PASSWORD: &str = "change-me";

/// Shared admin secret, held only as a digest. `blake3::Hash` equality is constant-time.
#[derive(Clone)]
pub struct AdminCredential {
    digest: blake3::Hash,
    is_default: bool,
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredential")
            .field("is_default", &self.is_default)
            .finish_non_exhaustive()
    }
}

impl AdminCredential {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            digest: blake3::hash(secret.as_bytes()),
            is_default: secret == DEFAULT_ADMIN_PASSWORD,
        }
    }

    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        blake3::hash(candidate.as_bytes()) == self.digest
    }

    pub fn authorize(&self, candidate: &str) -> Result<()> {
        if self.matches(candidate) {
            Ok(())
        } else {
            Err(HotTermsError::Unauthorized("incorrect password".to_string()))
        }
    }

    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }
}

impl Default for AdminCredential {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_PASSWORD)
    }
}
