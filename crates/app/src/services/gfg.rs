use crate::error::{AppError, Result};
use crate::services::SharedSources;

/// Uncached profile-page count, exposed as a public proxy.
#[derive(Clone)]
pub struct GfgCountService {
    sources: SharedSources,
}

impl GfgCountService {
    pub(super) fn new(sources: SharedSources) -> Self {
        Self { sources }
    }

    pub async fn count(&self, user: &str) -> Result<u64> {
        let user = user.trim();
        if user.is_empty() {
            return Err(AppError::InvalidInput("user is required".to_string()));
        }
        Ok(self.sources.profile_page.solved_count(user).await?)
    }
}
