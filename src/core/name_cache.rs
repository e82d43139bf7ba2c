//! Process-lifetime cache of Slack user display names.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::BotError;
use crate::slack::UserDirectory;

/// Lazily filled map from user id to display name.
///
/// Entries are never evicted. The lock is released before the remote lookup,
/// so two concurrent misses for the same id both hit the directory and the
/// later write wins with an identical value.
pub struct NameCache {
    directory: Arc<dyn UserDirectory>,
    names: RwLock<HashMap<String, String>>,
}

impl NameCache {
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            names: RwLock::new(HashMap::new()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the name is not cached and the remote lookup fails.
    pub async fn get(&self, user_id: &str) -> Result<String, BotError> {
        if let Some(name) = self.names.read().await.get(user_id) {
            return Ok(name.clone());
        }

        let name = self.directory.user_display_name(user_id).await?;
        debug!(user_id = %user_id, name = %name, "cached user display name");
        self.names
            .write()
            .await
            .insert(user_id.to_string(), name.clone());
        Ok(name)
    }

    pub async fn len(&self) -> usize {
        self.names.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.names.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDirectory {
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl UserDirectory for CountingDirectory {
        async fn user_display_name(&self, user_id: &str) -> Result<String, BotError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if user_id == "UMISSING" {
                return Err(BotError::ApiError("user_not_found".to_string()));
            }
            Ok(format!("Name of {user_id}"))
        }
    }

    #[tokio::test]
    async fn looks_up_each_user_once() {
        let directory = Arc::new(CountingDirectory {
            lookups: AtomicUsize::new(0),
        });
        let cache = NameCache::new(directory.clone());

        assert_eq!(cache.get("U1").await.unwrap(), "Name of U1");
        assert_eq!(cache.get("U1").await.unwrap(), "Name of U1");
        assert_eq!(cache.get("U2").await.unwrap(), "Name of U2");

        assert_eq!(directory.lookups.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn failed_lookup_is_not_cached() {
        let directory = Arc::new(CountingDirectory {
            lookups: AtomicUsize::new(0),
        });
        let cache = NameCache::new(directory.clone());

        assert!(cache.get("UMISSING").await.is_err());
        assert!(cache.get("UMISSING").await.is_err());

        assert_eq!(directory.lookups.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty().await);
    }
}
