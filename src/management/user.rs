use std::path::PathBuf;

use async_trait::async_trait;

use crate::{
    error::StoreError,
    types::{TokenState, UserRecord},
};

/// Narrow persistence seam for user records.
///
/// The pipeline needs exactly three operations: fetch a record, write a
/// record, and update the token state through a single mutation path. The
/// last one is deliberately the only way tokens are written, so concurrent
/// refreshes reduce to last-write-wins on one document field.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn put(&self, user: &UserRecord) -> Result<(), StoreError>;

    async fn update_tokens(&self, user_id: &str, tokens: &TokenState) -> Result<(), StoreError>;
}

/// File-backed user store: one pretty-printed JSON document per user under
/// a root directory.
pub struct FileUserStore {
    root: PathBuf,
}

impl FileUserStore {
    pub fn new(root: PathBuf) -> Self {
        FileUserStore { root }
    }

    /// Opens the store in the platform's local data directory
    /// (`tunesmith/users`).
    pub fn open_default() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("tunesmith/users");
        Self::new(path)
    }

    fn user_path(&self, user_id: &str) -> PathBuf {
        // user ids come from callers; keep the filename flat
        let safe: String = user_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let path = self.user_path(user_id);
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let user: UserRecord = serde_json::from_str(&content)?;
        Ok(Some(user))
    }

    async fn put(&self, user: &UserRecord) -> Result<(), StoreError> {
        let path = self.user_path(&user.id);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(user)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    async fn update_tokens(&self, user_id: &str, tokens: &TokenState) -> Result<(), StoreError> {
        let mut user = self
            .get(user_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;
        user.spotify = Some(tokens.clone());
        self.put(&user).await
    }
}
