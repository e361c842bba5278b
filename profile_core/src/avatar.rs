use crate::error::ProfileResult;

use async_trait::async_trait;
use std::sync::Arc;

/// File name of the avatar every profile starts out with.
///
/// It is shipped with the upload directory and is never deleted.
pub const DEFAULT_AVATAR: &str = "default.jpg";

pub fn is_default(file_name: &str) -> bool {
    file_name == DEFAULT_AVATAR
}

/// An image file as submitted by the client.
#[derive(Clone, Debug)]
pub struct AvatarUpload {
    /// Client-side file name. Only its extension is used.
    pub file_name: String,
    pub bytes: bytes::Bytes,
}

/// Storage of processed avatar images.
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Normalize the upload into a thumbnail and store it under a fresh name.
    ///
    /// Returns the stored file name.
    async fn save_avatar(&self, upload: AvatarUpload) -> ProfileResult<String>;

    /// Delete a stored avatar. Deleting [DEFAULT_AVATAR] is a no-op.
    async fn remove_avatar(&self, file_name: &str) -> ProfileResult<()>;
}

#[async_trait]
impl<T: AvatarStore + ?Sized> AvatarStore for Arc<T> {
    async fn save_avatar(&self, upload: AvatarUpload) -> ProfileResult<String> {
        (**self).save_avatar(upload).await
    }

    async fn remove_avatar(&self, file_name: &str) -> ProfileResult<()> {
        (**self).remove_avatar(file_name).await
    }
}
