use crate::avatar::{AvatarStore, AvatarUpload};
use crate::error::ProfileResult;
use crate::profile::repo::{ProfileRecord, ProfileRepo, ProfileUpdate};
use crate::ProfileId;

use async_trait::async_trait;

// Everything a profile operation depends on, in one mock.
mockall::mock! {
    pub Deps {}

    #[async_trait]
    impl ProfileRepo for Deps {
        async fn find_first_profile(&self) -> ProfileResult<Option<ProfileRecord>>;
        async fn find_profile_by_id(&self, id: ProfileId) -> ProfileResult<Option<ProfileRecord>>;
        async fn insert_profile_if_empty(
            &self,
            username: &str,
            email: &str,
        ) -> ProfileResult<ProfileRecord>;
        async fn update_profile(
            &self,
            id: ProfileId,
            update: &ProfileUpdate,
        ) -> ProfileResult<Option<ProfileRecord>>;
    }

    #[async_trait]
    impl AvatarStore for Deps {
        async fn save_avatar(&self, upload: AvatarUpload) -> ProfileResult<String>;
        async fn remove_avatar(&self, file_name: &str) -> ProfileResult<()>;
    }
}
