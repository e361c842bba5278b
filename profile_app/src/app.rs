use crate::config::Config;
use profile_avatar::AvatarDir;
use profile_core::avatar::{AvatarStore, AvatarUpload};
use profile_core::error::ProfileResult;
use profile_core::profile::repo::{ProfileRecord, ProfileRepo, ProfileUpdate};
use profile_core::ProfileId;
use profile_db::Db;

use async_trait::async_trait;
use std::sync::Arc;

#[derive(Clone)]
pub struct App {
    pub config: Arc<Config>,
    pub db: Db,
    pub avatars: AvatarDir,
}

impl App {
    pub async fn init(config: Config) -> anyhow::Result<Self> {
        let db = Db::init(&config.database_url).await?;
        let avatars = AvatarDir::open(&config.upload_dir).await?;

        Ok(App {
            config: Arc::new(config),
            db,
            avatars,
        })
    }
}

#[async_trait]
impl ProfileRepo for App {
    async fn find_first_profile(&self) -> ProfileResult<Option<ProfileRecord>> {
        self.db.find_first_profile().await
    }

    async fn find_profile_by_id(&self, id: ProfileId) -> ProfileResult<Option<ProfileRecord>> {
        self.db.find_profile_by_id(id).await
    }

    async fn insert_profile_if_empty(
        &self,
        username: &str,
        email: &str,
    ) -> ProfileResult<ProfileRecord> {
        self.db.insert_profile_if_empty(username, email).await
    }

    async fn update_profile(
        &self,
        id: ProfileId,
        update: &ProfileUpdate,
    ) -> ProfileResult<Option<ProfileRecord>> {
        self.db.update_profile(id, update).await
    }
}

#[async_trait]
impl AvatarStore for App {
    async fn save_avatar(&self, upload: AvatarUpload) -> ProfileResult<String> {
        self.avatars.save_avatar(upload).await
    }

    async fn remove_avatar(&self, file_name: &str) -> ProfileResult<()> {
        self.avatars.remove_avatar(file_name).await
    }
}
