use crate::error::ProfileResult;
use crate::profile::ProfileFields;
use crate::ProfileId;

use async_trait::async_trait;
use std::sync::Arc;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProfileRecord {
    pub id: ProfileId,
    pub username: String,
    pub email: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<i64>,
    pub about_me: Option<String>,
    pub profile_image_name: String,
}

/// A full overwrite of a record's form fields.
///
/// `profile_image_name: None` keeps the stored image name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProfileUpdate {
    pub fields: ProfileFields,
    pub profile_image_name: Option<String>,
}

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    /// The record with the lowest id, if any.
    async fn find_first_profile(&self) -> ProfileResult<Option<ProfileRecord>>;

    async fn find_profile_by_id(&self, id: ProfileId) -> ProfileResult<Option<ProfileRecord>>;

    /// Insert a record only if the store is empty, then return the first record.
    ///
    /// Must be atomic with respect to concurrent callers.
    async fn insert_profile_if_empty(
        &self,
        username: &str,
        email: &str,
    ) -> ProfileResult<ProfileRecord>;

    /// Returns `None` if no record has the given id.
    async fn update_profile(
        &self,
        id: ProfileId,
        update: &ProfileUpdate,
    ) -> ProfileResult<Option<ProfileRecord>>;
}

#[async_trait]
impl<T: ProfileRepo + ?Sized> ProfileRepo for Arc<T> {
    async fn find_first_profile(&self) -> ProfileResult<Option<ProfileRecord>> {
        (**self).find_first_profile().await
    }

    async fn find_profile_by_id(&self, id: ProfileId) -> ProfileResult<Option<ProfileRecord>> {
        (**self).find_profile_by_id(id).await
    }

    async fn insert_profile_if_empty(
        &self,
        username: &str,
        email: &str,
    ) -> ProfileResult<ProfileRecord> {
        (**self).insert_profile_if_empty(username, email).await
    }

    async fn update_profile(
        &self,
        id: ProfileId,
        update: &ProfileUpdate,
    ) -> ProfileResult<Option<ProfileRecord>> {
        (**self).update_profile(id, update).await
    }
}
