pub mod repo;

use crate::avatar::{self, AvatarStore, AvatarUpload};
use crate::error::{ProfileError, ProfileResult};
use crate::ProfileId;
use repo::{ProfileRecord, ProfileRepo, ProfileUpdate};

/// Username of the record created on first visit.
pub const DEFAULT_USERNAME: &str = "Default User";

/// Email of the record created on first visit.
pub const DEFAULT_EMAIL: &str = "default@example.com";

/// The scalar fields of one profile form submission.
///
/// Every submission overwrites all of these. An optional field that was left
/// out of the form is stored as `None`, it does not keep its old value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProfileFields {
    pub username: String,
    pub email: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<i64>,
    pub about_me: Option<String>,
}

/// Fetch the profile, creating the default one if the store is empty.
pub async fn get_or_create_default(deps: &impl ProfileRepo) -> ProfileResult<ProfileRecord> {
    if let Some(profile) = deps.find_first_profile().await? {
        return Ok(profile);
    }

    let profile = deps
        .insert_profile_if_empty(DEFAULT_USERNAME, DEFAULT_EMAIL)
        .await?;
    tracing::info!(profile_id = %profile.id, "created default profile");

    Ok(profile)
}

/// Overwrite the profile `id` with `fields`, optionally replacing its avatar.
///
/// The new avatar is stored before the record is written, and the previous
/// one is only deleted once the write has succeeded.
pub async fn update(
    deps: &(impl ProfileRepo + AvatarStore),
    id: ProfileId,
    fields: ProfileFields,
    new_image: Option<AvatarUpload>,
) -> ProfileResult<ProfileRecord> {
    let current = deps
        .find_profile_by_id(id)
        .await?
        .ok_or(ProfileError::ProfileNotFound)?;

    let new_image_name = match new_image {
        Some(upload) => Some(deps.save_avatar(upload).await?),
        None => None,
    };

    let update = ProfileUpdate {
        fields,
        profile_image_name: new_image_name.clone(),
    };

    let updated = match deps.update_profile(id, &update).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            if let Some(name) = &new_image_name {
                discard_avatar(deps, name).await;
            }
            return Err(ProfileError::ProfileNotFound);
        }
        Err(e) => {
            if let Some(name) = &new_image_name {
                discard_avatar(deps, name).await;
            }
            return Err(e);
        }
    };

    if new_image_name.is_some() && !avatar::is_default(&current.profile_image_name) {
        discard_avatar(deps, &current.profile_image_name).await;
    }

    Ok(updated)
}

/// Update the first profile in the store, creating it if necessary.
pub async fn update_current(
    deps: &(impl ProfileRepo + AvatarStore),
    fields: ProfileFields,
    new_image: Option<AvatarUpload>,
) -> ProfileResult<ProfileRecord> {
    let current = get_or_create_default(deps).await?;
    update(deps, current.id, fields, new_image).await
}

// The record no longer references the file at this point, so a failed
// delete only leaves an orphan behind.
async fn discard_avatar(deps: &impl AvatarStore, file_name: &str) {
    if let Err(e) = deps.remove_avatar(file_name).await {
        tracing::warn!(file_name, "failed to delete avatar: {:?}", e);
    }
}
