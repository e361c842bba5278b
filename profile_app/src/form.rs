use profile_core::avatar::AvatarUpload;
use profile_core::error::{ProfileError, ProfileResult};
use profile_core::profile::ProfileFields;
use profile_core::ProfileId;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use std::collections::HashMap;

const IMAGE_FIELD: &str = "profile_image";

/// A decoded profile form submission.
#[derive(Debug)]
pub struct ProfileForm {
    pub user_id: Option<String>,
    pub fields: ProfileFields,
    pub image: Option<AvatarUpload>,
}

impl ProfileForm {
    pub async fn from_multipart(mut multipart: Multipart) -> ProfileResult<Self> {
        let mut values = HashMap::new();
        let mut image = None;

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(malformed)?;

                // Browsers send an empty file part when nothing was picked
                if !file_name.is_empty() {
                    image = Some(AvatarUpload { file_name, bytes });
                }
            } else {
                values.insert(name, field.text().await.map_err(malformed)?);
            }
        }

        Self::from_values(values, image)
    }

    pub fn from_values(
        mut values: HashMap<String, String>,
        image: Option<AvatarUpload>,
    ) -> ProfileResult<Self> {
        let fields = ProfileFields {
            username: required(&mut values, "username")?,
            email: required(&mut values, "email")?,
            age: optional_integer(&mut values, "age")?,
            gender: optional_text(&mut values, "gender"),
            height: optional_integer(&mut values, "height")?,
            about_me: optional_text(&mut values, "about_me"),
        };

        Ok(Self {
            user_id: values.remove("user_id"),
            fields,
            image,
        })
    }

    pub fn user_id(&self) -> ProfileResult<ProfileId> {
        self.user_id
            .as_deref()
            .ok_or(ProfileError::MissingField("user_id"))?
            .parse()
            .map_err(|_| ProfileError::InvalidField {
                field: "user_id",
                reason: "must be a whole number".into(),
            })
    }
}

fn malformed(e: MultipartError) -> ProfileError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ProfileError::PayloadTooLarge,
        _ => ProfileError::MalformedForm(e.body_text()),
    }
}

fn required(values: &mut HashMap<String, String>, field: &'static str) -> ProfileResult<String> {
    values.remove(field).ok_or(ProfileError::MissingField(field))
}

fn optional_text(values: &mut HashMap<String, String>, field: &str) -> Option<String> {
    values.remove(field).filter(|value| !value.trim().is_empty())
}

fn optional_integer(
    values: &mut HashMap<String, String>,
    field: &'static str,
) -> ProfileResult<Option<i64>> {
    match optional_text(values, field) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ProfileError::InvalidField {
                field,
                reason: "must be a whole number".into(),
            }),
        None => Ok(None),
    }
}
