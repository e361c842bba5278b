use crate::form::ProfileForm;
use profile_core::avatar::AvatarStore;
use profile_core::error::{ProfileError, ProfileResult};
use profile_core::profile::{self, repo::ProfileRecord, repo::ProfileRepo};

use anyhow::Context;
use askama::Template;
use axum::extract::{Extension, Multipart};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};

const PROFILE_PATH: &str = "/profile";

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfilePage<'a> {
    user_id: String,
    username: &'a str,
    email: &'a str,
    age: String,
    gender: &'a str,
    height: String,
    about_me: &'a str,
    image_url: String,
}

impl<'a> ProfilePage<'a> {
    fn new(profile: &'a ProfileRecord) -> Self {
        Self {
            user_id: profile.id.to_string(),
            username: &profile.username,
            email: &profile.email,
            age: profile.age.map(|age| age.to_string()).unwrap_or_default(),
            gender: profile.gender.as_deref().unwrap_or_default(),
            height: profile
                .height
                .map(|height| height.to_string())
                .unwrap_or_default(),
            about_me: profile.about_me.as_deref().unwrap_or_default(),
            image_url: format!("/static/uploads/{}", profile.profile_image_name),
        }
    }
}

pub struct ProfileRoutes<D>(std::marker::PhantomData<D>);

impl<D> ProfileRoutes<D>
where
    D: ProfileRepo + AvatarStore + Sized + Clone + Send + Sync + 'static,
{
    pub fn router() -> axum::Router {
        axum::Router::new()
            .route("/", get(|| async { Redirect::to(PROFILE_PATH) }))
            .route(
                PROFILE_PATH,
                get(Self::show_profile).post(Self::update_current_profile),
            )
            .route("/update_profile", post(Self::update_profile))
    }

    async fn show_profile(Extension(deps): Extension<D>) -> ProfileResult<Html<String>> {
        let profile = profile::get_or_create_default(&deps).await?;
        let page = ProfilePage::new(&profile)
            .render()
            .context("failed to render profile page")?;

        Ok(Html(page))
    }

    async fn update_current_profile(
        Extension(deps): Extension<D>,
        multipart: Multipart,
    ) -> ProfileResult<Redirect> {
        let form = ProfileForm::from_multipart(multipart).await?;
        profile::update_current(&deps, form.fields, form.image).await?;

        Ok(Redirect::to(PROFILE_PATH))
    }

    async fn update_profile(
        Extension(deps): Extension<D>,
        multipart: Multipart,
    ) -> ProfileResult<Redirect> {
        let form = ProfileForm::from_multipart(multipart).await?;
        let id = form.user_id()?;

        match profile::update(&deps, id, form.fields, form.image).await {
            Ok(_) => {}
            Err(ProfileError::ProfileNotFound) => {
                tracing::debug!(profile_id = %id, "no profile to update");
            }
            Err(e) => return Err(e),
        }

        Ok(Redirect::to(PROFILE_PATH))
    }
}
