use crate::thumbnail;
use crate::THUMBNAIL_SIZE;
use profile_core::avatar::{self, AvatarStore, AvatarUpload};
use profile_core::error::{ProfileError, ProfileResult};

use anyhow::Context;
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// The directory avatars are stored in, flat, one file per avatar.
#[derive(Clone, Debug)]
pub struct AvatarDir {
    path: PathBuf,
}

impl AvatarDir {
    /// Open the upload directory, creating it and the default avatar if missing.
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = Self { path: path.into() };

        tokio::fs::create_dir_all(&dir.path)
            .await
            .with_context(|| format!("could not create upload dir {}", dir.path.display()))?;
        dir.ensure_default_avatar().await?;

        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_default_avatar(&self) -> anyhow::Result<()> {
        let path = self.path.join(avatar::DEFAULT_AVATAR);
        if tokio::fs::try_exists(&path).await? {
            return Ok(());
        }

        let placeholder = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            THUMBNAIL_SIZE,
            THUMBNAIL_SIZE,
            Rgb([200, 200, 200]),
        ));
        let bytes = thumbnail::encode(&placeholder, ImageFormat::Jpeg)?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("could not write {}", path.display()))?;
        tracing::info!("wrote placeholder avatar to {}", path.display());

        Ok(())
    }

    /// Resolve a stored file name, refusing anything but a plain file name.
    fn file_path(&self, file_name: &str) -> ProfileResult<PathBuf> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.path.join(name)),
            _ => Err(ProfileError::Storage(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a plain file name: {file_name:?}"),
            ))),
        }
    }
}

/// 16 hex characters from the thread-local CSPRNG.
fn random_stem() -> String {
    hex::encode(rand::random::<[u8; 8]>())
}

/// Write `bytes` to a file that must not exist yet. A partly written file is removed.
async fn write_new_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;

    let written = match file.write_all(bytes).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        drop(file);
        let _ = tokio::fs::remove_file(path).await;
    }
    written
}

#[async_trait]
impl AvatarStore for AvatarDir {
    async fn save_avatar(&self, upload: AvatarUpload) -> ProfileResult<String> {
        let AvatarUpload { file_name, bytes } = upload;

        let (encoded, ext) = tokio::task::spawn_blocking(move || {
            let thumbnail = thumbnail::make_thumbnail(&bytes)
                .map_err(|e| ProfileError::ImageDecode(Box::new(e)))?;
            let (format, ext) = thumbnail::output_format(&file_name, thumbnail.source_format);
            let encoded = thumbnail::encode(&thumbnail.image, format)
                .context("failed to encode avatar")?;

            Ok::<_, ProfileError>((encoded, ext))
        })
        .await
        .context("avatar processing task failed")??;

        let stored_name = format!("{}.{}", random_stem(), ext);
        let path = self.file_path(&stored_name)?;

        write_new_file(&path, &encoded).await?;
        tracing::debug!("stored avatar {}", path.display());

        Ok(stored_name)
    }

    async fn remove_avatar(&self, file_name: &str) -> ProfileResult<()> {
        if avatar::is_default(file_name) {
            return Ok(());
        }

        let path = self.file_path(file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("removed avatar {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("avatar {} was already gone", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
