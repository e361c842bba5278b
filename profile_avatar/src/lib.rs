//! Avatar processing: every uploaded picture is center-cropped to a square
//! and scaled down to a [THUMBNAIL_SIZE] pixel thumbnail before it is stored.

pub mod crop;
pub mod dir;
pub mod thumbnail;

pub use dir::AvatarDir;

/// Width and height of every stored avatar, in pixels.
pub const THUMBNAIL_SIZE: u32 = 200;
