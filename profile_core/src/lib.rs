pub mod avatar;
pub mod error;
pub mod profile;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

/// Database identifier of a profile record.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ProfileId(pub i64);

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ProfileId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}
