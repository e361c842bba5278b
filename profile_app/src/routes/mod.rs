mod profile_routes;

use profile_core::avatar::AvatarStore;
use profile_core::profile::repo::ProfileRepo;

/// Axum router for the profile pages.
pub fn profile_router<D>() -> axum::Router
where
    D: ProfileRepo + AvatarStore + Clone + 'static,
{
    profile_routes::ProfileRoutes::<D>::router()
}
