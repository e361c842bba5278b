pub mod app;
pub mod config;

mod form;
mod routes;

#[cfg(test)]
mod test_util;

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, Extension};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;

/// The complete HTTP application, including stored avatar files.
pub fn router(app: app::App) -> axum::Router {
    let upload_dir = ServeDir::new(app.avatars.path());
    let max_upload_bytes = app.config.max_upload_bytes;

    routes::profile_router::<app::App>()
        .nest_service("/static/uploads", upload_dir)
        .layer(
            ServiceBuilder::new()
                // Enables logging. Use `RUST_LOG=tower_http=debug`
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(Extension(app))
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

pub async fn serve(app: app::App) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(app.config.listen_addr)
        .await
        .with_context(|| format!("could not bind to {}", app.config.listen_addr))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(app))
        .await
        .context("error running HTTP server")
}
