use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(clap::Parser, Clone, Debug)]
pub struct Config {
    /// sqlx connection string of the profile database.
    #[clap(long, env, default_value = "sqlite:site.db")]
    pub database_url: String,

    /// Directory holding avatar images, served under `/static/uploads`.
    #[clap(long, env, default_value = "static/uploads")]
    pub upload_dir: PathBuf,

    #[clap(long, env, default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// Largest accepted request body, avatar included.
    #[clap(long, env, default_value = "10485760")]
    pub max_upload_bytes: usize,
}
