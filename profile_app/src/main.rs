use profile_app::{app::App, config::Config};

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::parse();
    let app = App::init(config).await?;

    profile_app::serve(app).await?;

    Ok(())
}
