// ghx: search GitHub users and browse their repositories.

mod app;
mod cache;
mod config;
mod error;
mod github;
mod logging;
mod state;
mod ui;

use tracing::{error, info};

use crate::app::App;
use crate::config::Config;
use crate::github::GitHubClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = logging::init();

    let config = Config::from_env();
    info!(
        api_base = %config.api_base,
        per_page = config.repo_per_page,
        authenticated = config.is_authenticated(),
        "ghx starting"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let client = GitHubClient::new(&config)?;
    let mut app = App::new(&config, client, runtime.handle().clone());

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    if let Err(err) = &result {
        error!(error = %err, "application error");
    }
    info!("ghx exited");
    Ok(result?)
}
