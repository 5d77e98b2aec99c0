use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use clap::Parser;
use log::{debug, info, warn};

use github_repos::{
    ApiClientConfig, GITHUB_API_ENDPOINT, GitHubRepositoryService, HttpApiClient, LoadState,
    RepositoriesViewModel, ServiceRepositorySource, StdResult, SupersessionPolicy,
    TablePresenter,
};

/// Command line arguments for listing the repositories of a GitHub user
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// GitHub user whose repositories are listed
    #[arg(default_value = "airbnb")]
    username: String,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_BASE_URL", default_value = GITHUB_API_ENDPOINT)]
    api_base_url: String,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout_secs: u64,

    /// What happens to in-flight requests when a new fetch starts
    /// (cancel-previous, discard-stale, concurrent)
    #[arg(long, default_value_t = SupersessionPolicy::CancelPrevious)]
    supersession_policy: SupersessionPolicy,
}

#[tokio::main]
async fn main() -> StdResult<()> {
    env_logger::init();
    let args = Args::parse();
    debug!("Arguments: {args:?}");
    info!("Listing repositories of user '{}'", args.username);

    let view_model = build_view_model(&args)?;
    let mut presenter = TablePresenter::new(std::io::stdout());
    let settled = tokio::select! {
        settled = presenter.run_until_settled(&view_model, &args.username) => settled?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling the fetch");
            view_model.cancel().await;
            return Ok(());
        }
    };

    into_outcome(settled)
}

/// Turns the settled state of the fetch into the outcome of the command.
fn into_outcome(settled: LoadState) -> StdResult<()> {
    match settled {
        LoadState::Failed(message) => Err(anyhow!(message)),
        _ => Ok(()),
    }
}

fn build_view_model(args: &Args) -> StdResult<RepositoriesViewModel> {
    let config = ApiClientConfig::new(&args.api_base_url)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let client = Arc::new(HttpApiClient::try_new(config)?);
    let service = Arc::new(GitHubRepositoryService::try_new(client)?);

    Ok(RepositoriesViewModel::with_supersession_policy(
        Arc::new(ServiceRepositorySource::new(service)),
        args.supersession_policy,
    ))
}
