use std::{collections::BTreeMap, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    ApiError, ApiResult, Generation, LoadState, Published, Repository, RepositorySource,
    Subscription, SupersessionPolicy,
};

/// A cancellable in-flight fetch.
struct RequestHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl RequestHandle {
    /// Cancels the fetch and drops its pending request.
    fn dispose(self) {
        self.token.cancel();
        self.task.abort();
    }
}

/// The in-flight fetches of a pipeline, keyed by generation.
#[derive(Default)]
struct RequestRegistry {
    latest_generation: Generation,
    handles: BTreeMap<Generation, RequestHandle>,
}

impl RequestRegistry {
    fn next_generation(&mut self) -> Generation {
        self.latest_generation += 1;

        self.latest_generation
    }

    fn track(&mut self, generation: Generation, handle: RequestHandle) {
        self.handles.insert(generation, handle);
    }

    fn release(&mut self, generation: Generation) {
        self.handles.remove(&generation);
    }

    fn cancel_all(&mut self) -> usize {
        let total_cancelled = self.handles.len();
        for handle in std::mem::take(&mut self.handles).into_values() {
            handle.dispose();
        }

        total_cancelled
    }
}

/// The state shared between a pipeline and its in-flight fetches.
struct PipelineState {
    repositories: Published<Vec<Repository>>,
    load_state: Published<LoadState>,
    requests: Mutex<RequestRegistry>,
}

impl PipelineState {
    /// Folds the result of a fetch into the published state.
    ///
    /// Runs under the registry lock, so a concurrent `cancel` either happens
    /// before (and the result is dropped) or after the whole delivery.
    async fn deliver(
        &self,
        generation: Generation,
        policy: SupersessionPolicy,
        token: &CancellationToken,
        result: ApiResult<Vec<Repository>>,
    ) {
        let mut requests = self.requests.lock().await;
        if token.is_cancelled() {
            debug!("Fetch #{generation}: result suppressed after cancellation");
            return;
        }
        requests.release(generation);
        if policy == SupersessionPolicy::DiscardStale && generation != requests.latest_generation {
            debug!(
                "Fetch #{generation}: stale result discarded, latest is #{}",
                requests.latest_generation
            );
            return;
        }

        match result {
            Ok(repositories) => {
                info!(
                    "Fetch #{generation}: loaded {} repositories",
                    repositories.len()
                );
                self.repositories.publish(repositories.clone()).await;
                self.load_state
                    .publish(LoadState::Success(repositories))
                    .await;
            }
            Err(error) => {
                warn!("Fetch #{generation}: failed: {error}");
                self.load_state
                    .publish(LoadState::Failed(error.user_message()))
                    .await;
            }
        }
    }
}

/// Loads the repositories of a user and exposes the fetch lifecycle as observable state.
///
/// Two channels are observable: the current repositories, and the current [`LoadState`].
/// Only the view model mutates them. Errors never escape: they end up as
/// [`LoadState::Failed`] and the view model stays usable.
pub struct RepositoriesViewModel {
    source: Arc<dyn RepositorySource>,
    policy: SupersessionPolicy,
    state: Arc<PipelineState>,
}

impl RepositoriesViewModel {
    /// Creates a new `RepositoriesViewModel` with the default supersession policy.
    pub fn new(source: Arc<dyn RepositorySource>) -> Self {
        Self::with_supersession_policy(source, SupersessionPolicy::default())
    }

    /// Creates a new `RepositoriesViewModel` with the given supersession policy.
    pub fn with_supersession_policy(
        source: Arc<dyn RepositorySource>,
        policy: SupersessionPolicy,
    ) -> Self {
        Self {
            source,
            policy,
            state: Arc::new(PipelineState {
                repositories: Published::new(vec![]),
                load_state: Published::new(LoadState::Idle),
                requests: Mutex::new(RequestRegistry::default()),
            }),
        }
    }

    /// Retrieves the supersession policy.
    pub fn supersession_policy(&self) -> SupersessionPolicy {
        self.policy
    }

    /// Starts fetching the repositories of `username`.
    ///
    /// `Loading` is published to every current subscriber before the request
    /// is issued. The result is published later, from a background task.
    pub async fn fetch(&self, username: &str) -> Generation {
        let mut requests = self.state.requests.lock().await;
        if self.policy == SupersessionPolicy::CancelPrevious {
            let total_cancelled = requests.cancel_all();
            if total_cancelled > 0 {
                debug!("Superseded {total_cancelled} in-flight fetches");
            }
        }
        let generation = requests.next_generation();
        info!("Fetch #{generation}: loading repositories of user '{username}'");
        self.state.load_state.publish(LoadState::Loading).await;

        let token = CancellationToken::new();
        let task = tokio::spawn(run_fetch(
            Arc::clone(&self.state),
            Arc::clone(&self.source),
            self.policy,
            username.to_string(),
            generation,
            token.clone(),
        ));
        requests.track(generation, RequestHandle { token, task });

        generation
    }

    /// Cancels every in-flight fetch and returns how many were cancelled.
    ///
    /// No transition from a cancelled fetch is published once this returns.
    /// The load state is left as is.
    pub async fn cancel(&self) -> usize {
        let mut requests = self.state.requests.lock().await;
        let total_cancelled = requests.cancel_all();
        if total_cancelled > 0 {
            warn!("Cancelled {total_cancelled} in-flight fetches");
        }

        total_cancelled
    }

    /// Retrieves the number of in-flight fetches.
    pub async fn in_flight(&self) -> usize {
        self.state.requests.lock().await.handles.len()
    }

    /// Retrieves the current load state.
    pub async fn load_state(&self) -> LoadState {
        self.state.load_state.get().await
    }

    /// Retrieves the repositories of the last successful fetch.
    pub async fn repositories(&self) -> Vec<Repository> {
        self.state.repositories.get().await
    }

    /// Subscribes to the load state transitions.
    pub async fn subscribe_load_state(&self) -> Subscription<LoadState> {
        self.state.load_state.subscribe().await
    }

    /// Subscribes to the repositories changes.
    pub async fn subscribe_repositories(&self) -> Subscription<Vec<Repository>> {
        self.state.repositories.subscribe().await
    }
}

impl Drop for RepositoriesViewModel {
    fn drop(&mut self) {
        if let Ok(mut requests) = self.state.requests.try_lock() {
            requests.cancel_all();
        }
    }
}

async fn run_fetch(
    state: Arc<PipelineState>,
    source: Arc<dyn RepositorySource>,
    policy: SupersessionPolicy,
    username: String,
    generation: Generation,
    token: CancellationToken,
) {
    let request =
        AssertUnwindSafe(async { source.get_user_repositories(&username).await }).catch_unwind();
    let result = tokio::select! {
        _ = token.cancelled() => {
            debug!("Fetch #{generation}: cancelled while in flight");
            return;
        }
        result = request => result.unwrap_or_else(|_panic| {
            error!("Fetch #{generation}: source panicked");
            Err(ApiError::Unknown)
        }),
    };
    state.deliver(generation, policy, &token, result).await;
}
