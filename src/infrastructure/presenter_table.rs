use std::io::Write;

use anyhow::{Context, anyhow};
use log::debug;

use crate::{LoadState, RepositoriesViewModel, Repository, StdResult};

const MISSING_DESCRIPTION: &str = "(no description)";

/// Renders the state of a [`RepositoriesViewModel`] as text rows.
pub struct TablePresenter<W: Write> {
    writer: W,
}

impl<W: Write> TablePresenter<W> {
    /// Creates a new `TablePresenter` writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the presenter and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Renders a load state transition.
    pub fn render_state(&mut self, state: &LoadState) -> StdResult<()> {
        match state {
            LoadState::Idle => Ok(()),
            LoadState::Loading => writeln!(self.writer, "Loading repositories...")
                .with_context(|| "Failed to render loading state"),
            LoadState::Success(repositories) => {
                writeln!(self.writer, "{} repositories", repositories.len())
                    .with_context(|| "Failed to render success state")
            }
            LoadState::Failed(message) => writeln!(self.writer, "Error: {message}")
                .with_context(|| "Failed to render failed state"),
        }
    }

    /// Renders one row per repository.
    pub fn render_rows(&mut self, repositories: &[Repository]) -> StdResult<()> {
        for repository in repositories {
            writeln!(
                self.writer,
                "{}\t{}",
                repository.name(),
                repository.description().unwrap_or(MISSING_DESCRIPTION)
            )
            .with_context(|| format!("Failed to render row of {repository}"))?;
        }

        Ok(())
    }

    /// Fetches the repositories of `username` and renders every transition
    /// until the fetch settles, then returns the terminal state.
    pub async fn run_until_settled(
        &mut self,
        view_model: &RepositoriesViewModel,
        username: &str,
    ) -> StdResult<LoadState> {
        let mut states = view_model.subscribe_load_state().await;
        let mut repositories = view_model.subscribe_repositories().await;
        let generation = view_model.fetch(username).await;
        debug!("Rendering fetch #{generation}");

        let settled = loop {
            let state = states
                .recv()
                .await
                .ok_or_else(|| anyhow!("Load state is no longer published"))?;
            // Repositories are published ahead of the state they belong to.
            while let Some(rows) = repositories.try_recv() {
                self.render_rows(&rows)?;
            }
            self.render_state(&state)?;
            if state.is_terminal() {
                break state;
            }
        };
        states.dispose();
        repositories.dispose();
        self.writer
            .flush()
            .with_context(|| "Failed to flush rendered output")?;

        Ok(settled)
    }
}
