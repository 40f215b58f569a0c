//! Load orchestration: Idle -> Loading -> Rendered | Failed.
//!
//! One `load` resolves the channel (and optional user), fetches logs,
//! emotes and badges concurrently, renders, and writes into the view.
//! Loads may overlap; only the most recently started one commits.

#[cfg(test)]
mod tests;

use std::sync::{Mutex, MutexGuard, PoisonError};

use chatlog_client::logs::DEFAULT_LOG_LIMIT;
use chatlog_client::{
    EmoteOptions, Endpoints, JsonSource, LogQuery, MemoSource, load_badges, load_emotes,
    load_logs, resolve_user_id,
};

use crate::view::ChatView;

/// Shown when the load action is triggered without a channel.
pub const ENTER_CHANNEL: &str = "Enter a channel.";

/// User-visible reasons a load ends in [`ViewState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoadFailure {
    #[error("Channel not found.")]
    ChannelNotFound,

    #[error("No logs found.")]
    NoLogsFound,

    /// The view rejected the rendered page.
    #[error("Could not display chat logs.")]
    DisplayFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Rendered { lines: usize },
    Failed(LoadFailure),
}

/// Per-load knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub log_limit: usize,
    pub emotes: EmoteOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            log_limit: DEFAULT_LOG_LIMIT,
            emotes: EmoteOptions::default(),
        }
    }
}

struct Status {
    /// Bumped by every load that passes input validation.
    generation: u64,
    state: ViewState,
}

struct RenderedPage {
    title: String,
    lines: Vec<String>,
}

/// Drives loads against a [`JsonSource`] and writes into a [`ChatView`].
pub struct ViewController<S, V> {
    source: S,
    endpoints: Endpoints,
    options: LoadOptions,
    view: Mutex<V>,
    status: Mutex<Status>,
}

impl<S: JsonSource + Sync, V: ChatView> ViewController<S, V> {
    pub fn new(source: S, endpoints: Endpoints, options: LoadOptions, view: V) -> Self {
        Self {
            source,
            endpoints,
            options,
            view: Mutex::new(view),
            status: Mutex::new(Status {
                generation: 0,
                state: ViewState::Idle,
            }),
        }
    }

    pub fn state(&self) -> ViewState {
        lock(&self.status).state.clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run `f` against the view.
    pub fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        let mut view = lock(&self.view);
        f(&mut *view)
    }

    /// Perform one load for the given free-text inputs.
    ///
    /// Returns the controller state after this load. A load superseded by
    /// a newer one commits nothing and returns the state as it stands.
    /// Errors only come from writing into the view; the state is then
    /// `Failed(DisplayFailed)`.
    pub async fn load(&self, channel: &str, user: &str) -> Result<ViewState, anyhow::Error> {
        let Some(channel) = normalize_login(channel) else {
            self.with_view(|view| view.alert(ENTER_CHANNEL));
            return Ok(self.state());
        };
        let user = normalize_login(user);

        let generation = {
            let mut status = lock(&self.status);
            status.generation += 1;
            status.state = ViewState::Loading;
            status.generation
        };
        tracing::info!(generation, channel = %channel, user = ?user, "Loading chat logs");

        let outcome = self.fetch_and_render(&channel, user.as_deref()).await;
        self.commit(generation, outcome)
    }

    async fn fetch_and_render(
        &self,
        channel: &str,
        user: Option<&str>,
    ) -> Result<RenderedPage, LoadFailure> {
        // Emotes and badges both read the FFZ room; share one request.
        let source = MemoSource::new(&self.source);

        let channel_id = resolve_user_id(&source, &self.endpoints, channel)
            .await
            .ok_or(LoadFailure::ChannelNotFound)?;

        let mut query = LogQuery::channel(channel_id.as_str()).limit(self.options.log_limit);
        if let Some(login) = user {
            let user_id = resolve_user_id(&source, &self.endpoints, login)
                .await
                .ok_or(LoadFailure::NoLogsFound)?;
            query = query.user(user_id);
        }

        let (logs, emotes, badges) = tokio::join!(
            load_logs(&source, &self.endpoints, &query),
            load_emotes(&source, &self.endpoints, &channel_id, &self.options.emotes),
            load_badges(&source, &self.endpoints, &channel_id),
        );

        let logs = logs
            .filter(|logs| !logs.is_empty())
            .ok_or(LoadFailure::NoLogsFound)?;

        let title = match user {
            Some(login) => format!("{channel} / {login}"),
            None => channel.to_string(),
        };
        Ok(RenderedPage {
            title,
            lines: chat_render::render_lines(&logs, &emotes, &badges),
        })
    }

    fn commit(
        &self,
        generation: u64,
        outcome: Result<RenderedPage, LoadFailure>,
    ) -> Result<ViewState, anyhow::Error> {
        let mut status = lock(&self.status);
        if status.generation != generation {
            tracing::info!(
                generation,
                latest = status.generation,
                "Discarding superseded load"
            );
            return Ok(status.state.clone());
        }

        let mut view = lock(&self.view);
        let state = match outcome {
            Ok(page) => {
                if let Err(e) = view.show(&page.title, &page.lines) {
                    status.state = ViewState::Failed(LoadFailure::DisplayFailed);
                    return Err(e);
                }
                ViewState::Rendered {
                    lines: page.lines.len(),
                }
            }
            Err(failure) => {
                tracing::info!(generation, %failure, "Load failed");
                view.alert(&failure.to_string());
                ViewState::Failed(failure)
            }
        };

        status.state = state.clone();
        Ok(state)
    }
}

/// Trimmed, lower-cased login; `None` when blank.
fn normalize_login(input: &str) -> Option<String> {
    let login = input.trim().to_lowercase();
    (!login.is_empty()).then_some(login)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
