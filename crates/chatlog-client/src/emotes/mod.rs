//! Third-party emote catalogs (7TV, BTTV, FFZ).
//!
//! Each provider is an adapter that knows its endpoints and how to
//! normalize its response into `(name, url)` pairs. The loader fetches
//! all providers concurrently and merges their contributions into one
//! [`EmoteCatalog`], later providers overriding earlier ones by name.

mod providers;

use std::collections::HashMap;

use futures_util::future::join_all;
use serde_json::Value;

use crate::endpoints::Endpoints;
use crate::source::{JsonSource, fetch_json};

pub use providers::{Bttv, Ffz, SevenTv, absolute_url, best_tier_url};

/// Where an emote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmoteSource {
    SevenTv,
    Bttv,
    Ffz,
}

impl EmoteSource {
    /// Default processing order. The last entry wins name collisions,
    /// giving 7TV > BTTV > FFZ.
    pub const DEFAULT_ORDER: [EmoteSource; 3] = [Self::Ffz, Self::Bttv, Self::SevenTv];

    /// Adapter for this source.
    pub fn provider(self) -> &'static dyn EmoteProvider {
        match self {
            Self::SevenTv => &SevenTv,
            Self::Bttv => &Bttv,
            Self::Ffz => &Ffz,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SevenTv => "7tv",
            Self::Bttv => "bttv",
            Self::Ffz => "ffz",
        }
    }
}

/// Common contract every emote provider adapter implements.
pub trait EmoteProvider: Sync {
    fn source(&self) -> EmoteSource;

    /// Channel-scoped catalog URL.
    fn channel_url(&self, endpoints: &Endpoints, channel_id: &str) -> String;

    /// Global catalog URL.
    fn global_url(&self, endpoints: &Endpoints) -> String;

    /// Turn a raw response into `(name, url)` pairs in provider order.
    fn normalize(&self, body: Value) -> Result<Vec<(String, String)>, serde_json::Error>;
}

/// Emote name -> image URL.
///
/// Names match exactly (case-sensitive), as the providers define them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmoteCatalog {
    emotes: HashMap<String, String>,
}

impl EmoteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an emote by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.emotes.get(name).map(String::as_str)
    }

    /// Insert or override an entry.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.emotes.insert(name.into(), url.into());
    }

    /// Merge `other` into `self`; entries of `other` win.
    pub fn merge(&mut self, other: EmoteCatalog) {
        self.emotes.extend(other.emotes);
    }

    pub fn len(&self) -> usize {
        self.emotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emotes.is_empty()
    }
}

impl Extend<(String, String)> for EmoteCatalog {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.emotes.extend(iter);
    }
}

impl FromIterator<(String, String)> for EmoteCatalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            emotes: iter.into_iter().collect(),
        }
    }
}

/// How the emote loader runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmoteOptions {
    /// Also load each provider's global catalog before its channel catalog.
    pub include_global: bool,
    /// Processing order; later providers override earlier ones.
    pub order: Vec<EmoteSource>,
}

impl Default for EmoteOptions {
    fn default() -> Self {
        Self {
            include_global: false,
            order: EmoteSource::DEFAULT_ORDER.to_vec(),
        }
    }
}

/// Build a fresh catalog for `channel_id`.
///
/// Providers are fetched concurrently and merged in `options.order`. A
/// provider that is unavailable contributes nothing.
pub async fn load_emotes(
    source: &impl JsonSource,
    endpoints: &Endpoints,
    channel_id: &str,
    options: &EmoteOptions,
) -> EmoteCatalog {
    let loads = options.order.iter().map(|kind| {
        load_provider(
            source,
            endpoints,
            kind.provider(),
            channel_id,
            options.include_global,
        )
    });
    let contributions = join_all(loads).await;

    let mut catalog = EmoteCatalog::new();
    for contribution in contributions {
        catalog.merge(contribution);
    }

    tracing::info!(count = catalog.len(), channel_id, "Emote catalog built");
    catalog
}

/// One provider's contribution. With `include_global` the channel
/// catalog is fetched only after the global one and overrides it.
async fn load_provider(
    source: &impl JsonSource,
    endpoints: &Endpoints,
    provider: &dyn EmoteProvider,
    channel_id: &str,
    include_global: bool,
) -> EmoteCatalog {
    let mut catalog = EmoteCatalog::new();

    if include_global {
        let url = provider.global_url(endpoints);
        if let Some(entries) = fetch_entries(source, provider, &url).await {
            catalog.extend(entries);
        }
    }

    let url = provider.channel_url(endpoints, channel_id);
    if let Some(entries) = fetch_entries(source, provider, &url).await {
        catalog.extend(entries);
    }

    catalog
}

async fn fetch_entries(
    source: &impl JsonSource,
    provider: &dyn EmoteProvider,
    url: &str,
) -> Option<Vec<(String, String)>> {
    let body: Value = fetch_json(source, url).await?;
    match provider.normalize(body) {
        Ok(entries) => {
            tracing::debug!(
                provider = provider.source().label(),
                count = entries.len(),
                "Fetched emotes"
            );
            Some(entries)
        }
        Err(e) => {
            tracing::warn!(
                provider = provider.source().label(),
                url,
                error = %e,
                "Unexpected emote response shape"
            );
            None
        }
    }
}
