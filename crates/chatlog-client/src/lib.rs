//! Chat log and emote catalog client library.
//!
//! Provides identity lookup, historical log loading, and the
//! 7TV / BTTV / FFZ emote and badge catalogs behind a pluggable
//! JSON source with fetch-with-fallback semantics.

pub mod badges;
pub mod emotes;
pub mod endpoints;
pub mod identity;
pub mod logs;
pub mod source;

pub use badges::{BadgeCatalog, MOD_BADGE_KEY, load_badges};
pub use emotes::{EmoteCatalog, EmoteOptions, EmoteSource, load_emotes};
pub use endpoints::Endpoints;
pub use identity::resolve_user_id;
pub use logs::{BadgeRef, ChatMessage, LogQuery, LogResult, load_logs};
pub use source::{HttpSource, JsonSource, MemoSource, StaticSource, fetch_json};

/// Why a single fetch produced no data.
///
/// Callers of [`fetch_json`] never see this; it is logged and collapsed
/// into `None` at the fetch boundary.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("earlier request to {url} failed")]
    EarlierFailure { url: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}
