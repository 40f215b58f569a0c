//! Badge catalog: per-user 7TV badges plus the channel's FFZ moderator badge.

use std::collections::HashMap;

use serde::Deserialize;

use crate::emotes::{absolute_url, best_tier_url};
use crate::endpoints::Endpoints;
use crate::source::{JsonSource, fetch_json};

/// Catalog key of the channel moderator badge.
pub const MOD_BADGE_KEY: &str = "mod";

/// Badge key (user id, or [`MOD_BADGE_KEY`]) -> image URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeCatalog {
    badges: HashMap<String, String>,
}

impl BadgeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.badges.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, url: impl Into<String>) {
        self.badges.insert(key.into(), url.into());
    }

    /// Channel moderator badge, if the channel has one.
    pub fn moderator(&self) -> Option<&str> {
        self.get(MOD_BADGE_KEY)
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct Cosmetics {
    #[serde(default)]
    badges: Vec<CosmeticBadge>,
}

#[derive(Debug, Deserialize)]
struct CosmeticBadge {
    /// `[[tier, url], ...]`
    #[serde(default)]
    urls: Vec<(String, String)>,
    #[serde(default)]
    users: Vec<String>,
}

impl CosmeticBadge {
    fn best_url(&self) -> Option<&str> {
        self.urls
            .iter()
            .filter(|(_, url)| !url.is_empty())
            .max_by_key(|(tier, _)| tier.parse::<u32>().unwrap_or(0))
            .map(|(_, url)| url.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct FfzRoomResponse {
    room: FfzRoom,
}

#[derive(Debug, Deserialize)]
struct FfzRoom {
    #[serde(default)]
    moderator_badge: Option<String>,
    #[serde(default)]
    mod_urls: Option<HashMap<String, Option<String>>>,
}

impl FfzRoom {
    fn moderator_badge_url(&self) -> Option<String> {
        self.mod_urls
            .as_ref()
            .and_then(best_tier_url)
            .or_else(|| {
                self.moderator_badge
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .map(absolute_url)
            })
    }
}

/// Build a fresh badge catalog for `channel_id`.
///
/// Both sources are fetched concurrently; either one failing leaves
/// its entries out.
pub async fn load_badges(
    source: &impl JsonSource,
    endpoints: &Endpoints,
    channel_id: &str,
) -> BadgeCatalog {
    let cosmetics_url = endpoints.seventv_cosmetics();
    let room_url = endpoints.ffz_room(channel_id);
    let (cosmetics, room) = tokio::join!(
        fetch_json::<Cosmetics>(source, &cosmetics_url),
        fetch_json::<FfzRoomResponse>(source, &room_url),
    );

    let mut catalog = BadgeCatalog::new();

    if let Some(cosmetics) = cosmetics {
        for badge in &cosmetics.badges {
            let Some(url) = badge.best_url() else {
                continue;
            };
            for user_id in &badge.users {
                catalog.insert(user_id.clone(), url);
            }
        }
    }

    if let Some(url) = room.and_then(|resp| resp.room.moderator_badge_url()) {
        catalog.insert(MOD_BADGE_KEY, url);
    }

    tracing::info!(count = catalog.len(), channel_id, "Badge catalog built");
    catalog
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::StaticSource;

    #[tokio::test]
    async fn merges_user_badges_and_moderator_badge() {
        let ep = Endpoints::default();
        let source = StaticSource::new()
            .with(
                ep.seventv_cosmetics(),
                json!({
                    "badges": [{
                        "id": "b",
                        "name": "Subscriber",
                        "urls": [["1", "https://cdn.7tv.app/badge/b/1x"], ["3", "https://cdn.7tv.app/badge/b/3x"]],
                        "users": ["100", "200"]
                    }]
                }),
            )
            .with(
                ep.ffz_room("1"),
                json!({ "room": { "moderator_badge": "//cdn.ffz/mod/1", "mod_urls": null }, "sets": {} }),
            );

        let catalog = load_badges(&source, &ep, "1").await;

        assert_eq!(catalog.get("100"), Some("https://cdn.7tv.app/badge/b/3x"));
        assert_eq!(catalog.get("200"), Some("https://cdn.7tv.app/badge/b/3x"));
        assert_eq!(catalog.moderator(), Some("https://cdn.ffz/mod/1"));
        assert_eq!(catalog.len(), 3);
    }

    #[tokio::test]
    async fn tiered_mod_urls_win_over_plain_badge() {
        let ep = Endpoints::default();
        let source = StaticSource::new().with(
            ep.ffz_room("1"),
            json!({
                "room": {
                    "moderator_badge": "//cdn.ffz/mod/1",
                    "mod_urls": { "1": "//cdn.ffz/mod/1", "4": "//cdn.ffz/mod/4" }
                }
            }),
        );

        let catalog = load_badges(&source, &ep, "1").await;
        assert_eq!(catalog.moderator(), Some("https://cdn.ffz/mod/4"));
    }

    #[tokio::test]
    async fn failed_sources_leave_catalog_empty() {
        let ep = Endpoints::default();
        let source = StaticSource::new().with_status(ep.seventv_cosmetics(), 503);

        let catalog = load_badges(&source, &ep, "1").await;
        assert!(catalog.is_empty());
    }
}
