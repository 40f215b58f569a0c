use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::*;

const SEVENTV_CDN: &str = "https://cdn.7tv.app/emote";
const BTTV_CDN: &str = "https://cdn.betterttv.net/emote";

/// Resolution tiers in preference order, highest first.
const TIER_PREFERENCE: [&str; 3] = ["4", "2", "1"];

/// Pick the URL of the highest preferred tier that has a non-empty value.
pub fn best_tier_url(urls: &HashMap<String, Option<String>>) -> Option<String> {
    TIER_PREFERENCE
        .iter()
        .filter_map(|tier| urls.get(*tier).and_then(|url| url.as_deref()))
        .find(|url| !url.is_empty())
        .map(absolute_url)
}

/// Decode each raw catalog entry on its own; entries that do not fit are
/// left out.
fn decode_entries<T: DeserializeOwned>(source: EmoteSource, raw: Vec<Value>) -> Vec<T> {
    raw.into_iter()
        .filter_map(|entry| match serde_json::from_value::<T>(entry) {
            Ok(emote) => Some(emote),
            Err(e) => {
                tracing::debug!(provider = source.label(), error = %e, "Skipping malformed emote");
                None
            }
        })
        .collect()
}

/// Expand protocol-relative URLs (`//host/path`) to `https://host/path`.
pub fn absolute_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

// ---------------------------------------------------------------------------
// 7TV
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SevenTvEmoteSet {
    #[serde(default)]
    emotes: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SevenTvEmote {
    id: String,
    name: String,
}

/// 7TV: `emote_set.emotes[] {name, id}` on the user endpoint, the bare
/// set on the global endpoint.
#[derive(Debug, Clone, Copy)]
pub struct SevenTv;

impl EmoteProvider for SevenTv {
    fn source(&self) -> EmoteSource {
        EmoteSource::SevenTv
    }

    fn channel_url(&self, endpoints: &Endpoints, channel_id: &str) -> String {
        endpoints.seventv_channel(channel_id)
    }

    fn global_url(&self, endpoints: &Endpoints) -> String {
        endpoints.seventv_global()
    }

    fn normalize(&self, body: Value) -> Result<Vec<(String, String)>, serde_json::Error> {
        let set: Option<SevenTvEmoteSet> = match body {
            Value::Object(mut user) if user.contains_key("emote_set") => {
                serde_json::from_value(user.remove("emote_set").unwrap_or(Value::Null))?
            }
            set => Some(serde_json::from_value(set)?),
        };

        let raw = set.map(|set| set.emotes).unwrap_or_default();
        Ok(decode_entries::<SevenTvEmote>(self.source(), raw)
            .into_iter()
            .map(|e| {
                let url = format!("{SEVENTV_CDN}/{}/3x.webp", e.id);
                (e.name, url)
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// BTTV
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BttvEmote {
    id: String,
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BttvResponse {
    Global(Vec<Value>),
    #[serde(rename_all = "camelCase")]
    Channel {
        #[serde(default)]
        channel_emotes: Vec<Value>,
        #[serde(default)]
        shared_emotes: Vec<Value>,
    },
}

/// BTTV: `channelEmotes[]` then `sharedEmotes[]` of `{code, id}`; the
/// global endpoint is a bare list.
#[derive(Debug, Clone, Copy)]
pub struct Bttv;

impl EmoteProvider for Bttv {
    fn source(&self) -> EmoteSource {
        EmoteSource::Bttv
    }

    fn channel_url(&self, endpoints: &Endpoints, channel_id: &str) -> String {
        endpoints.bttv_channel(channel_id)
    }

    fn global_url(&self, endpoints: &Endpoints) -> String {
        endpoints.bttv_global()
    }

    fn normalize(&self, body: Value) -> Result<Vec<(String, String)>, serde_json::Error> {
        let emotes = match serde_json::from_value::<BttvResponse>(body)? {
            BttvResponse::Global(emotes) => emotes,
            BttvResponse::Channel {
                mut channel_emotes,
                shared_emotes,
            } => {
                channel_emotes.extend(shared_emotes);
                channel_emotes
            }
        };

        Ok(decode_entries::<BttvEmote>(self.source(), emotes)
            .into_iter()
            .map(|e| {
                let url = format!("{BTTV_CDN}/{}/3x", e.id);
                (e.code, url)
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// FFZ
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfzSets {
    /// Present on the global endpoint only: the sets every user sees.
    /// The remaining global sets are restricted to the users listed
    /// under `users`.
    #[serde(default)]
    default_sets: Option<Vec<u64>>,
    #[serde(default)]
    sets: BTreeMap<String, FfzSet>,
}

#[derive(Debug, Deserialize)]
struct FfzSet {
    #[serde(default)]
    emoticons: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct FfzEmote {
    name: String,
    #[serde(default)]
    urls: HashMap<String, Option<String>>,
}

/// FFZ: `sets{*}.emoticons[] {name, urls}` with tiered URLs, shared by the
/// room and global endpoints. Global responses are narrowed to
/// `default_sets`.
#[derive(Debug, Clone, Copy)]
pub struct Ffz;

impl EmoteProvider for Ffz {
    fn source(&self) -> EmoteSource {
        EmoteSource::Ffz
    }

    fn channel_url(&self, endpoints: &Endpoints, channel_id: &str) -> String {
        endpoints.ffz_room(channel_id)
    }

    fn global_url(&self, endpoints: &Endpoints) -> String {
        endpoints.ffz_global()
    }

    fn normalize(&self, body: Value) -> Result<Vec<(String, String)>, serde_json::Error> {
        let resp: FfzSets = serde_json::from_value(body)?;

        // Set ids are numeric; keep them in numeric order.
        let mut sets: Vec<(u64, FfzSet)> = resp
            .sets
            .into_iter()
            .map(|(id, set)| (id.parse::<u64>().unwrap_or(u64::MAX), set))
            .collect();
        sets.sort_by_key(|(id, _)| *id);
        if let Some(defaults) = &resp.default_sets {
            sets.retain(|(id, _)| defaults.contains(id));
        }

        let raw = sets.into_iter().flat_map(|(_, set)| set.emoticons).collect();
        Ok(decode_entries::<FfzEmote>(self.source(), raw)
            .into_iter()
            .filter_map(|e| best_tier_url(&e.urls).map(|url| (e.name, url)))
            .collect())
    }
}
