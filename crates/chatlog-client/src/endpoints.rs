//! Upstream service base URLs and the request URLs built from them.

use url::Url;

use crate::FetchError;

pub const IVR_API_BASE: &str = "https://api.ivr.fi";
pub const LOGS_API_BASE: &str = "https://logs.ivr.fi";
pub const SEVENTV_API_BASE: &str = "https://7tv.io";
pub const BTTV_API_BASE: &str = "https://api.betterttv.net";
pub const FFZ_API_BASE: &str = "https://api.frankerfacez.com";

/// Base URLs of every upstream service the viewer talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    ivr_api: Url,
    logs_api: Url,
    seventv_api: Url,
    bttv_api: Url,
    ffz_api: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_bases(
            IVR_API_BASE,
            LOGS_API_BASE,
            SEVENTV_API_BASE,
            BTTV_API_BASE,
            FFZ_API_BASE,
        )
        .expect("built-in endpoint bases are valid URLs")
    }
}

impl Endpoints {
    /// Parse the five service bases.
    pub fn from_bases(
        ivr_api: &str,
        logs_api: &str,
        seventv_api: &str,
        bttv_api: &str,
        ffz_api: &str,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            ivr_api: Url::parse(ivr_api)?,
            logs_api: Url::parse(logs_api)?,
            seventv_api: Url::parse(seventv_api)?,
            bttv_api: Url::parse(bttv_api)?,
            ffz_api: Url::parse(ffz_api)?,
        })
    }

    /// Identity lookup by login name.
    pub fn user_lookup(&self, login: &str) -> String {
        build(&self.ivr_api, &["v2", "twitch", "user"], &[("login", login)])
    }

    /// Channel-wide log page.
    pub fn channel_logs(&self, channel_id: &str, limit: usize) -> String {
        let limit = limit.to_string();
        build(
            &self.logs_api,
            &["v2", "twitch", "channel", channel_id],
            &[("limit", &limit)],
        )
    }

    /// Log page for one user inside a channel.
    pub fn user_logs(&self, channel_id: &str, user_id: &str, limit: usize) -> String {
        let limit = limit.to_string();
        build(
            &self.logs_api,
            &["v2", "twitch", "user", user_id],
            &[("channel", channel_id), ("limit", &limit)],
        )
    }

    pub fn seventv_channel(&self, channel_id: &str) -> String {
        build(&self.seventv_api, &["v3", "users", "twitch", channel_id], &[])
    }

    pub fn seventv_global(&self) -> String {
        build(&self.seventv_api, &["v3", "emote-sets", "global"], &[])
    }

    /// Per-user badge assignments (7TV cosmetics).
    pub fn seventv_cosmetics(&self) -> String {
        build(
            &self.seventv_api,
            &["v2", "cosmetics"],
            &[("user_identifier", "twitch_id")],
        )
    }

    pub fn bttv_channel(&self, channel_id: &str) -> String {
        build(&self.bttv_api, &["3", "cached", "users", "twitch", channel_id], &[])
    }

    pub fn bttv_global(&self) -> String {
        build(&self.bttv_api, &["3", "cached", "emotes", "global"], &[])
    }

    /// FFZ room, carrying both the channel emote sets and the moderator badge.
    pub fn ffz_room(&self, channel_id: &str) -> String {
        build(&self.ffz_api, &["v1", "room", "id", channel_id], &[])
    }

    pub fn ffz_global(&self) -> String {
        build(&self.ffz_api, &["v1", "set", "global"], &[])
    }
}

/// Append path segments (percent-encoded) and query pairs to `base`.
fn build(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> String {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url.into()
}
