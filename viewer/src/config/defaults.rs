//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

use chatlog_client::endpoints::{
    BTTV_API_BASE, FFZ_API_BASE, IVR_API_BASE, LOGS_API_BASE, SEVENTV_API_BASE,
};

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("LOG_LIMIT", "500", "Maximum number of log messages requested per load"),
    ("HTTP_TIMEOUT_SECS", "10", "Per-request HTTP timeout in seconds"),
    (
        "INCLUDE_GLOBAL_EMOTES",
        "false",
        "Load each provider's global emotes before its channel emotes",
    ),
    ("OUTPUT_PATH", "chat.html", "File the rendered chat page is written to"),
    ("IVR_API_BASE", IVR_API_BASE, "Identity lookup service base URL"),
    ("LOGS_API_BASE", LOGS_API_BASE, "Chat log service base URL"),
    ("SEVENTV_API_BASE", SEVENTV_API_BASE, "7TV API base URL"),
    ("BTTV_API_BASE", BTTV_API_BASE, "BetterTTV API base URL"),
    ("FFZ_API_BASE", FFZ_API_BASE, "FrankerFaceZ API base URL"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_setting;

    #[test]
    fn every_default_is_valid() {
        for def in DEFAULT_SETTINGS.values() {
            assert!(
                validate_setting(def.key, def.default).is_ok(),
                "default for {} is invalid",
                def.key
            );
        }
    }

    #[test]
    fn unknown_key_has_no_default() {
        assert_eq!(get_default("LOG_LIMIT"), Some("500"));
        assert_eq!(get_default("NOPE"), None);
    }
}
