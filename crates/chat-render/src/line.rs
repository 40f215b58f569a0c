//! One rendered block per chat message.

use chatlog_client::{BadgeCatalog, BadgeRef, ChatMessage, EmoteCatalog, LogResult, MOD_BADGE_KEY};
use maud::{Markup, html};

use crate::text::render_text;

/// Username color used when a message carries none (or an unusable one).
pub const DEFAULT_COLOR: &str = "#9147ff";

fn badge_img(name: &str, url: &str) -> Markup {
    html! {
        img class="badge" src=(url) alt=(name) title=(name);
    }
}

/// Catalog key a badge set key resolves through.
fn catalog_key(badge: &BadgeRef) -> Option<&str> {
    match badge.set_name() {
        "moderator" | "mod" => Some(MOD_BADGE_KEY),
        _ => None,
    }
}

/// Resolved `(name, url)` for a message badge reference.
fn resolve<'a>(badge: &'a BadgeRef, badges: &'a BadgeCatalog) -> Option<(&'a str, &'a str)> {
    match badge {
        BadgeRef::Inline { name, url } if !url.is_empty() => Some((name.as_str(), url.as_str())),
        _ => catalog_key(badge)
            .and_then(|key| badges.get(key))
            .map(|url| (badge.set_name(), url)),
    }
}

/// Badge markup for a message: its own references first, then the
/// author's per-user badge. Unresolved references are skipped.
pub fn render_badges(message: &ChatMessage, badges: &BadgeCatalog) -> Markup {
    let user_badge = message
        .user_id
        .as_deref()
        .and_then(|user_id| badges.get(user_id));

    html! {
        @for (name, url) in message.badges.iter().filter_map(|badge| resolve(badge, badges)) {
            (badge_img(name, url))
        }
        @if let Some(url) = user_badge {
            (badge_img("7tv", url))
        }
    }
}

/// `#rgb` / `#rrggbb`, otherwise [`DEFAULT_COLOR`].
fn css_color(color: Option<&str>) -> &str {
    color
        .map(str::trim)
        .filter(|c| {
            c.strip_prefix('#').is_some_and(|hex| {
                matches!(hex.len(), 3 | 6) && hex.chars().all(|ch| ch.is_ascii_hexdigit())
            })
        })
        .unwrap_or(DEFAULT_COLOR)
}

/// Render one chat line. System messages without text render nothing.
pub fn render_line(
    message: &ChatMessage,
    emotes: &EmoteCatalog,
    badges: &BadgeCatalog,
) -> Option<Markup> {
    let text = message.text.as_deref()?;
    let color = format!("color: {}", css_color(message.color.as_deref()));

    Some(html! {
        div class="chat-line" {
            @if let Some(ts) = message.timestamp {
                time datetime=(ts.to_rfc3339()) { (ts.format("%H:%M:%S").to_string()) }
            }
            span class="badges" { (render_badges(message, badges)) }
            span class="username" style=(color) { (message.author()) ":" }
            " "
            span class="message" { (render_text(text, emotes)) }
        }
    })
}

/// Render every message in delivered order, skipping system messages.
pub fn render_lines(logs: &LogResult, emotes: &EmoteCatalog, badges: &BadgeCatalog) -> Vec<String> {
    let lines: Vec<String> = logs
        .iter()
        .filter_map(|message| render_line(message, emotes, badges))
        .map(Markup::into_string)
        .collect();
    tracing::debug!(
        rendered = lines.len(),
        skipped = logs.len() - lines.len(),
        "Rendered chat lines"
    );
    lines
}
