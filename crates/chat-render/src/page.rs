//! Standalone HTML document wrapping rendered chat lines.

use maud::{DOCTYPE, PreEscaped, html};

const STYLE: &str = r#"
body { background: #18181b; color: #efeff1; font-family: Inter, Roobert, Helvetica, Arial, sans-serif; font-size: 14px; margin: 0; }
#chat { padding: 8px 12px; }
.chat-line { padding: 3px 0; line-height: 28px; word-wrap: break-word; }
.chat-line time { color: #adadb8; font-size: 12px; margin-right: 6px; }
.badge { height: 18px; vertical-align: middle; margin-right: 3px; }
.username { font-weight: 700; }
.emote { height: 28px; vertical-align: middle; }
"#;

/// Render a full page titled `title` containing `lines` in order.
///
/// `lines` must already be rendered markup; they are inserted as-is.
pub fn render_page(title: &str, lines: &[String]) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) " chat logs" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 class="channel" { (title) }
                div id="chat" {
                    @for line in lines {
                        (PreEscaped(line))
                    }
                }
            }
        }
    }
    .into_string()
}
