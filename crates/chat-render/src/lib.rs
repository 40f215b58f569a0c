//! HTML rendering of logged chat with emote and badge substitution.
//!
//! Message text is split on whitespace; tokens that exactly match an
//! emote name become `<img>` elements, everything else is escaped by
//! `maud` on the way out.

pub mod line;
pub mod page;
pub mod text;

pub use line::{DEFAULT_COLOR, render_badges, render_line, render_lines};
pub use page::render_page;
pub use text::{Token, emote_img, render_text, tokenize};
