//! Message text tokenization and emote substitution.

use chatlog_client::EmoteCatalog;
use maud::{Markup, html};

/// A piece of message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A run of whitespace, kept verbatim.
    Space(&'a str),
    /// A maximal run of non-whitespace characters.
    Word(&'a str),
}

/// Split `text` into alternating word and whitespace runs.
///
/// Concatenating the tokens reproduces `text` exactly.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                tokens.push(token(&text[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if let Some(space) = in_space {
        tokens.push(token(&text[start..], space));
    }
    tokens
}

fn token(s: &str, space: bool) -> Token<'_> {
    if space { Token::Space(s) } else { Token::Word(s) }
}

/// `<img>` markup for one emote.
pub fn emote_img(name: &str, url: &str) -> Markup {
    html! {
        img class="emote" src=(url) alt=(name) title=(name);
    }
}

/// Render message text with emotes substituted and all other text escaped.
pub fn render_text(text: &str, emotes: &EmoteCatalog) -> Markup {
    html! {
        @for token in tokenize(text) {
            @match token {
                Token::Space(space) => { (space) }
                Token::Word(word) => {
                    @if let Some(url) = emotes.get(word) {
                        (emote_img(word, url))
                    } @else {
                        (word)
                    }
                }
            }
        }
    }
}
