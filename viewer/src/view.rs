//! Display regions the controller writes into.

use std::path::PathBuf;

use anyhow::Context;

/// Where rendered chat and user-visible messages go.
pub trait ChatView {
    /// Replace the region's content with `lines`, in order.
    fn show(&mut self, title: &str, lines: &[String]) -> Result<(), anyhow::Error>;

    /// Surface a user-visible message without touching the content.
    fn alert(&mut self, message: &str);
}

/// Writes a standalone HTML page to a file; alerts go to stderr.
#[derive(Debug, Clone)]
pub struct HtmlFileView {
    path: PathBuf,
}

impl HtmlFileView {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChatView for HtmlFileView {
    fn show(&mut self, title: &str, lines: &[String]) -> Result<(), anyhow::Error> {
        let page = chat_render::render_page(title, lines);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, page)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), lines = lines.len(), "Wrote chat page");
        println!("{} chat lines written to {}", lines.len(), self.path.display());
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_page_and_creates_parent() {
        let dir = std::env::temp_dir().join(format!("chatlog-viewer-test-{}", std::process::id()));
        let path = dir.join("nested").join("chat.html");
        let mut view = HtmlFileView::new(&path);

        view.show("shroud", &["<div class=\"chat-line\">hi</div>".to_string()])
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<div class=\"chat-line\">hi</div>"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
