use anyhow::{Result, anyhow};
use arboard::Clipboard;

/// Where copied names go. The app holds one for its whole lifetime.
pub trait ClipboardWriter {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard. Opened on first use and kept open, since on X11
/// the contents only live as long as the owning handle.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let clipboard = Clipboard::new().map_err(|e| anyhow!("Failed to open clipboard: {}", e))?;
            self.inner = Some(clipboard);
        }

        if let Some(clipboard) = self.inner.as_mut() {
            clipboard
                .set_text(text)
                .map_err(|e| anyhow!("Failed to write clipboard: {}", e))?;
            tracing::debug!("copied to clipboard");
        }
        Ok(())
    }
}
