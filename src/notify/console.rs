// src/notify/console.rs
use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use super::{Notice, NoticeLevel, Notifier};

/// Prints notices to stdout as one-line toasts for the interactive shell.
pub struct ConsoleNotifier;

pub fn toast_line(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
        NoticeLevel::Validation => "!",
    };
    format!("[{tag}] {}\n", notice.message)
}

#[async_trait::async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, notice: &Notice) -> Result<()> {
        let mut out = tokio::io::stdout();
        out.write_all(toast_line(notice).as_bytes())
            .await
            .context("write toast")?;
        out.flush().await.context("flush toast")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_tags_by_level() {
        assert_eq!(toast_line(&Notice::success("Analysis complete")), "[ok] Analysis complete\n");
        assert_eq!(toast_line(&Notice::validation("empty")), "[!] empty\n");
    }
}
