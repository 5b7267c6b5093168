use anyhow::{Context, Result};
use std::{env, fs, path::PathBuf, process::Command};
use tracing::debug;

/// Opens a link with the configured command, or the system default.
pub fn open_url(url: &str, open_command: Option<&str>) -> Result<()> {
    debug!(url, ?open_command, "open url");
    match open_command {
        Some(cmd) => {
            Command::new(cmd)
                .arg(url)
                .spawn()
                .with_context(|| format!("failed to run {cmd}"))?;
        }
        None => open::that(url).with_context(|| format!("failed to open {url}"))?,
    }
    Ok(())
}

/// Writes a rendered page to the temp dir and opens it in the browser.
pub fn open_document(html: &str, open_command: Option<&str>) -> Result<PathBuf> {
    let path = env::temp_dir().join("snooze-cli-page.html");
    fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;
    open_url(&path.to_string_lossy(), open_command)?;
    Ok(path)
}
