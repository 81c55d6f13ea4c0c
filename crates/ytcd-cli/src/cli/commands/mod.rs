//! CLI command handlers.

mod download;
mod list;

pub use download::{run_download, DownloadArgs};
pub use list::run_list;

use anyhow::Result;
use std::path::{Path, PathBuf};
use ytcd_core::cookies::validate_cookie_file;

/// Validate the cookie file if one was given.
fn checked_cookies(cookie_file: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(path) = cookie_file else {
        return Ok(None);
    };
    println!("Validating cookie file...");
    let path = validate_cookie_file(path)?;
    println!("✓ Cookie file validated: {}", path.display());
    Ok(Some(path))
}
