//! Cookie file validation for authenticated (e.g. Premium) downloads.
//!
//! Only the shape of the file is checked: it must exist, be a non-empty
//! readable text file, and start with the Netscape `#` comment header.
//! Whether the cookies are still valid is discovered by yt-dlp.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("cookie file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cookie path is not a file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("cookie file is empty: {}", .0.display())]
    Empty(PathBuf),
    #[error("cookie file is not readable: {}", .0.display())]
    Unreadable(PathBuf, #[source] io::Error),
    #[error("cookie file is not a valid text file: {}", .0.display())]
    NotText(PathBuf),
    #[error("cookie file does not appear to be in Netscape format: {}", .0.display())]
    NotNetscape(PathBuf),
}

/// Validate a Netscape-format cookie file and return its path.
pub fn validate_cookie_file(path: impl AsRef<Path>) -> Result<PathBuf, CookieError> {
    let path = path.as_ref().to_path_buf();

    let meta = match std::fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(CookieError::NotFound(path)),
        Err(e) => return Err(CookieError::Unreadable(path, e)),
    };
    if !meta.is_file() {
        return Err(CookieError::NotAFile(path));
    }
    if meta.len() == 0 {
        return Err(CookieError::Empty(path));
    }

    let file = File::open(&path).map_err(|e| CookieError::Unreadable(path.clone(), e))?;
    let mut first_line = String::new();
    match BufReader::new(file).read_line(&mut first_line) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::InvalidData => return Err(CookieError::NotText(path)),
        Err(e) => return Err(CookieError::Unreadable(path, e)),
    }
    if !first_line.trim().starts_with('#') {
        return Err(CookieError::NotNetscape(path));
    }

    Ok(path)
}
