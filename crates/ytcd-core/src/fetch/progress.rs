//! Line protocol for yt-dlp output while downloading.
//!
//! yt-dlp is run with `--newline --progress-template` so each progress
//! update is one line carrying a fixed marker, and with
//! `--print after_move:%()j` so the final info JSON is one line on stdout.

use crate::ytdlp::InfoJson;

const MARKER: &str = "ytcd-progress";

/// Value for `--progress-template`. Missing fields print as `NA`.
pub const PROGRESS_TEMPLATE: &str = concat!(
    "download:ytcd-progress %(progress.downloaded_bytes)s %(progress.total_bytes)s ",
    "%(progress.total_bytes_estimate)s %(progress.speed)s %(progress.eta)s"
);

/// One interpreted line of yt-dlp output.
#[derive(Debug)]
pub enum OutputLine {
    Progress {
        downloaded_bytes: u64,
        total_bytes: Option<u64>,
        speed: Option<f64>,
        eta: Option<u64>,
    },
    Info(Box<InfoJson>),
    Error(String),
    Other(String),
}

pub fn parse_line(line: &str) -> OutputLine {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix(MARKER) {
        if let Some(progress) = parse_progress(rest) {
            return progress;
        }
    }
    if trimmed.starts_with('{') {
        if let Ok(info) = serde_json::from_str::<InfoJson>(trimmed) {
            return OutputLine::Info(Box::new(info));
        }
    }
    if let Some(msg) = trimmed.strip_prefix("ERROR:") {
        return OutputLine::Error(msg.trim().to_string());
    }
    OutputLine::Other(trimmed.to_string())
}

fn parse_progress(rest: &str) -> Option<OutputLine> {
    let mut fields = rest.split_whitespace();
    let downloaded = number(fields.next()?)?;
    let total = fields.next().and_then(number);
    let estimate = fields.next().and_then(number);
    let speed = fields.next().and_then(number);
    let eta = fields.next().and_then(number);
    Some(OutputLine::Progress {
        downloaded_bytes: downloaded as u64,
        total_bytes: total.or(estimate).map(|v| v as u64),
        speed,
        eta: eta.map(|v| v as u64),
    })
}

fn number(field: &str) -> Option<f64> {
    if field == "NA" || field == "None" {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_line_with_all_fields() {
        match parse_line("ytcd-progress 1024 4096 NA 512.5 6") {
            OutputLine::Progress {
                downloaded_bytes,
                total_bytes,
                speed,
                eta,
            } => {
                assert_eq!(downloaded_bytes, 1024);
                assert_eq!(total_bytes, Some(4096));
                assert_eq!(speed, Some(512.5));
                assert_eq!(eta, Some(6));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn progress_falls_back_to_estimate() {
        match parse_line("ytcd-progress 10 NA 3000.0 NA NA") {
            OutputLine::Progress {
                total_bytes,
                speed,
                eta,
                ..
            } => {
                assert_eq!(total_bytes, Some(3000));
                assert_eq!(speed, None);
                assert_eq!(eta, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn info_error_and_other_lines() {
        match parse_line(r#"{"id": "abc", "title": "T", "filepath": "/d/abc.mp4"}"#) {
            OutputLine::Info(info) => assert_eq!(info.filepath.as_deref(), Some("/d/abc.mp4")),
            other => panic!("unexpected {other:?}"),
        }
        match parse_line("ERROR: [youtube] abc: Private video") {
            OutputLine::Error(msg) => assert_eq!(msg, "[youtube] abc: Private video"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            parse_line("[Merger] Merging formats into \"abc.mp4\""),
            OutputLine::Other(_)
        ));
        assert!(matches!(parse_line("ytcd-progress NA"), OutputLine::Other(_)));
    }
}
