//! Tests for the download subcommand and exit codes.

use super::parse;
use crate::cli::{CliCommand, Outcome};

#[test]
fn cli_parse_download_defaults() {
    let cmd = parse(&["ytcd", "download", "https://www.youtube.com/@chan/videos"]);
    assert!(!cmd.verbose());
    match cmd {
        CliCommand::Download {
            channel_url,
            cookie_file,
            output_dir,
            dry_run,
            no_skip_existing,
            ..
        } => {
            assert_eq!(channel_url, "https://www.youtube.com/@chan/videos");
            assert!(cookie_file.is_none());
            assert!(output_dir.is_none());
            assert!(!dry_run);
            assert!(!no_skip_existing);
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_flags() {
    let cmd = parse(&[
        "ytcd",
        "download",
        "u",
        "-o",
        "/data/chan",
        "--dry-run",
        "--no-skip-existing",
        "--verbose",
    ]);
    assert!(cmd.verbose());
    match cmd {
        CliCommand::Download {
            output_dir,
            dry_run,
            no_skip_existing,
            ..
        } => {
            assert_eq!(output_dir.as_deref(), Some(std::path::Path::new("/data/chan")));
            assert!(dry_run);
            assert!(no_skip_existing);
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_skip_existing_last_flag_wins() {
    match parse(&["ytcd", "download", "u", "--no-skip-existing", "--skip-existing"]) {
        CliCommand::Download {
            skip_existing,
            no_skip_existing,
            ..
        } => {
            assert!(skip_existing);
            assert!(!no_skip_existing);
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn exit_codes() {
    assert_eq!(Outcome::Success.exit_code(), 0);
    assert_eq!(Outcome::Failed.exit_code(), 1);
    assert_eq!(Outcome::Interrupted.exit_code(), 130);
}
