//! Map yt-dlp error text to a fetch failure class.

use super::FetchErrorKind;

const RATE_LIMITED: &[&str] = &[
    "http error 429",
    "too many requests",
    "rate limit",
    "confirm you're not a bot",
    "confirm you’re not a bot",
    "try again later",
    "content isn't available",
    "content isn’t available",
];

const UNAVAILABLE: &[&str] = &[
    "private video",
    "video unavailable",
    "this video has been removed",
    "this video is no longer available",
    "members-only",
    "join this channel to get access",
    "sign in to confirm your age",
    "account associated with this video has been terminated",
    "copyright claim",
    "not available in your country",
];

const NETWORK: &[&str] = &[
    "http error 5",
    "timed out",
    "connection reset",
    "connection refused",
    "temporary failure in name resolution",
    "name or service not known",
    "unable to download webpage",
    "network is unreachable",
    "incompleteread",
];

/// Classify an error message. Rate limiting is checked first since YouTube's
/// bot check also mentions signing in.
pub fn classify_message(message: &str) -> FetchErrorKind {
    let lower = message.to_lowercase();
    let any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
    if any(RATE_LIMITED) {
        FetchErrorKind::RateLimited
    } else if any(UNAVAILABLE) {
        FetchErrorKind::Unavailable
    } else if any(NETWORK) {
        FetchErrorKind::Network
    } else {
        FetchErrorKind::Unknown
    }
}
