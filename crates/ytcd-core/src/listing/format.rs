/// Format a duration in seconds as `M:SS` or `H:MM:SS`; `N/A` when missing or not positive.
pub fn format_duration(secs: Option<f64>) -> String {
    let Some(secs) = secs.filter(|s| *s > 0.0) else {
        return "N/A".to_string();
    };
    let total = secs as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
