//! Shared helper functions for CLI commands
//!
//! Small formatting utilities used by the report renderer and the batch
//! summary.

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a cycle time as minutes with the equivalent hours
pub fn format_minutes(minutes: f64) -> String {
    format!("{:.1} min ({:.2} h)", minutes, minutes / 60.0)
}

/// Format an optional value, or a dash when absent
pub fn format_optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Format a ratio in [0, 1] as a whole percentage
pub fn format_pct(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}
