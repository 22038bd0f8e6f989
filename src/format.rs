//! Display Formatting
//!
//! Pure helpers that turn backend values into the strings the views show.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Rounded share of `completed` in `total`; 0 when `total` is 0
pub fn percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// Colour band of a progress percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTier {
    High,
    Medium,
    Low,
}

impl ProgressTier {
    pub fn of(percentage: f64) -> Self {
        if percentage >= 80.0 {
            ProgressTier::High
        } else if percentage >= 50.0 {
            ProgressTier::Medium
        } else {
            ProgressTier::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ProgressTier::High => "green",
            ProgressTier::Medium => "yellow",
            ProgressTier::Low => "red",
        }
    }
}

/// Parse the timestamp shapes the backend emits
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn format_with(raw: Option<&str>, pattern: &str) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => "N/A".to_string(),
        Some(s) => match parse_timestamp(s) {
            Some(dt) => dt.format(pattern).to_string(),
            None => "Invalid date".to_string(),
        },
    }
}

/// `dd/mm/yyyy`
pub fn format_date(raw: Option<&str>) -> String {
    format_with(raw, "%d/%m/%Y")
}

/// `dd/mm/yyyy HH:MM`
pub fn format_datetime(raw: Option<&str>) -> String {
    format_with(raw, "%d/%m/%Y %H:%M")
}

/// "Just now", "5h ago", "3d ago"
pub fn relative_time(raw: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(raw) else {
        return "Invalid date".to_string();
    };
    let hours = (now.naive_utc() - then).num_hours();
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", hours / 24)
    }
}

/// Cut `text` to `max` characters, appending `...` when shortened
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}

/// Note/content card preview
pub fn preview(text: &str) -> String {
    truncate(text, 100)
}

/// Extension after the last dot, empty for none or dotfiles
pub fn file_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(0) | None => "",
        Some(pos) => &filename[pos + 1..],
    }
}

/// Broad file category used to pick an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Spreadsheet,
    Presentation,
    Image,
    Video,
    Audio,
    Other,
}

impl FileKind {
    pub fn of(filename: &str) -> Self {
        match file_extension(filename).to_lowercase().as_str() {
            "pdf" | "doc" | "docx" => FileKind::Document,
            "xls" | "xlsx" => FileKind::Spreadsheet,
            "ppt" | "pptx" => FileKind::Presentation,
            "jpg" | "jpeg" | "png" | "gif" => FileKind::Image,
            "mp4" | "avi" | "mov" => FileKind::Video,
            "mp3" | "wav" => FileKind::Audio,
            _ => FileKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(ProgressTier::of(80.0), ProgressTier::High);
        assert_eq!(ProgressTier::of(79.9), ProgressTier::Medium);
        assert_eq!(ProgressTier::of(50.0), ProgressTier::Medium);
        assert_eq!(ProgressTier::of(10.0), ProgressTier::Low);
    }

    #[test]
    fn test_dates() {
        assert_eq!(format_date(Some("2024-03-09T14:05:00.000Z")), "09/03/2024");
        assert_eq!(format_datetime(Some("2024-03-09 14:05:00")), "09/03/2024 14:05");
        assert_eq!(format_date(Some("2024-12-31")), "31/12/2024");
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("  ")), "N/A");
        assert_eq!(format_date(Some("yesterday")), "Invalid date");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(relative_time("2024-03-10T11:30:00Z", now), "Just now");
        assert_eq!(relative_time("2024-03-10T07:00:00Z", now), "5h ago");
        assert_eq!(relative_time("2024-03-07T12:00:00Z", now), "3d ago");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ação rápida", 4), "ação...");
        assert_eq!(preview(&"x".repeat(100)), "x".repeat(100));
        assert_eq!(preview(&"x".repeat(101)).len(), 103);
    }

    #[test]
    fn test_files() {
        assert_eq!(file_extension("aula.PDF"), "PDF");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension(".bashrc"), "");
        assert_eq!(file_extension("README"), "");
        assert_eq!(FileKind::of("aula.PDF"), FileKind::Document);
        assert_eq!(FileKind::of("clip.mov"), FileKind::Video);
        assert_eq!(FileKind::of("data.csv"), FileKind::Other);
    }
}
