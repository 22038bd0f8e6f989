//! In-memory list filters for the notes and content pages

use crate::models::{Content, ContentKind, Note, NoteKind};

fn matches_search(term: &str, fields: &[&str]) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&term))
}

/// Search box plus type tabs of the notes page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub search: String,
    /// `None` means all types
    pub kind: Option<NoteKind>,
}

impl NoteFilter {
    pub fn matches(&self, note: &Note) -> bool {
        matches_search(&self.search, &[note.title.as_str(), note.content.as_str()])
            && self.kind.map_or(true, |k| note.content_type == k)
    }

    pub fn apply<'a>(&self, notes: &'a [Note]) -> Vec<&'a Note> {
        notes.iter().filter(|n| self.matches(n)).collect()
    }
}

/// Completion state shown on content cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStatus {
    Completed,
    InProgress,
    NotStarted,
}

impl ContentStatus {
    pub fn of(content: &Content) -> Self {
        let progress = content.progress_percentage.unwrap_or(0.0);
        if content.is_completed.unwrap_or(false) {
            ContentStatus::Completed
        } else if progress > 0.0 {
            ContentStatus::InProgress
        } else {
            ContentStatus::NotStarted
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "completed" => Some(ContentStatus::Completed),
            "in_progress" => Some(ContentStatus::InProgress),
            "not_started" => Some(ContentStatus::NotStarted),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentStatus::Completed => "Completed",
            ContentStatus::InProgress => "In progress",
            ContentStatus::NotStarted => "Not started",
        }
    }
}

/// Search box plus type and status selects of the content page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub search: String,
    pub kind: Option<ContentKind>,
    pub status: Option<ContentStatus>,
}

impl ContentFilter {
    pub fn matches(&self, content: &Content) -> bool {
        matches_search(&self.search, &[content.title.as_str(), content.description.as_str()])
            && self.kind.map_or(true, |k| content.kind == k)
            && self.status.map_or(true, |s| ContentStatus::of(content) == s)
    }

    pub fn apply<'a>(&self, items: &'a [Content]) -> Vec<&'a Content> {
        items.iter().filter(|c| self.matches(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, title: &str, content: &str, kind: NoteKind) -> Note {
        Note {
            id,
            title: title.into(),
            content: content.into(),
            content_type: kind,
            class_id: None,
            content_id: None,
            user_id: Some(1),
            word_count: None,
            last_saved: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn content(
        id: i64,
        kind: ContentKind,
        completed: Option<bool>,
        progress: Option<f64>,
    ) -> Content {
        Content {
            id,
            title: format!("Item {}", id),
            description: "Intro to fossils".into(),
            kind,
            url: None,
            file_path: None,
            class_id: Some(1),
            is_completed: completed,
            progress_percentage: progress,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_note_filter() {
        let notes = vec![
            note(1, "Jurassic", "big lizards", NoteKind::General),
            note(2, "Cells", "Mitochondria notes", NoteKind::Apostila),
            note(3, "Clip", "T-Rex video", NoteKind::Video),
        ];

        let all = NoteFilter::default();
        assert_eq!(all.apply(&notes).len(), 3);

        let search = NoteFilter {
            search: "  MITO ".into(),
            kind: None,
        };
        assert_eq!(search.apply(&notes).iter().map(|n| n.id).collect::<Vec<_>>(), vec![2]);

        let typed = NoteFilter {
            search: String::new(),
            kind: Some(NoteKind::Video),
        };
        assert_eq!(typed.apply(&notes)[0].id, 3);
    }

    #[test]
    fn test_content_status() {
        assert_eq!(
            ContentStatus::of(&content(1, ContentKind::Video, Some(true), Some(40.0))),
            ContentStatus::Completed
        );
        assert_eq!(
            ContentStatus::of(&content(2, ContentKind::Video, Some(false), Some(40.0))),
            ContentStatus::InProgress
        );
        assert_eq!(
            ContentStatus::of(&content(3, ContentKind::Video, None, None)),
            ContentStatus::NotStarted
        );
        assert_eq!(ContentStatus::parse("in_progress"), Some(ContentStatus::InProgress));
        assert_eq!(ContentStatus::parse("all"), None);
    }

    #[test]
    fn test_content_filter() {
        let items = vec![
            content(1, ContentKind::Apostila, Some(true), Some(100.0)),
            content(2, ContentKind::Video, None, Some(20.0)),
            content(3, ContentKind::Link, None, None),
        ];

        let filter = ContentFilter {
            search: "fossil".into(),
            kind: None,
            status: Some(ContentStatus::NotStarted),
        };
        assert_eq!(filter.apply(&items)[0].id, 3);

        let filter = ContentFilter {
            kind: Some(ContentKind::Video),
            ..Default::default()
        };
        assert_eq!(filter.apply(&items).len(), 1);

        let filter = ContentFilter {
            search: "dinosaur".into(),
            ..Default::default()
        };
        assert!(filter.apply(&items).is_empty());
    }
}
