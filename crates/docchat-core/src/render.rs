//! Formatting helpers shared by every view.
//!
//! These never fail: dates and scores come from the backend in whatever shape
//! the indexer produced, so malformed input degrades to an empty string, the
//! raw input, or a zero sort key.

use std::cmp::{Ordering, Reverse};

use chrono::{DateTime, Local, Utc};

use crate::search::DocumentRef;

const MISSING_FILE_NAME: &str = "파일명 없음";
const MISSING_GRADE: &str = "미지정";

/// Formats `YYYY-MM-DD` as `YYYY년 M월 D일`.
///
/// Empty input yields an empty string. Anything that is not three
/// dash-separated parts with numeric month and day is returned unchanged.
pub fn format_date_korean(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() != 3 {
        return date.to_string();
    }

    let (Ok(month), Ok(day)) = (parts[1].trim().parse::<u32>(), parts[2].trim().parse::<u32>())
    else {
        return date.to_string();
    };

    format!("{}년 {}월 {}일", parts[0], month, day)
}

/// Derives a numeric `YYYYMMDD` key from a date string.
///
/// Non-digits are stripped first. Six or seven digits are read as a year,
/// a single month digit and a one- or two-digit day, each zero-padded.
/// Eight or more digits use the first eight. Anything shorter is 0.
pub fn sortable_date_num(date: &str) -> u64 {
    let mut digits: String = date.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 6 || digits.len() == 7 {
        let year = &digits[..4];
        let month = &digits[4..5];
        let day = &digits[5..];
        digits = format!("{}{:0>2}{:0>2}", year, month, day);
    }

    if digits.len() < 8 {
        return 0;
    }

    digits[..8].parse().unwrap_or(0)
}

/// Parses an accuracy string such as `"87.5%"`.
pub fn accuracy_value(accuracy: &str) -> Option<f64> {
    let trimmed = accuracy.trim().trim_end_matches('%').trim();
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Sorts documents by accuracy, highest first.
///
/// The sort is stable; documents whose accuracy does not parse keep their
/// relative order at the end.
pub fn sort_by_accuracy(documents: &mut [DocumentRef]) {
    documents.sort_by(|a, b| match (a.accuracy_value(), b.accuracy_value()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Sorts documents by date, newest first. Undated documents go last.
pub fn sort_by_date(documents: &mut [DocumentRef]) {
    documents.sort_by_key(|document| Reverse(document.date_sort_key()));
}

pub fn display_file_name(document: &DocumentRef) -> &str {
    if document.file_name.is_empty() {
        MISSING_FILE_NAME
    } else {
        &document.file_name
    }
}

pub fn display_grade(document: &DocumentRef) -> &str {
    if document.grade.is_empty() {
        MISSING_GRADE
    } else {
        &document.grade
    }
}

/// Header line above the document list.
pub fn result_count_line(count: usize) -> String {
    format!("🔎 총 {}건 검색됨", count)
}

/// Local `YYYY-MM-DD HH:MM` rendering used in history tooltips.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Shortens `text` to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max_chars).collect();
    shortened.push('…');
    shortened
}

/// A one-line notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Destination for copied text (system clipboard, terminal escape, test buffer).
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> std::io::Result<()>;
}

/// Copies a document path and reports the result as a toast.
pub fn copy_path(path: Option<&str>, clipboard: &mut dyn ClipboardSink) -> Toast {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return Toast::new("❌ 복사할 경로가 없습니다.");
    };

    match clipboard.write_text(path) {
        Ok(()) => Toast::new("📋 경로가 복사되었습니다!"),
        Err(e) => {
            tracing::error!("Failed to copy path {}: {}", path, e);
            Toast::new("❌ 복사 실패")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BufferClipboard {
        contents: Option<String>,
        fail: bool,
    }

    impl ClipboardSink for BufferClipboard {
        fn write_text(&mut self, text: &str) -> std::io::Result<()> {
            if self.fail {
                return Err(std::io::Error::other("clipboard unavailable"));
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    fn doc(file_name: &str, accuracy: &str) -> DocumentRef {
        DocumentRef {
            file_name: file_name.to_string(),
            accuracy: accuracy.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_date_korean() {
        assert_eq!(format_date_korean("2024-03-05"), "2024년 3월 5일");
        assert_eq!(format_date_korean("2023-12-31"), "2023년 12월 31일");
    }

    #[test]
    fn test_format_date_korean_malformed() {
        assert_eq!(format_date_korean(""), "");
        assert_eq!(format_date_korean("20240305"), "20240305");
        assert_eq!(format_date_korean("2024-xx-05"), "2024-xx-05");
    }

    #[test]
    fn test_sortable_date_num() {
        assert_eq!(sortable_date_num("20240305"), 20240305);
        assert_eq!(sortable_date_num("2024-03-05"), 20240305);
        assert_eq!(sortable_date_num("2024.03.05 10:00"), 20240305);
    }

    #[test]
    fn test_sortable_date_num_short_forms() {
        // year + one month digit + one or two day digits
        assert_eq!(sortable_date_num("202435"), 20240305);
        assert_eq!(sortable_date_num("2024315"), 20240315);
    }

    #[test]
    fn test_sortable_date_num_malformed() {
        assert_eq!(sortable_date_num(""), 0);
        assert_eq!(sortable_date_num("2024"), 0);
        assert_eq!(sortable_date_num("no digits"), 0);
    }

    #[test]
    fn test_accuracy_value() {
        assert_eq!(accuracy_value("87.5%"), Some(87.5));
        assert_eq!(accuracy_value(" 12 "), Some(12.0));
        assert_eq!(accuracy_value(""), None);
        assert_eq!(accuracy_value("high"), None);
    }

    #[test]
    fn test_sort_by_accuracy() {
        let mut documents = vec![
            doc("low", "10%"),
            doc("unknown", ""),
            doc("high", "95.2%"),
            doc("mid", "50%"),
        ];

        sort_by_accuracy(&mut documents);

        let names: Vec<&str> = documents.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low", "unknown"]);
    }

    #[test]
    fn test_display_fallbacks() {
        let empty = DocumentRef::default();
        assert_eq!(display_file_name(&empty), "파일명 없음");
        assert_eq!(display_grade(&empty), "미지정");
    }

    #[test]
    fn test_sort_by_date_newest_first() {
        let doc = |name: &str, date: &str| DocumentRef {
            file_name: name.to_string(),
            date: date.to_string(),
            ..Default::default()
        };
        let mut documents = vec![
            doc("old", "2023-01-09"),
            doc("undated", ""),
            doc("new", "20240305"),
            doc("mid", "2023-12-31"),
        ];

        sort_by_date(&mut documents);

        let names: Vec<&str> = documents.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["new", "mid", "old", "undated"]);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("짧은 질문", 10), "짧은 질문");
        assert_eq!(truncate_chars("abcdef", 3), "abc…");
    }

    #[test]
    fn test_copy_path() {
        let mut clipboard = BufferClipboard {
            contents: None,
            fail: false,
        };

        let toast = copy_path(Some("/docs/a.pdf"), &mut clipboard);
        assert_eq!(toast.message, "📋 경로가 복사되었습니다!");
        assert_eq!(clipboard.contents.as_deref(), Some("/docs/a.pdf"));
    }

    #[test]
    fn test_copy_path_missing_or_failing() {
        let mut clipboard = BufferClipboard {
            contents: None,
            fail: false,
        };
        assert_eq!(
            copy_path(None, &mut clipboard).message,
            "❌ 복사할 경로가 없습니다."
        );
        assert_eq!(
            copy_path(Some(""), &mut clipboard).message,
            "❌ 복사할 경로가 없습니다."
        );

        clipboard.fail = true;
        assert_eq!(copy_path(Some("/x"), &mut clipboard).message, "❌ 복사 실패");
    }
}
