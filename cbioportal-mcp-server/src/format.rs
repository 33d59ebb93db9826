//! Text rendering shared by the tool handlers.

use std::borrow::Cow;
use std::fmt::Display;

/// Bullet prefix for list entries
pub const BULLET: &str = "•";

/// Render at most `cap` items joined by `separator`.
///
/// When the source holds more than `cap` items a `... and more <noun>`
/// trailer follows after a blank line.
pub fn capped_list<T, F>(items: &[T], cap: usize, separator: &str, noun: &str, render: F) -> String
where
    F: Fn(&T) -> String,
{
    let mut text = join_list(&items[..items.len().min(cap)], separator, render);
    if items.len() > cap {
        text.push_str("\n\n... and more ");
        text.push_str(noun);
    }
    text
}

pub fn join_list<T, F>(items: &[T], separator: &str, render: F) -> String
where
    F: Fn(&T) -> String,
{
    items.iter().map(render).collect::<Vec<_>>().join(separator)
}

/// Label for a discrete copy-number code
pub fn alteration_label(code: i32) -> Cow<'static, str> {
    match code {
        -2 => Cow::Borrowed("Deep Deletion"),
        -1 => Cow::Borrowed("Shallow Deletion"),
        1 => Cow::Borrowed("Gain"),
        2 => Cow::Borrowed("Amplification"),
        other => Cow::Owned(other.to_string()),
    }
}

/// Missing or empty text becomes `N/A`
pub fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("N/A")
}

/// Missing or zero counts become `N/A`
pub fn count_or_na(value: Option<i64>) -> String {
    match value {
        Some(count) if count != 0 => count.to_string(),
        _ => "N/A".to_string(),
    }
}

pub fn display_or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<usize> {
        (1..=count).collect()
    }

    #[test]
    fn list_over_cap_gets_exactly_cap_entries_and_one_trailer() {
        let text = capped_list(&numbered(51), 50, "\n\n", "mutations", |n| format!("• {n}"));

        assert_eq!(text.matches("• ").count(), 50);
        assert!(text.contains("• 50"));
        assert!(!text.contains("• 51"));
        assert!(text.ends_with("\n\n... and more mutations"));
        assert_eq!(text.matches("... and more").count(), 1);
    }

    #[test]
    fn list_at_cap_has_no_trailer() {
        let text = capped_list(&numbered(50), 50, "\n\n", "mutations", |n| format!("• {n}"));

        assert_eq!(text.matches("• ").count(), 50);
        assert!(!text.contains("... and more"));
    }

    #[test]
    fn empty_list_renders_empty() {
        let text = capped_list::<usize, _>(&[], 20, "\n", "genes", |n| n.to_string());
        assert_eq!(text, "");
    }

    #[test]
    fn alteration_codes_map_to_labels() {
        assert_eq!(alteration_label(-2), "Deep Deletion");
        assert_eq!(alteration_label(-1), "Shallow Deletion");
        assert_eq!(alteration_label(1), "Gain");
        assert_eq!(alteration_label(2), "Amplification");
        assert_eq!(alteration_label(0), "0");
        assert_eq!(alteration_label(-3), "-3");
        assert_eq!(alteration_label(7), "7");
    }

    #[test]
    fn na_helpers() {
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some("")), "N/A");
        assert_eq!(or_na(Some("x")), "x");
        assert_eq!(count_or_na(Some(0)), "N/A");
        assert_eq!(count_or_na(Some(12)), "12");
        assert_eq!(display_or_na(Some(0.05)), "0.05");
        assert_eq!(display_or_na::<i64>(None), "N/A");
    }
}
