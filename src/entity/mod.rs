mod artist;
mod question;
mod show;
mod venue;

pub use artist::{Artist, ArtistForm, ArtistProfile};
pub use question::{
    Category, NewQuestion, Question, QuestionDraft, MAX_DIFFICULTY, MIN_DIFFICULTY,
};
pub use show::{parse_start_time, NewShow, Show, ShowForm, ShowListing, ShowSchedule};
pub use venue::{Venue, VenueForm, VenueProfile};

use crate::error::{Result, ShowquizError};

/// Split a comma-separated genre list, dropping empty entries.
pub fn parse_genres(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// HTML checkbox semantics: present and not an explicit "no" means checked.
pub fn parse_flag(raw: Option<&str>) -> bool {
    match raw.map(|v| v.trim().to_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "n" | "no" | "false" | "off" | "0"),
    }
}

/// Urlencoded form pairs in submission order. Keys repeat for multi-selects.
pub type FormPairs = Vec<(String, String)>;

/// First value submitted under `key`.
fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Every value submitted under `key`, comma-joined for [`parse_genres`].
fn joined_values(pairs: &[(String, String)], key: &str) -> Option<String> {
    let values: Vec<&str> = pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    optional(value).ok_or_else(|| ShowquizError::validation(format!("{} is required.", field)))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genres() {
        assert_eq!(parse_genres("Jazz, Blues,,  Folk "), vec!["Jazz", "Blues", "Folk"]);
        assert!(parse_genres("").is_empty());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some("y")));
        assert!(parse_flag(Some("on")));
        assert!(parse_flag(Some("True")));
        assert!(!parse_flag(Some("n")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_repeated_keys() {
        let pairs = vec![
            ("genres".to_string(), "Jazz".to_string()),
            ("name".to_string(), "Hop".to_string()),
            ("genres".to_string(), "Swing".to_string()),
        ];
        assert_eq!(first_value(&pairs, "genres").as_deref(), Some("Jazz"));
        assert_eq!(joined_values(&pairs, "genres").as_deref(), Some("Jazz,Swing"));
        assert_eq!(joined_values(&pairs, "website"), None);
    }

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required("name", Some(" Park ".to_string())).unwrap(), "Park");
        assert!(required("name", Some("  ".to_string())).is_err());
        assert!(required("name", None).is_err());
    }
}
