use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const MAX_PROMPT_SEGMENT_CHARS: usize = 50;
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const IMAGE_PREFIX: &str = "generated_images";
pub const PAGE_PREFIX: &str = "pages";

/// Replaces spaces with underscores, drops `:` `/` `\`, and keeps at most
/// 50 characters.
pub fn sanitize_prompt(prompt: &str) -> String {
    prompt
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            ':' | '/' | '\\' => None,
            other => Some(other),
        })
        .take(MAX_PROMPT_SEGMENT_CHARS)
        .collect()
}

pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Storage keys for one invocation.
///
/// Keys only vary by second, so two calls with the same sanitized prompt in the
/// same second overwrite each other unless `unique` adds a random suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectKeys {
    sanitized_prompt: String,
    stamp: String,
}

impl ObjectKeys {
    pub fn new(prompt: &str, now: DateTime<Utc>, unique: bool) -> Self {
        let mut stamp = format_timestamp(now);
        if unique {
            let suffix = Uuid::new_v4().simple().to_string();
            stamp.push('_');
            stamp.push_str(&suffix[..8]);
        }
        Self {
            sanitized_prompt: sanitize_prompt(prompt),
            stamp,
        }
    }

    pub fn sanitized_prompt(&self) -> &str {
        &self.sanitized_prompt
    }

    /// `generated_images/{prompt}_{stamp}.png`
    pub fn image_key(&self) -> String {
        format!("{}/{}_{}.png", IMAGE_PREFIX, self.sanitized_prompt, self.stamp)
    }

    /// `generated_images/{prompt}/{stamp}.png`
    pub fn sale_image_key(&self) -> String {
        format!("{}/{}/{}.png", IMAGE_PREFIX, self.sanitized_prompt, self.stamp)
    }

    /// `pages/{prompt}/{stamp}/index.html`
    pub fn page_key(&self) -> String {
        format!("{}/{}/{}/index.html", PAGE_PREFIX, self.sanitized_prompt, self.stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_sanitize_strips_hostile_characters() {
        let prompts = [
            "a cat: on/the\\beach at noon",
            "::::////\\\\",
            "   ",
            "",
            "C:\\Users\\me\\Pictures/cat.png with spaces",
        ];
        for prompt in prompts {
            let sanitized = sanitize_prompt(prompt);
            assert!(!sanitized.contains(' '), "{sanitized}");
            assert!(!sanitized.contains(':'), "{sanitized}");
            assert!(!sanitized.contains('/'), "{sanitized}");
            assert!(!sanitized.contains('\\'), "{sanitized}");
            assert!(sanitized.chars().count() <= MAX_PROMPT_SEGMENT_CHARS);
        }
        assert_eq!(sanitize_prompt("a cat: on/the\\beach"), "a_cat_onthebeach");
    }

    #[test]
    fn test_sanitize_truncates_by_character() {
        let long = "é".repeat(80);
        let sanitized = sanitize_prompt(&long);
        assert_eq!(sanitized.chars().count(), 50);

        let prompt = "x".repeat(49) + " tail";
        assert_eq!(sanitize_prompt(&prompt), "x".repeat(49) + "_");
    }

    #[test]
    fn test_key_layouts() {
        let keys = ObjectKeys::new("The cat on beach", fixed_now(), false);
        assert_eq!(keys.image_key(), "generated_images/The_cat_on_beach_20250309_140507.png");
        assert_eq!(keys.sale_image_key(), "generated_images/The_cat_on_beach/20250309_140507.png");
        assert_eq!(keys.page_key(), "pages/The_cat_on_beach/20250309_140507/index.html");
    }

    #[test]
    fn test_same_second_keys_collide_by_default() {
        let first = ObjectKeys::new("same prompt", fixed_now(), false);
        let second = ObjectKeys::new("same prompt", fixed_now(), false);
        assert_eq!(first.image_key(), second.image_key());
    }

    #[test]
    fn test_unique_keys_do_not_collide() {
        let first = ObjectKeys::new("same prompt", fixed_now(), true);
        let second = ObjectKeys::new("same prompt", fixed_now(), true);
        assert_ne!(first.image_key(), second.image_key());
        assert!(first
            .image_key()
            .starts_with("generated_images/same_prompt_20250309_140507_"));
        assert_eq!(first.sanitized_prompt(), "same_prompt");
    }
}
