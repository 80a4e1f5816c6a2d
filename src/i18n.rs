//! Locale handling for the properties dialog.
//!
//! Message catalogs are compiled by `rust-i18n` from `locales/app.yml`.
//! Formatting code receives an [`L10n`] handle and passes its locale to every
//! lookup explicitly, so two handles with different locales never race on
//! process-global state.

/// Locale tags whose regions customarily use imperial paper sizes.
const NON_METRIC_LOCALES: &[&str] = &["en-us", "en-lr", "my"];

/// Resolved locale, captured once per consumer.
///
/// Keeps both the raw tag and the message locale: unit-system selection is
/// per-region ("en-US" is imperial), message resolution is per-language
/// ("en-US" and "en-GB" read the same strings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L10n {
    tag: String,
    language: &'static str,
}

impl L10n {
    pub fn new(locale_str: &str) -> Self {
        Self {
            tag: canonical_tag(locale_str),
            language: normalize_locale(locale_str),
        }
    }

    /// Message locale rust-i18n resolves ("en" or "is").
    pub fn language(&self) -> &str {
        self.language
    }

    /// Lowercased, dash-separated form of the tag this handle was built from.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether page sizes display in inches rather than millimeters.
    pub fn is_non_metric(&self) -> bool {
        NON_METRIC_LOCALES.contains(&self.tag.as_str())
    }

    pub fn decimal_separator(&self) -> char {
        match self.language {
            "is" => ',',
            _ => '.',
        }
    }

    pub fn thousands_separator(&self) -> char {
        match self.language {
            "is" => '.',
            _ => ',',
        }
    }
}

impl Default for L10n {
    fn default() -> Self {
        Self::new("en")
    }
}

fn canonical_tag(locale_str: &str) -> String {
    let trimmed = locale_str.trim();
    if trimmed.is_empty() {
        return "en".to_string();
    }
    trimmed.to_ascii_lowercase().replace('_', "-")
}

fn normalize_locale(locale_str: &str) -> &'static str {
    let trimmed = locale_str.trim();
    if trimmed.is_empty() {
        return "en";
    }

    // rust-i18n looks up compiled locales by name (e.g. "en", "is"), so normalize
    // incoming BCP-47 tags like "is-IS" / "en_US" down to a supported language.
    let lower = trimmed.to_ascii_lowercase().replace('_', "-");
    let lang = lower.split('-').next().unwrap_or("en");

    match lang {
        "is" => "is",
        "en" => "en",
        _ => "en",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_region_tags_to_supported_languages() {
        assert_eq!(L10n::new("is-IS").language(), "is");
        assert_eq!(L10n::new("en_US").language(), "en");
        assert_eq!(L10n::new("EN-gb").language(), "en");
        assert_eq!(L10n::new("fr-FR").language(), "en");
        assert_eq!(L10n::new("").language(), "en");
    }

    #[test]
    fn keeps_the_full_tag_for_region_checks() {
        assert_eq!(L10n::new("en_US").tag(), "en-us");
        assert_eq!(L10n::new(" is-IS ").tag(), "is-is");
    }

    #[test]
    fn classifies_non_metric_regions() {
        assert!(L10n::new("en-US").is_non_metric());
        assert!(L10n::new("en-LR").is_non_metric());
        assert!(L10n::new("my").is_non_metric());
        assert!(!L10n::new("en").is_non_metric());
        assert!(!L10n::new("en-GB").is_non_metric());
        assert!(!L10n::new("is-IS").is_non_metric());
    }

    #[test]
    fn separators_follow_the_language() {
        let en = L10n::new("en-US");
        assert_eq!(en.decimal_separator(), '.');
        assert_eq!(en.thousands_separator(), ',');

        let is = L10n::new("is");
        assert_eq!(is.decimal_separator(), ',');
        assert_eq!(is.thousands_separator(), '.');
    }
}
