//! Site-wide settings consumed by the rendering core.
//!
//! Hosts embed these settings once at startup; every value has a sensible
//! default so a bare `SiteSettings::default()` produces a working site.

use serde::{Deserialize, Serialize};

/// How the language switcher labels each language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageLabelStyle {
	/// Full language name, e.g. "English".
	Name,
	/// Two-letter code, e.g. "en".
	Code,
	/// Flag icon markup.
	Flag,
}

impl LanguageLabelStyle {
	/// String form used in template contexts.
	pub fn as_str(&self) -> &'static str {
		match self {
			LanguageLabelStyle::Name => "name",
			LanguageLabelStyle::Code => "code",
			LanguageLabelStyle::Flag => "flag",
		}
	}
}

/// Site configuration surface read by the composition core.
///
/// # Examples
///
/// ```
/// use coppice::conf::SiteSettings;
///
/// let settings = SiteSettings::default();
/// assert_eq!(settings.site_name, "coppice");
/// assert!(settings.i18n_urls);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
	/// Site name appended to page titles and exposed to templates.
	pub site_name: String,
	/// Meta author tag content.
	pub site_author: String,
	/// Meta keywords tag content.
	pub site_keywords: String,
	/// `(code, display name)` pairs of the languages the site serves, in
	/// menu order.
	pub languages: Vec<(String, String)>,
	/// Label style for the language switcher block.
	pub language_menu_labels: LanguageLabelStyle,
	/// Whether generated URLs carry a `/lang` prefix segment.
	pub i18n_urls: bool,
	/// Characters removed outright during transliteration.
	pub transliterate_remove: String,
	/// Characters replaced during transliteration; both strings must have
	/// the same length, position `i` of the first maps to position `i` of
	/// the second.
	pub transliterate_replace: (String, String),
}

impl Default for SiteSettings {
	fn default() -> Self {
		Self {
			site_name: "coppice".to_string(),
			site_author: "coppice".to_string(),
			site_keywords: String::new(),
			languages: vec![("en".to_string(), "English".to_string())],
			language_menu_labels: LanguageLabelStyle::Name,
			i18n_urls: true,
			transliterate_remove: "\"'`,:;|{[}]+=*&%^$#@!~()?<>".to_string(),
			transliterate_replace: (" .-_/".to_string(), "-----".to_string()),
		}
	}
}

impl SiteSettings {
	/// Settings with a custom site name, other fields at defaults.
	pub fn with_site_name(name: impl Into<String>) -> Self {
		Self {
			site_name: name.into(),
			..Self::default()
		}
	}
}
