//! Startup self-checks over the site configuration.

use crate::conf::SiteSettings;

/// Severity of a configuration check finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckLevel {
	Warning,
	Error,
}

/// One configuration check finding.
#[derive(Debug, Clone)]
pub struct CheckMessage {
	pub level: CheckLevel,
	/// Stable identifier, e.g. `cms.E001`.
	pub id: &'static str,
	pub text: String,
}

/// Validate the settings a host is about to run with.
///
/// # Examples
///
/// ```
/// use coppice::checks::run_checks;
/// use coppice::conf::SiteSettings;
///
/// assert!(run_checks(&SiteSettings::default()).is_empty());
/// ```
pub fn run_checks(settings: &SiteSettings) -> Vec<CheckMessage> {
	let mut findings = Vec::new();

	let (from, to) = &settings.transliterate_replace;
	if from.chars().count() != to.chars().count() {
		findings.push(CheckMessage {
			level: CheckLevel::Error,
			id: "cms.E001",
			text: format!(
				"transliterate_replace tables differ in length ({} vs {})",
				from.chars().count(),
				to.chars().count()
			),
		});
	}

	if settings.site_name.trim().is_empty() {
		findings.push(CheckMessage {
			level: CheckLevel::Warning,
			id: "cms.W001",
			text: "site_name is empty; page titles will end with a bare separator".to_string(),
		});
	}

	if settings.i18n_urls && settings.languages.is_empty() {
		findings.push(CheckMessage {
			level: CheckLevel::Warning,
			id: "cms.W002",
			text: "i18n_urls is enabled but no languages are configured".to_string(),
		});
	}

	findings
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_mismatched_replace_tables_flagged() {
		let settings = SiteSettings {
			transliterate_replace: ("ab".to_string(), "x".to_string()),
			..SiteSettings::default()
		};
		let findings = run_checks(&settings);
		assert_eq!(findings.len(), 1);
		assert_eq!(findings[0].id, "cms.E001");
		assert_eq!(findings[0].level, CheckLevel::Error);
	}

	#[test]
	fn test_empty_site_name_warns() {
		let settings = SiteSettings {
			site_name: "  ".to_string(),
			..SiteSettings::default()
		};
		let findings = run_checks(&settings);
		assert!(findings.iter().any(|finding| finding.id == "cms.W001"));
	}

	#[test]
	fn test_i18n_without_languages_warns() {
		let settings = SiteSettings {
			languages: Vec::new(),
			..SiteSettings::default()
		};
		let findings = run_checks(&settings);
		assert!(findings.iter().any(|finding| finding.id == "cms.W002"));
	}
}
