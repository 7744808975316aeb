//! Path normalization helpers shared by aliases, menus and redirects.

use crate::conf::SiteSettings;

/// Build a site-absolute path from a stored path fragment.
///
/// Ensures a leading and trailing slash, reattaches a `#bookmark` and,
/// when language-prefixed URLs are enabled and a language is given,
/// prefixes the `/lang` segment.
///
/// # Examples
///
/// ```
/// use coppice::conf::SiteSettings;
/// use coppice::paths::full_path;
///
/// let settings = SiteSettings::default();
/// assert_eq!(full_path("about", "en", "#team", &settings), "/en/about/#team");
/// assert_eq!(full_path("about", "", "", &settings), "/about/");
/// ```
pub fn full_path(path: &str, language: &str, bookmark: &str, settings: &SiteSettings) -> String {
	let mut path = path.to_string();
	if !path.starts_with('/') {
		path.insert(0, '/');
	}
	if !path.ends_with('/') {
		path.push('/');
	}
	path.push_str(bookmark);
	if !language.is_empty() && settings.i18n_urls {
		path = format!("/{language}{path}");
	}
	path
}

/// Strip slashes and any language prefix from a request URL.
///
/// Menu item paths are stored without slashes, so active-trail matching
/// compares against this cleaned form.
///
/// # Examples
///
/// ```
/// use coppice::conf::SiteSettings;
/// use coppice::paths::clean_url;
///
/// let settings = SiteSettings::default();
/// assert_eq!(clean_url("/en/about/", &settings), "about");
///
/// let no_prefix = SiteSettings { i18n_urls: false, ..SiteSettings::default() };
/// assert_eq!(clean_url("/", &no_prefix), "/");
/// ```
pub fn clean_url(url: &str, settings: &SiteSettings) -> String {
	let url = url.trim_matches('/');
	let url = if url.is_empty() { "/" } else { url };
	if settings.i18n_urls {
		url.split('/').skip(1).collect::<Vec<_>>().join("/")
	} else {
		url.to_string()
	}
}
