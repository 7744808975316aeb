//! Template registry with specificity-chain lookup.
//!
//! Fragment templates are looked up most-specific first:
//! `{base}_{region}_{specific}`, `{base}_{specific}`, `{base}_{region}`,
//! then `{base}`. The base template of every chain ships with
//! [`TemplateRegistry::with_defaults`], so a missing base is a fatal
//! configuration error, not a per-request condition.

use crate::error::{PageError, PageResult};
use crate::transliterate::slug;
use parking_lot::RwLock;
use std::collections::HashSet;
use tera::{Context, Tera};

/// Normalize a region or block name into a template suggestion key:
/// lowercased, with spaces and hyphens collapsed to underscores.
///
/// # Examples
///
/// ```
/// use coppice::templates::suggestion_key;
///
/// assert_eq!(suggestion_key("Main sidebar"), "main_sidebar");
/// assert_eq!(suggestion_key("user-menu"), "user_menu");
/// ```
pub fn suggestion_key(name: &str) -> String {
	slug(name).replace('-', "_")
}

/// Suggestion chain for a block fragment, most specific first. Empty
/// region or block names simply drop the entries that would need them.
pub fn block_suggestions(base: &str, region: &str, specific: &str) -> Vec<String> {
	let region = suggestion_key(region);
	let specific = suggestion_key(specific);
	let mut chain = Vec::with_capacity(4);
	if !region.is_empty() && !specific.is_empty() {
		chain.push(format!("{base}_{region}_{specific}"));
	}
	if !specific.is_empty() {
		chain.push(format!("{base}_{specific}"));
	}
	if !region.is_empty() {
		chain.push(format!("{base}_{region}"));
	}
	chain.push(base.to_string());
	chain
}

/// Suggestion chain for the primary content fragment, keyed by page type
/// and node id.
pub fn content_suggestions(page_type: &str, node_id: i64) -> Vec<String> {
	let key = suggestion_key(page_type);
	vec![
		format!("content_{key}_{node_id}"),
		format!("content_{key}"),
		"content".to_string(),
	]
}

/// Suggestion chain for the whole-page shell of a page type.
pub fn page_suggestions(page_type: &str) -> Vec<String> {
	let key = suggestion_key(page_type);
	vec![format!("page_{key}"), key, "index".to_string()]
}

/// Named Tera templates with first-existing-wins selection.
pub struct TemplateRegistry {
	tera: RwLock<Tera>,
}

impl TemplateRegistry {
	/// An empty registry; hosts register every template themselves.
	pub fn new() -> Self {
		Self {
			tera: RwLock::new(Tera::default()),
		}
	}

	/// A registry preloaded with the minimal base templates for the page
	/// shell, the content fragment and every block type.
	pub fn with_defaults() -> Self {
		let registry = Self::new();
		for (name, source) in DEFAULT_TEMPLATES {
			registry
				.register(name, source)
				.expect("default templates are valid");
		}
		registry
	}

	/// Register or replace a template. Template names carry no file
	/// suffix, so Tera's suffix-based autoescaping stays off and stored
	/// HTML flows through; anything user-supplied is sanitized before it
	/// reaches a context.
	pub fn register(&self, name: &str, source: &str) -> PageResult<()> {
		self.tera
			.write()
			.add_raw_template(name, source)
			.map_err(|err| PageError::Template(err.to_string()))
	}

	pub fn has(&self, name: &str) -> bool {
		self.tera
			.read()
			.get_template_names()
			.any(|registered| registered == name)
	}

	/// First existing template of a suggestion chain.
	pub fn select(&self, candidates: &[String]) -> PageResult<String> {
		let tera = self.tera.read();
		let registered: HashSet<&str> = tera.get_template_names().collect();
		for candidate in candidates {
			if registered.contains(candidate.as_str()) {
				return Ok(candidate.clone());
			}
		}
		Err(PageError::MissingTemplate(candidates.join(", ")))
	}

	pub fn render(&self, name: &str, context: &Context) -> PageResult<String> {
		self.tera
			.read()
			.render(name, context)
			.map_err(|err| PageError::Template(format!("{name}: {err}")))
	}

	/// Select from a suggestion chain and render the winner.
	pub fn select_render(&self, candidates: &[String], context: &Context) -> PageResult<String> {
		let name = self.select(candidates)?;
		self.render(&name, context)
	}
}

impl Default for TemplateRegistry {
	fn default() -> Self {
		Self::with_defaults()
	}
}

const DEFAULT_TEMPLATES: [(&str, &str); 11] = [
	(
		"index",
		"<!DOCTYPE html>\n<html lang=\"{{ language }}\">\n<head>\n<meta charset=\"utf-8\">\n\
		 <title>{{ title }}</title>\n<meta name=\"author\" content=\"{{ author }}\">\n\
		 <meta name=\"keywords\" content=\"{{ keywords }}\">\n</head>\n<body class=\"{{ classes }}\">\n\
		 {% for message in messages %}<div class=\"alert alert-{{ message.level }}\">{{ message.text }}</div>\n\
		 {% endfor %}{% for region, html in regions %}<div class=\"region region-{{ region }}\">{{ html }}</div>\n\
		 {% endfor %}<main class=\"main\">{{ content }}</main>\n</body>\n</html>\n",
	),
	(
		"content",
		"<article class=\"content\">{% if node.highlight %}<p class=\"highlight\">{{ node.highlight }}</p>\
		 {% endif %}{{ node.body }}</article>",
	),
	(
		"block_static",
		"<div class=\"block block-static{{ classes }}\"><h2>{{ node.title }}</h2>{{ node.body }}</div>",
	),
	(
		"block_menu",
		"<nav class=\"block block-menu{{ classes }}\"><ul>{% for item in items %}\
		 <li class=\"depth-{{ item.depth }}{% if item.active %} active{% endif %}\">\
		 <a href=\"{{ item.href }}\">{{ item.title }}</a></li>{% endfor %}</ul></nav>",
	),
	(
		"block_signal",
		"<div class=\"block block-signal{{ classes }}\">\
		 {% if payload is string %}{{ payload }}{% else %}{{ payload | json_encode() }}{% endif %}</div>",
	),
	(
		"block_language",
		"<ul class=\"block block-language{{ classes }}\">{% for lang in languages %}\
		 <li{% if lang.code == current %} class=\"active\"{% endif %}>\
		 <a href=\"{{ lang.href }}\">{{ lang.label }}</a></li>{% endfor %}</ul>",
	),
	(
		"block_user_menu",
		"<div class=\"block block-user-menu{{ classes }}\">{% if auth.authenticated %}\
		 <a href=\"/user/logout/\" class=\"logout\">Log out</a>{% else %}\
		 <a href=\"/user/login/\" class=\"login\">Log in</a>{% endif %}</div>",
	),
	(
		"block_login",
		"<form class=\"block block-login{{ classes }}\" method=\"post\" action=\"/user/login/\">\
		 <input type=\"hidden\" name=\"redirect\" value=\"{{ form.redirect }}\">\
		 <input name=\"username\" value=\"{{ form.username }}\" placeholder=\"Username\">\
		 <input type=\"password\" name=\"password\" placeholder=\"Password\">\
		 <button type=\"submit\">Log in</button></form>",
	),
	(
		"block_search",
		"<form class=\"block block-search{{ classes }}\" method=\"get\" action=\"/search/\">\
		 <input name=\"q\" value=\"{{ form.q }}\" placeholder=\"Search\">\
		 <button type=\"submit\">Search</button></form>",
	),
	(
		"block_search_results",
		"<div class=\"block block-search-results{{ classes }}\"><h2>Results for {{ q }}</h2><ul>\
		 {% for node in nodes %}<li><a href=\"{{ node.url }}\">{{ node.title }}</a>\
		 <p>{{ node.summary }}</p></li>{% endfor %}</ul></div>",
	),
	(
		"block_contact",
		"<form class=\"block block-contact{{ classes }}\" method=\"post\" action=\"/contact/form/\">\
		 <input type=\"hidden\" name=\"redirect\" value=\"{{ form.redirect }}\">\
		 <input name=\"sender_name\" value=\"{{ form.sender_name }}\" placeholder=\"Your name\">\
		 <input name=\"sender_email\" value=\"{{ form.sender_email }}\" placeholder=\"Your email\">\
		 <input name=\"subject\" value=\"{{ form.subject }}\" placeholder=\"Subject\">\
		 <textarea name=\"message\">{{ form.message }}</textarea>\
		 <button type=\"submit\">Send</button></form>",
	),
];
