//! Canonical URL alias generation from page-type patterns.
//!
//! Patterns may embed `[node:title]`, `[node:id]` and
//! `[node:created:FMT]` / `[node:changed:FMT]` tokens, where `FMT` is a
//! compact single-letter date format. An explicitly set alias is never
//! overwritten, and collisions on `(alias, language)` are resolved by
//! appending `/<id>`.

use crate::conf::SiteSettings;
use crate::models::{Node, PageType};
use crate::store::{NodeStore, StoreResult};
use crate::transliterate::transliterate;
use chrono::{DateTime, Datelike, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_TOKEN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"\[node:(created|changed):([^\]]+)\]").expect("valid pattern"));

const ID_TOKEN: &str = "[node:id]";

/// Derives and persists canonical aliases for nodes.
pub struct AliasGenerator<'a> {
	settings: &'a SiteSettings,
}

impl<'a> AliasGenerator<'a> {
	pub fn new(settings: &'a SiteSettings) -> Self {
		Self { settings }
	}

	/// Insert a new node, deriving its alias from the page type pattern.
	///
	/// The write is two-phase when the pattern carries `[node:id]`: the
	/// first insert produces a transient alias with the token unresolved,
	/// then a targeted update patches in the assigned id. A final check
	/// appends `/<id>` when another record already holds the same
	/// `(alias, language)` pair.
	pub async fn create(
		&self,
		store: &dyn NodeStore,
		mut node: Node,
		page_type: &PageType,
	) -> StoreResult<Node> {
		if node.alias.is_empty() && !page_type.url_pattern.is_empty() {
			node.alias = self.expand_pattern(&page_type.url_pattern, &node);
		}
		let mut node = store.insert_node(node).await?;
		if node.alias.contains(ID_TOKEN) {
			node.alias = node.alias.replace(ID_TOKEN, &node.id.to_string());
			store.update_alias(node.id, &node.alias).await?;
		}
		self.disambiguate(store, &mut node).await?;
		Ok(node)
	}

	/// Update an existing node, regenerating the alias only when it was
	/// cleared and the page type defines a pattern.
	pub async fn update(
		&self,
		store: &dyn NodeStore,
		mut node: Node,
		page_type: &PageType,
	) -> StoreResult<Node> {
		if node.alias.is_empty() && !page_type.url_pattern.is_empty() {
			node.alias = self
				.expand_pattern(&page_type.url_pattern, &node)
				.replace(ID_TOKEN, &node.id.to_string());
		}
		let mut node = store.update_node(node).await?;
		self.disambiguate(store, &mut node).await?;
		Ok(node)
	}

	async fn disambiguate(&self, store: &dyn NodeStore, node: &mut Node) -> StoreResult<()> {
		if node.alias.is_empty() {
			return Ok(());
		}
		let shared = store.count_alias(&node.alias, &node.language).await?;
		if shared > 1 {
			node.alias = format!("{}/{}", node.alias, node.id);
			tracing::debug!(node = %node.id, alias = %node.alias, "alias collision, appending id");
			store.update_alias(node.id, &node.alias).await?;
		}
		Ok(())
	}

	/// Substitute the title and date tokens of an alias pattern.
	///
	/// `[node:id]` is left in place; it can only be resolved once the
	/// store has assigned an id.
	pub fn expand_pattern(&self, pattern: &str, node: &Node) -> String {
		let alias = pattern.replace(
			"[node:title]",
			&transliterate(&node.title, self.settings, false, true),
		);
		DATE_TOKEN
			.replace_all(&alias, |caps: &regex::Captures| {
				let stamp = if &caps[1] == "created" {
					node.created
				} else {
					node.changed
				};
				format_date(&stamp, &caps[2])
			})
			.into_owned()
	}
}

/// Format a timestamp with the compact single-letter mini-language.
///
/// Supported tokens: `d` `j` (day), `m` `n` (month), `y` `Y` (year),
/// `H` `G` (hour), `i` (minute), `s` (second). Unrecognized characters
/// pass through literally.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use coppice::alias::format_date;
///
/// let stamp = Utc.with_ymd_and_hms(2015, 7, 9, 8, 5, 3).unwrap();
/// assert_eq!(format_date(&stamp, "Y/m/d"), "2015/07/09");
/// assert_eq!(format_date(&stamp, "j-n-y"), "9-7-15");
/// assert_eq!(format_date(&stamp, "H:i:s"), "08:05:03");
/// ```
pub fn format_date(stamp: &DateTime<Utc>, format: &str) -> String {
	let mut out = String::with_capacity(format.len() + 8);
	for token in format.chars() {
		match token {
			'd' => out.push_str(&format!("{:02}", stamp.day())),
			'j' => out.push_str(&stamp.day().to_string()),
			'm' => out.push_str(&format!("{:02}", stamp.month())),
			'n' => out.push_str(&stamp.month().to_string()),
			'y' => out.push_str(&format!("{:02}", stamp.year() % 100)),
			'Y' => out.push_str(&stamp.year().to_string()),
			'H' => out.push_str(&format!("{:02}", stamp.hour())),
			'G' => out.push_str(&stamp.hour().to_string()),
			'i' => out.push_str(&format!("{:02}", stamp.minute())),
			's' => out.push_str(&format!("{:02}", stamp.second())),
			other => out.push(other),
		}
	}
	out
}
