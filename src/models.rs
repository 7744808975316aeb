//! Content entities: nodes, revisions, page types, blocks, menus, terms.

use crate::conf::SiteSettings;
use crate::paths::full_path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
	($(#[$doc:meta])* $name:ident) => {
		$(#[$doc])*
		#[derive(
			Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
		)]
		pub struct $name(pub i64);

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}
	};
}

id_type!(
	/// Identifier of a content node.
	NodeId
);
id_type!(
	/// Identifier of a content author or editor.
	UserId
);
id_type!(
	/// Identifier of a page type.
	PageTypeId
);
id_type!(
	/// Identifier of a content block.
	BlockId
);
id_type!(
	/// Identifier of a layout element.
	ElementId
);
id_type!(
	/// Identifier of a menu item.
	MenuItemId
);
id_type!(
	/// Identifier of a taxonomy term.
	TermId
);
id_type!(
	/// Identifier of a node revision.
	RevisionId
);

/*
 * Node system
 */

/// A single content record.
///
/// `language` empty means language-neutral. A node with `redirect` set
/// navigates to `link` while `alias` still identifies the node itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
	pub id: NodeId,
	pub page_type: PageTypeId,
	pub language: String,
	pub title: String,
	pub user: UserId,
	/// Published flag.
	pub status: bool,
	pub promote: bool,
	pub sticky: bool,
	pub created: DateTime<Utc>,
	pub changed: DateTime<Utc>,
	pub original_translation: Option<NodeId>,
	pub summary: String,
	pub body: String,
	pub highlight: String,
	pub link: String,
	pub weight: i32,
	/// Canonical URL alias, unique per `(alias, language)`.
	pub alias: String,
	pub redirect: bool,
}

impl Node {
	/// New unsaved node with defaults; the store assigns the id on insert.
	pub fn new(page_type: PageTypeId, user: UserId, title: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: NodeId(0),
			page_type,
			language: String::new(),
			title: title.into(),
			user,
			status: true,
			promote: false,
			sticky: false,
			created: now,
			changed: now,
			original_translation: None,
			summary: String::new(),
			body: String::new(),
			highlight: String::new(),
			link: String::new(),
			weight: 0,
			alias: String::new(),
			redirect: false,
		}
	}

	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = language.into();
		self
	}

	pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
		self.alias = alias.into();
		self
	}

	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();
		self
	}

	pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
		self.summary = summary.into();
		self
	}

	pub fn with_highlight(mut self, highlight: impl Into<String>) -> Self {
		self.highlight = highlight.into();
		self
	}

	pub fn with_status(mut self, status: bool) -> Self {
		self.status = status;
		self
	}

	pub fn with_link(mut self, link: impl Into<String>) -> Self {
		self.link = link.into();
		self
	}

	pub fn with_redirect(mut self, redirect: bool) -> Self {
		self.redirect = redirect;
		self
	}

	/// Canonical path for the node: its alias when present, otherwise the
	/// numeric content route.
	pub fn absolute_url(&self, settings: &SiteSettings) -> String {
		if !self.alias.is_empty() {
			full_path(&self.alias, &self.language, "", settings)
		} else {
			format!("/cms/content/{}/", self.id)
		}
	}

	/// Navigation target for redirect nodes, language prefix included.
	pub fn redirect_path(&self, settings: &SiteSettings) -> String {
		full_path(&self.link, &self.language, "", settings)
	}
}

/// Archived copy of a node's content fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRevision {
	pub id: RevisionId,
	pub node: NodeId,
	pub user: UserId,
	pub log_entry: String,
	pub created: DateTime<Utc>,
	pub title: String,
	pub status: bool,
	pub promote: bool,
	pub sticky: bool,
	pub summary: String,
	pub body: String,
	pub highlight: String,
	pub link: String,
}

impl NodeRevision {
	/// Capture the node's current content as a revision record.
	pub fn capture(node: &Node, user: UserId, log_entry: impl Into<String>) -> Self {
		Self {
			id: RevisionId(0),
			node: node.id,
			user,
			log_entry: log_entry.into(),
			created: Utc::now(),
			title: node.title.clone(),
			status: node.status,
			promote: node.promote,
			sticky: node.sticky,
			summary: node.summary.clone(),
			body: node.body.clone(),
			highlight: node.highlight.clone(),
			link: node.link.clone(),
		}
	}
}

/// A named page layout profile assigned to nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageType {
	pub id: PageTypeId,
	/// Unique machine name.
	pub name: String,
	pub description: String,
	/// Content submission guidelines shown in editorial screens.
	pub guidelines: String,
	/// Default alias pattern; may embed `[node:title]`, `[node:id]`,
	/// `[node:created:FMT]` and `[node:changed:FMT]` tokens.
	pub url_pattern: String,
}

impl PageType {
	pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			id: PageTypeId(0),
			name: name.into(),
			description: description.into(),
			guidelines: String::new(),
			url_pattern: String::new(),
		}
	}

	pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.url_pattern = pattern.into();
		self
	}
}

/*
 * Block system
 */

/// Render strategy of a content block; each variant carries exactly the
/// fields that strategy needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockKind {
	/// Embed another published node.
	Static { node: NodeId },
	/// Render the descendants of a menu item.
	Menu { item: MenuItemId },
	/// Dispatch a named extension hook; the last non-null response wins.
	Signal { name: String },
	/// Language switcher.
	Language,
	/// Marker for template-driven login/logout links.
	UserMenu,
	/// Login form, repopulated from the read-once session slot.
	Login,
	/// Search query form.
	Search,
	/// Search result listing for the `q` query parameter.
	SearchResults,
	/// Contact form, repopulated from the read-once session slot.
	Contact,
}

impl BlockKind {
	/// Machine name of the block type, as stored and logged.
	pub fn type_name(&self) -> &'static str {
		match self {
			BlockKind::Static { .. } => "static",
			BlockKind::Menu { .. } => "menu",
			BlockKind::Signal { .. } => "signal",
			BlockKind::Language => "language",
			BlockKind::UserMenu => "user-menu",
			BlockKind::Login => "login",
			BlockKind::Search => "search",
			BlockKind::SearchResults => "search-results",
			BlockKind::Contact => "contact",
		}
	}
}

/// A reusable renderable unit placed into page layouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
	pub id: BlockId,
	/// Unique block machine name, also the template suggestion key.
	pub name: String,
	pub kind: BlockKind,
	/// Additional CSS classes appended to the block wrapper.
	pub classes: String,
}

impl ContentBlock {
	pub fn new(name: impl Into<String>, kind: BlockKind) -> Self {
		Self {
			id: BlockId(0),
			name: name.into(),
			kind,
			classes: String::new(),
		}
	}

	pub fn with_classes(mut self, classes: impl Into<String>) -> Self {
		self.classes = classes.into();
		self
	}
}

/// Binding of a block into a page type's layout.
///
/// Elements with a greater weight in the same region sink to the bottom
/// of the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutElement {
	pub id: ElementId,
	pub page_type: PageTypeId,
	/// Region name matching a template slot.
	pub region: String,
	pub block: BlockId,
	pub weight: i32,
	/// Hidden elements are kept for later reuse but never rendered.
	pub hidden: bool,
}

impl LayoutElement {
	pub fn new(page_type: PageTypeId, region: impl Into<String>, block: BlockId, weight: i32) -> Self {
		Self {
			id: ElementId(0),
			page_type,
			region: region.into(),
			block,
			weight,
			hidden: false,
		}
	}

	pub fn hidden(mut self) -> Self {
		self.hidden = true;
		self
	}
}

/*
 * Menu system
 */

/// A navigation tree item; parents may have an empty path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
	pub id: MenuItemId,
	pub parent: Option<MenuItemId>,
	pub weight: i32,
	pub language: String,
	/// Relative path, absolute URL or `#bookmark`.
	pub path: String,
	pub title: String,
	/// Disabled items stay in the tree but are filtered from rendering.
	pub disabled: bool,
	/// Nested-set metadata, refreshed by a tree rebuild.
	pub lft: i64,
	pub rght: i64,
	pub depth: i32,
}

impl MenuItem {
	pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			id: MenuItemId(0),
			parent: None,
			weight: 0,
			language: String::new(),
			path: path.into(),
			title: title.into(),
			disabled: false,
			lft: 0,
			rght: 0,
			depth: 0,
		}
	}

	pub fn with_parent(mut self, parent: MenuItemId) -> Self {
		self.parent = Some(parent);
		self
	}

	pub fn with_weight(mut self, weight: i32) -> Self {
		self.weight = weight;
		self
	}

	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = language.into();
		self
	}

	pub fn disabled(mut self) -> Self {
		self.disabled = true;
		self
	}

	/// Full path of the item including language prefix and bookmark.
	///
	/// Absolute URLs and bare bookmarks pass through verbatim.
	///
	/// # Examples
	///
	/// ```
	/// use coppice::conf::SiteSettings;
	/// use coppice::models::MenuItem;
	///
	/// let settings = SiteSettings::default();
	/// let item = MenuItem::new("Team", "about#team").with_language("en");
	/// assert_eq!(item.full_path(&settings), "/en/about/#team");
	///
	/// let external = MenuItem::new("Docs", "https://example.org/docs");
	/// assert_eq!(external.full_path(&settings), "https://example.org/docs");
	/// ```
	pub fn full_path(&self, settings: &SiteSettings) -> String {
		let path = self.path.as_str();
		if path.starts_with("http:") || path.starts_with("https:") || path.starts_with('#') {
			return path.to_string();
		}
		let (path, bookmark) = match path.find('#') {
			Some(pos) if pos > 0 => (&path[..pos], &path[pos..]),
			_ => (path, ""),
		};
		full_path(path, &self.language, bookmark, settings)
	}
}

/*
 * Taxonomy system
 */

/// A taxonomy term; terms form a tree and tag many nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyTerm {
	pub id: TermId,
	pub parent: Option<TermId>,
	pub name: String,
	pub weight: i32,
	/// Optional node holding the term's long description.
	pub description_node: Option<NodeId>,
	/// Nodes tagged with this term.
	pub nodes: Vec<NodeId>,
}

impl TaxonomyTerm {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			id: TermId(0),
			parent: None,
			name: name.into(),
			weight: 0,
			description_node: None,
			nodes: Vec::new(),
		}
	}

	pub fn with_parent(mut self, parent: TermId) -> Self {
		self.parent = Some(parent);
		self
	}

	pub fn with_weight(mut self, weight: i32) -> Self {
		self.weight = weight;
		self
	}

	pub fn with_nodes(mut self, nodes: Vec<NodeId>) -> Self {
		self.nodes = nodes;
		self
	}
}
