//! Navigation menu tree: ordered subtree queries and active-trail lookup.
//!
//! Structural queries walk the live parent/weight adjacency so they are
//! correct immediately after edits; [`rebuild`] refreshes the
//! materialized nested-set metadata (`lft`/`rght`/`depth`) used for
//! depth-aware rendering after bulk changes.

use crate::conf::SiteSettings;
use crate::models::{MenuItem, MenuItemId};
use crate::paths::clean_url;
use crate::store::{MenuStore, StoreResult};
use std::collections::HashMap;

/// Snapshot of the full menu tree, loaded from a [`MenuStore`].
pub struct MenuTree {
	items: Vec<MenuItem>,
}

impl MenuTree {
	/// Load every item from the store.
	pub async fn load(store: &dyn MenuStore) -> StoreResult<Self> {
		Ok(Self::from_items(store.items().await?))
	}

	/// Build a tree from an already-loaded item set.
	pub fn from_items(mut items: Vec<MenuItem>) -> Self {
		items.sort_by_key(|item| (item.weight, item.id));
		Self { items }
	}

	pub fn get(&self, id: MenuItemId) -> Option<&MenuItem> {
		self.items.iter().find(|item| item.id == id)
	}

	fn children(&self, parent: Option<MenuItemId>) -> impl Iterator<Item = &MenuItem> {
		self.items.iter().filter(move |item| item.parent == parent)
	}

	/// Descendants of an item in depth-first sibling order (ascending
	/// weight, id tie-break). Disabled items are included; rendering
	/// callers filter them.
	pub fn descendants(&self, id: MenuItemId, include_self: bool) -> Vec<&MenuItem> {
		let mut out = Vec::new();
		if include_self {
			if let Some(item) = self.get(id) {
				out.push(item);
			}
		}
		self.collect_descendants(id, &mut out);
		out
	}

	fn collect_descendants<'a>(&'a self, id: MenuItemId, out: &mut Vec<&'a MenuItem>) {
		for child in self.children(Some(id)) {
			out.push(child);
			self.collect_descendants(child.id, out);
		}
	}

	/// Ancestors of an item, root first.
	pub fn ancestors(&self, id: MenuItemId, include_self: bool) -> Vec<&MenuItem> {
		let mut chain = Vec::new();
		let mut current = self.get(id);
		if let Some(item) = current {
			if include_self {
				chain.push(item);
			}
			current = item.parent.and_then(|parent| self.get(parent));
		}
		while let Some(item) = current {
			chain.push(item);
			current = item.parent.and_then(|parent| self.get(parent));
		}
		chain.reverse();
		chain
	}

	/// Every root item in sibling order.
	pub fn roots(&self) -> Vec<&MenuItem> {
		self.children(None).collect()
	}

	/// Items whose path matches the current request URL, plus all of
	/// their ancestors. Used to mark the active trail in navigation.
	pub fn active_trail(
		&self,
		within: Option<MenuItemId>,
		request_path: &str,
		settings: &SiteSettings,
	) -> Vec<&MenuItem> {
		let scope: Vec<&MenuItem> = match within {
			Some(root) => self.descendants(root, false),
			None => self.items.iter().collect(),
		};
		let mut trail = Vec::new();
		for item in scope {
			if path_active(&item.path, request_path, settings) {
				for ancestor in self.ancestors(item.id, true) {
					if !trail.iter().any(|t: &&MenuItem| t.id == ancestor.id) {
						trail.push(ancestor);
					}
				}
			}
		}
		trail
	}

	/// Recompute nested-set metadata from the adjacency, returning the
	/// rebuilt items. Numbers run across all roots in sibling order.
	pub fn rebuild(&mut self) -> &[MenuItem] {
		let mut counter: i64 = 0;
		let mut meta: HashMap<MenuItemId, (i64, i64, i32)> = HashMap::new();
		let roots: Vec<MenuItemId> = self.roots().iter().map(|item| item.id).collect();
		for root in roots {
			self.number_subtree(root, 0, &mut counter, &mut meta);
		}
		for item in &mut self.items {
			if let Some((lft, rght, depth)) = meta.get(&item.id) {
				item.lft = *lft;
				item.rght = *rght;
				item.depth = *depth;
			}
		}
		&self.items
	}

	fn number_subtree(
		&self,
		id: MenuItemId,
		depth: i32,
		counter: &mut i64,
		meta: &mut HashMap<MenuItemId, (i64, i64, i32)>,
	) {
		*counter += 1;
		let lft = *counter;
		let children: Vec<MenuItemId> = self.children(Some(id)).map(|child| child.id).collect();
		for child in children {
			self.number_subtree(child, depth + 1, counter, meta);
		}
		*counter += 1;
		meta.insert(id, (lft, *counter, depth));
	}
}

/// Recompute and persist nested-set metadata for the whole tree.
pub async fn rebuild(store: &dyn MenuStore) -> StoreResult<()> {
	let mut tree = MenuTree::load(store).await?;
	tree.rebuild();
	tracing::debug!(items = tree.items.len(), "menu tree rebuilt");
	store.replace_items(tree.items).await
}

/// Whether a stored menu path addresses the current request path,
/// ignoring slashes and any language prefix.
pub fn path_active(item_path: &str, request_path: &str, settings: &SiteSettings) -> bool {
	let url = clean_url(request_path, settings);
	item_path == url || item_path == url.trim_matches('/')
}
