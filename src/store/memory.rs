//! In-memory reference implementation of the store traits.

use super::{LayoutStore, MenuStore, NodeStore, StoreError, StoreResult, TaxonomyStore};
use crate::models::{
	BlockId, ContentBlock, ElementId, LayoutElement, MenuItem, MenuItemId, Node, NodeId,
	NodeRevision, PageType, PageTypeId, RevisionId, TaxonomyTerm, TermId,
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// DashMap-backed store; writes are serialized per map so the alias
/// generator's read-check-write sequence cannot interleave in-process.
#[derive(Default)]
pub struct MemoryStore {
	nodes: DashMap<i64, Node>,
	page_types: DashMap<i64, PageType>,
	blocks: DashMap<i64, ContentBlock>,
	elements: DashMap<i64, LayoutElement>,
	menu_items: DashMap<i64, MenuItem>,
	terms: DashMap<i64, TaxonomyTerm>,
	revisions: DashMap<i64, NodeRevision>,
	node_seq: AtomicI64,
	type_seq: AtomicI64,
	block_seq: AtomicI64,
	element_seq: AtomicI64,
	item_seq: AtomicI64,
	term_seq: AtomicI64,
	revision_seq: AtomicI64,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn next(seq: &AtomicI64) -> i64 {
		seq.fetch_add(1, Ordering::SeqCst) + 1
	}
}

#[async_trait]
impl NodeStore for MemoryStore {
	async fn insert_node(&self, mut node: Node) -> StoreResult<Node> {
		node.id = NodeId(Self::next(&self.node_seq));
		self.nodes.insert(node.id.0, node.clone());
		Ok(node)
	}

	async fn update_node(&self, mut node: Node) -> StoreResult<Node> {
		if !self.nodes.contains_key(&node.id.0) {
			return Err(StoreError::NotFound(format!("node {}", node.id)));
		}
		node.changed = Utc::now();
		self.nodes.insert(node.id.0, node.clone());
		Ok(node)
	}

	async fn update_alias(&self, id: NodeId, alias: &str) -> StoreResult<()> {
		match self.nodes.get_mut(&id.0) {
			Some(mut entry) => {
				entry.alias = alias.to_string();
				Ok(())
			}
			None => Err(StoreError::NotFound(format!("node {id}"))),
		}
	}

	async fn node(&self, id: NodeId) -> StoreResult<Option<Node>> {
		Ok(self.nodes.get(&id.0).map(|entry| entry.value().clone()))
	}

	async fn nodes_by_alias(&self, alias: &str) -> StoreResult<Vec<Node>> {
		Ok(self
			.nodes
			.iter()
			.filter(|entry| entry.alias == alias)
			.map(|entry| entry.value().clone())
			.collect())
	}

	async fn count_alias(&self, alias: &str, language: &str) -> StoreResult<usize> {
		Ok(self
			.nodes
			.iter()
			.filter(|entry| entry.alias == alias && entry.language == language)
			.count())
	}

	async fn search_nodes(&self, term: &str) -> StoreResult<Vec<Node>> {
		let needle = term.to_lowercase();
		let mut hits: Vec<Node> = self
			.nodes
			.iter()
			.filter(|entry| {
				[&entry.title, &entry.body, &entry.summary, &entry.highlight]
					.iter()
					.any(|field| field.to_lowercase().contains(&needle))
			})
			.map(|entry| entry.value().clone())
			.collect();
		hits.sort_by_key(|node| node.id);
		Ok(hits)
	}

	async fn insert_page_type(&self, mut page_type: PageType) -> StoreResult<PageType> {
		page_type.id = PageTypeId(Self::next(&self.type_seq));
		self.page_types.insert(page_type.id.0, page_type.clone());
		Ok(page_type)
	}

	async fn page_type(&self, id: PageTypeId) -> StoreResult<Option<PageType>> {
		Ok(self.page_types.get(&id.0).map(|entry| entry.value().clone()))
	}

	async fn add_revision(&self, mut revision: NodeRevision) -> StoreResult<NodeRevision> {
		revision.id = RevisionId(Self::next(&self.revision_seq));
		self.revisions.insert(revision.id.0, revision.clone());
		Ok(revision)
	}

	async fn revisions(&self, node: NodeId) -> StoreResult<Vec<NodeRevision>> {
		let mut revisions: Vec<NodeRevision> = self
			.revisions
			.iter()
			.filter(|entry| entry.node == node)
			.map(|entry| entry.value().clone())
			.collect();
		revisions.sort_by_key(|rev| std::cmp::Reverse(rev.id));
		Ok(revisions)
	}
}

#[async_trait]
impl LayoutStore for MemoryStore {
	async fn insert_block(&self, mut block: ContentBlock) -> StoreResult<ContentBlock> {
		block.id = BlockId(Self::next(&self.block_seq));
		self.blocks.insert(block.id.0, block.clone());
		Ok(block)
	}

	async fn block(&self, id: BlockId) -> StoreResult<Option<ContentBlock>> {
		Ok(self.blocks.get(&id.0).map(|entry| entry.value().clone()))
	}

	async fn insert_element(&self, mut element: LayoutElement) -> StoreResult<LayoutElement> {
		element.id = ElementId(Self::next(&self.element_seq));
		self.elements.insert(element.id.0, element.clone());
		Ok(element)
	}

	async fn elements_for(&self, page_type: PageTypeId) -> StoreResult<Vec<LayoutElement>> {
		Ok(self
			.elements
			.iter()
			.filter(|entry| entry.page_type == page_type && !entry.hidden)
			.map(|entry| entry.value().clone())
			.collect())
	}
}

#[async_trait]
impl MenuStore for MemoryStore {
	async fn insert_item(&self, mut item: MenuItem) -> StoreResult<MenuItem> {
		item.id = MenuItemId(Self::next(&self.item_seq));
		self.menu_items.insert(item.id.0, item.clone());
		Ok(item)
	}

	async fn update_item(&self, item: MenuItem) -> StoreResult<MenuItem> {
		if !self.menu_items.contains_key(&item.id.0) {
			return Err(StoreError::NotFound(format!("menu item {}", item.id)));
		}
		self.menu_items.insert(item.id.0, item.clone());
		Ok(item)
	}

	async fn item(&self, id: MenuItemId) -> StoreResult<Option<MenuItem>> {
		Ok(self.menu_items.get(&id.0).map(|entry| entry.value().clone()))
	}

	async fn items(&self) -> StoreResult<Vec<MenuItem>> {
		Ok(self.menu_items.iter().map(|entry| entry.value().clone()).collect())
	}

	async fn replace_items(&self, items: Vec<MenuItem>) -> StoreResult<()> {
		for item in items {
			self.menu_items.insert(item.id.0, item);
		}
		Ok(())
	}
}

#[async_trait]
impl TaxonomyStore for MemoryStore {
	async fn insert_term(&self, mut term: TaxonomyTerm) -> StoreResult<TaxonomyTerm> {
		term.id = TermId(Self::next(&self.term_seq));
		self.terms.insert(term.id.0, term.clone());
		Ok(term)
	}

	async fn term(&self, id: TermId) -> StoreResult<Option<TaxonomyTerm>> {
		Ok(self.terms.get(&id.0).map(|entry| entry.value().clone()))
	}

	async fn terms(&self) -> StoreResult<Vec<TaxonomyTerm>> {
		Ok(self.terms.iter().map(|entry| entry.value().clone()).collect())
	}
}
