//! Record-store interfaces the rendering core depends on.
//!
//! Persistence is a host concern; the core only needs the query and
//! update capabilities below. [`MemoryStore`] is the reference
//! implementation used in tests and small deployments.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
	BlockId, ContentBlock, LayoutElement, MenuItem, MenuItemId, Node, NodeId, NodeRevision,
	PageType, PageTypeId, TaxonomyTerm, TermId,
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
	/// A targeted update referenced a missing record.
	#[error("record not found: {0}")]
	NotFound(String),

	/// Backend-specific failure.
	#[error("store backend error: {0}")]
	Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Node and page-type records.
///
/// Implementations backed by a shared database are expected to declare a
/// unique index on `(alias, language)`; the alias generator's
/// disambiguation pass is best-effort and not transactionally isolated
/// from concurrent inserts.
#[async_trait]
pub trait NodeStore: Send + Sync {
	/// Insert a node, assigning its id. The given `created` timestamp is
	/// preserved.
	async fn insert_node(&self, node: Node) -> StoreResult<Node>;

	/// Replace a node's record, refreshing its `changed` timestamp.
	async fn update_node(&self, node: Node) -> StoreResult<Node>;

	/// Targeted update of only the alias column.
	async fn update_alias(&self, id: NodeId, alias: &str) -> StoreResult<()>;

	async fn node(&self, id: NodeId) -> StoreResult<Option<Node>>;

	/// All nodes carrying exactly this alias, any language, unordered.
	async fn nodes_by_alias(&self, alias: &str) -> StoreResult<Vec<Node>>;

	/// Number of nodes sharing exactly `(alias, language)`.
	async fn count_alias(&self, alias: &str, language: &str) -> StoreResult<usize>;

	/// Case-insensitive substring search across title, body, summary and
	/// highlight, ordered by id.
	async fn search_nodes(&self, term: &str) -> StoreResult<Vec<Node>>;

	async fn insert_page_type(&self, page_type: PageType) -> StoreResult<PageType>;

	async fn page_type(&self, id: PageTypeId) -> StoreResult<Option<PageType>>;

	async fn add_revision(&self, revision: NodeRevision) -> StoreResult<NodeRevision>;

	/// Revisions of a node, newest first.
	async fn revisions(&self, node: NodeId) -> StoreResult<Vec<NodeRevision>>;
}

/// Content blocks and their layout-element bindings.
#[async_trait]
pub trait LayoutStore: Send + Sync {
	async fn insert_block(&self, block: ContentBlock) -> StoreResult<ContentBlock>;

	async fn block(&self, id: BlockId) -> StoreResult<Option<ContentBlock>>;

	async fn insert_element(&self, element: LayoutElement) -> StoreResult<LayoutElement>;

	/// Non-hidden layout elements of a page type, unordered; the composer
	/// owns the `(region, weight, id)` sort.
	async fn elements_for(&self, page_type: PageTypeId) -> StoreResult<Vec<LayoutElement>>;
}

/// Menu items.
#[async_trait]
pub trait MenuStore: Send + Sync {
	async fn insert_item(&self, item: MenuItem) -> StoreResult<MenuItem>;

	async fn update_item(&self, item: MenuItem) -> StoreResult<MenuItem>;

	async fn item(&self, id: MenuItemId) -> StoreResult<Option<MenuItem>>;

	/// Every menu item, unordered.
	async fn items(&self) -> StoreResult<Vec<MenuItem>>;

	/// Write back a rebuilt item set in one pass.
	async fn replace_items(&self, items: Vec<MenuItem>) -> StoreResult<()>;
}

/// Taxonomy terms.
#[async_trait]
pub trait TaxonomyStore: Send + Sync {
	async fn insert_term(&self, term: TaxonomyTerm) -> StoreResult<TaxonomyTerm>;

	async fn term(&self, id: TermId) -> StoreResult<Option<TaxonomyTerm>>;

	/// Every term, unordered.
	async fn terms(&self) -> StoreResult<Vec<TaxonomyTerm>>;
}
