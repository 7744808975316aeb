//! URL alias resolution: path plus language to a single content node.

use crate::error::{PageError, PageResult};
use crate::models::Node;
use crate::store::NodeStore;
use std::cmp::Reverse;

/// Resolve a normalized path to the node owning that alias.
///
/// The path must already be stripped of leading and trailing slashes;
/// matching is exact. Candidates are limited to the requested language
/// and language-neutral nodes, ordered language-descending then
/// id-ascending, so a language-specific node outranks a neutral one and
/// duplicate data still resolves deterministically to the lowest id.
pub async fn resolve(store: &dyn NodeStore, path: &str, language: &str) -> PageResult<Node> {
	tracing::debug!(path, language, "resolving alias");
	let mut candidates: Vec<Node> = store
		.nodes_by_alias(path)
		.await?
		.into_iter()
		.filter(|node| node.language == language || node.language.is_empty())
		.collect();
	candidates.sort_by_key(|node| (Reverse(node.language.clone()), node.id));
	candidates
		.into_iter()
		.next()
		.ok_or_else(|| PageError::NotFound(path.to_string()))
}
