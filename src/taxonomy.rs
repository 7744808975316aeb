//! Taxonomy term tree; one of the data sources available to signal
//! blocks.

use crate::models::{NodeId, TaxonomyTerm, TermId};
use crate::store::{StoreResult, TaxonomyStore};

/// Snapshot of the term tree, loaded from a [`TaxonomyStore`].
pub struct TermTree {
	terms: Vec<TaxonomyTerm>,
}

impl TermTree {
	pub async fn load(store: &dyn TaxonomyStore) -> StoreResult<Self> {
		Ok(Self::from_terms(store.terms().await?))
	}

	pub fn from_terms(mut terms: Vec<TaxonomyTerm>) -> Self {
		terms.sort_by_key(|term| (term.weight, term.id));
		Self { terms }
	}

	pub fn get(&self, id: TermId) -> Option<&TaxonomyTerm> {
		self.terms.iter().find(|term| term.id == id)
	}

	/// Descendant terms in depth-first sibling order (ascending weight,
	/// id tie-break).
	pub fn descendants(&self, id: TermId, include_self: bool) -> Vec<&TaxonomyTerm> {
		let mut out = Vec::new();
		if include_self {
			if let Some(term) = self.get(id) {
				out.push(term);
			}
		}
		self.collect(id, &mut out);
		out
	}

	fn collect<'a>(&'a self, id: TermId, out: &mut Vec<&'a TaxonomyTerm>) {
		for child in self.terms.iter().filter(|term| term.parent == Some(id)) {
			out.push(child);
			self.collect(child.id, out);
		}
	}

	/// Ancestors of a term, root first.
	pub fn ancestors(&self, id: TermId, include_self: bool) -> Vec<&TaxonomyTerm> {
		let mut chain = Vec::new();
		let mut current = self.get(id);
		if let Some(term) = current {
			if include_self {
				chain.push(term);
			}
			current = term.parent.and_then(|parent| self.get(parent));
		}
		while let Some(term) = current {
			chain.push(term);
			current = term.parent.and_then(|parent| self.get(parent));
		}
		chain.reverse();
		chain
	}

	/// Terms tagging the given node, in tree order.
	pub fn terms_for_node(&self, node: NodeId) -> Vec<&TaxonomyTerm> {
		self.terms
			.iter()
			.filter(|term| term.nodes.contains(&node))
			.collect()
	}

	/// Serializable form of the whole tree, for signal handlers that
	/// surface term listings to templates.
	pub fn to_value(&self) -> serde_json::Value {
		serde_json::to_value(&self.terms).unwrap_or(serde_json::Value::Null)
	}
}
