//! # Coppice
//!
//! A content-management layer for Rust web services: content nodes with
//! canonical URL aliases, hierarchical menus and taxonomy, and a
//! page-rendering pipeline that composes reusable blocks into the named
//! regions of a page-type layout.
//!
//! ## Architecture
//!
//! ```text
//! coppice
//! ├── conf          - site settings (name, languages, transliteration tables)
//! ├── transliterate - ASCII slugs from unicode text
//! ├── sanitize      - HTML escape / strip-tags
//! ├── paths         - slash and language-prefix normalization
//! ├── models        - nodes, revisions, page types, blocks, menus, terms
//! ├── store         - async record-store traits + in-memory implementation
//! ├── alias         - alias generation from page-type patterns
//! ├── resolver      - alias + language -> node resolution
//! ├── menu          - ordered menu tree queries and rebuild
//! ├── taxonomy      - term tree, a signal-block data source
//! ├── signals       - named extension hooks (last non-null response wins)
//! ├── session       - read-once slots and flash messages
//! ├── forms         - contact / login / search binding and validation
//! ├── request       - request-scoped context and auth state
//! ├── templates     - Tera registry with specificity-chain lookup
//! ├── render        - one renderer per block kind
//! ├── compose       - region accumulation and page metadata
//! ├── views         - alias / id / index endpoints and form flows
//! └── checks        - configuration self-checks
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use coppice::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let settings = Arc::new(SiteSettings::with_site_name("Example"));
//! let store = Arc::new(MemoryStore::new());
//!
//! // Define a page type with an alias pattern and create a node.
//! let page_type = store
//! 	.insert_page_type(PageType::new("basic", "Basic page").with_pattern("page/[node:title]"))
//! 	.await
//! 	.unwrap();
//! let generator = AliasGenerator::new(&settings);
//! let node = generator
//! 	.create(
//! 		store.as_ref(),
//! 		Node::new(page_type.id, UserId(1), "Hello World"),
//! 		&page_type,
//! 	)
//! 	.await
//! 	.unwrap();
//! assert_eq!(node.alias, "page/hello-world");
//!
//! // Compose and render the page for a request.
//! let composer = LayoutComposer::new(
//! 	settings,
//! 	Arc::new(TemplateRegistry::with_defaults()),
//! 	Arc::new(SignalRegistry::new()),
//! 	store.clone(),
//! 	store.clone(),
//! 	store,
//! );
//! let views = PageViews::new(composer);
//! let ctx = RequestContext::new("/en/page/hello-world/", "en");
//! let page = views.alias_path("page/hello-world/", &ctx).await.unwrap();
//! assert_eq!(page.title, "Hello World | Example");
//! # });
//! ```

pub mod alias;
pub mod checks;
pub mod compose;
pub mod conf;
pub mod forms;
pub mod menu;
pub mod models;
pub mod paths;
pub mod render;
pub mod request;
pub mod resolver;
pub mod sanitize;
pub mod session;
pub mod signals;
pub mod store;
pub mod taxonomy;
pub mod templates;
pub mod transliterate;
pub mod views;

/// Error taxonomy of the rendering core.
pub mod error {
	use http::StatusCode;
	use thiserror::Error;

	/// Errors surfaced while resolving and composing a page.
	#[derive(Debug, Error)]
	pub enum PageError {
		/// The path resolves to no node; surfaced as HTTP 404.
		#[error("no content found for: {0}")]
		NotFound(String),

		/// The node is unpublished and the requester may not view it;
		/// surfaced as HTTP 403.
		#[error("access denied: {0}")]
		Forbidden(String),

		/// The canonical location differs from the requested one.
		#[error("redirect to {location}")]
		Redirect {
			location: String,
			permanent: bool,
		},

		/// Malformed form submission; recovered by re-rendering with
		/// the submitted values preserved.
		#[error("invalid submission: {0}")]
		Validation(String),

		/// No template exists anywhere in a specificity chain. The base
		/// template always ships, so this is a configuration error.
		#[error("no template found for any of: {0}")]
		MissingTemplate(String),

		/// Template engine failure.
		#[error("template error: {0}")]
		Template(String),

		/// Store backend failure.
		#[error(transparent)]
		Store(#[from] crate::store::StoreError),
	}

	impl PageError {
		/// The HTTP status a host should answer with.
		pub fn status(&self) -> StatusCode {
			match self {
				PageError::NotFound(_) => StatusCode::NOT_FOUND,
				PageError::Forbidden(_) => StatusCode::FORBIDDEN,
				PageError::Redirect { permanent: true, .. } => StatusCode::MOVED_PERMANENTLY,
				PageError::Redirect { permanent: false, .. } => StatusCode::FOUND,
				PageError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
				PageError::MissingTemplate(_) | PageError::Template(_) | PageError::Store(_) => {
					StatusCode::INTERNAL_SERVER_ERROR
				}
			}
		}
	}

	/// Result type of the rendering core.
	pub type PageResult<T> = Result<T, PageError>;
}

pub mod prelude {
	//! Convenient re-exports of commonly used items.

	pub use crate::alias::AliasGenerator;
	pub use crate::compose::{ComposedPage, LayoutComposer};
	pub use crate::conf::{LanguageLabelStyle, SiteSettings};
	pub use crate::error::{PageError, PageResult};
	pub use crate::models::{
		BlockKind, ContentBlock, LayoutElement, MenuItem, MenuItemId, Node, NodeId, PageType,
		PageTypeId, TaxonomyTerm, UserId,
	};
	pub use crate::request::{AuthState, RequestContext, VIEW_UNPUBLISHED};
	pub use crate::resolver::resolve;
	pub use crate::signals::SignalRegistry;
	pub use crate::store::{
		LayoutStore, MemoryStore, MenuStore, NodeStore, StoreError, TaxonomyStore,
	};
	pub use crate::templates::TemplateRegistry;
	pub use crate::views::{AuthBackend, Mailer, PageViews};
}
