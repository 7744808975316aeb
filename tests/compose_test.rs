//! Layout composition: region accumulation, block dispatch and
//! degradation behavior.

use coppice::compose::LayoutComposer;
use coppice::conf::SiteSettings;
use coppice::models::{
	BlockId, BlockKind, ContentBlock, LayoutElement, MenuItem, Node, PageType, PageTypeId, UserId,
};
use coppice::request::RequestContext;
use coppice::session::LOGIN_FORM_POST;
use coppice::signals::SignalRegistry;
use coppice::store::{LayoutStore, MemoryStore, MenuStore, NodeStore};
use coppice::templates::TemplateRegistry;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

struct Fixture {
	store: Arc<MemoryStore>,
	signals: Arc<SignalRegistry>,
	composer: LayoutComposer,
	page_type: PageType,
	node: Node,
}

async fn fixture() -> Fixture {
	let settings = Arc::new(SiteSettings::with_site_name("Acme"));
	let store = Arc::new(MemoryStore::new());
	let signals = Arc::new(SignalRegistry::new());
	let composer = LayoutComposer::new(
		settings,
		Arc::new(TemplateRegistry::with_defaults()),
		signals.clone(),
		store.clone(),
		store.clone(),
		store.clone(),
	);
	let page_type = store
		.insert_page_type(PageType::new("basic", "Basic page"))
		.await
		.unwrap();
	let node = store
		.insert_node(Node::new(page_type.id, UserId(1), "Front").with_alias("/"))
		.await
		.unwrap();
	Fixture {
		store,
		signals,
		composer,
		page_type,
		node,
	}
}

async fn static_block(store: &MemoryStore, page_type: PageTypeId, title: &str) -> BlockId {
	let target = store
		.insert_node(
			Node::new(page_type, UserId(1), title).with_body(format!("<p>{title} body</p>")),
		)
		.await
		.unwrap();
	store
		.insert_block(ContentBlock::new(
			format!("embed {title}"),
			BlockKind::Static { node: target.id },
		))
		.await
		.unwrap()
		.id
}

#[tokio::test]
async fn test_lower_weight_renders_first_within_region() {
	let fx = fixture().await;
	let first = static_block(&fx.store, fx.page_type.id, "First").await;
	let second = static_block(&fx.store, fx.page_type.id, "Second").await;
	let other = static_block(&fx.store, fx.page_type.id, "Elsewhere").await;

	// Insert in reverse weight order; composition must reorder.
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "sidebar", second, 1))
		.await
		.unwrap();
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "sidebar", first, 0))
		.await
		.unwrap();
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "footer", other, 0))
		.await
		.unwrap();

	let ctx = RequestContext::new("/", "en");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();

	let sidebar = &page.regions["sidebar"];
	assert!(sidebar.find("First").unwrap() < sidebar.find("Second").unwrap());
	assert!(page.regions["footer"].contains("Elsewhere"));
	assert!(!page.regions["footer"].contains("First"));
}

#[tokio::test]
async fn test_hidden_elements_are_skipped() {
	let fx = fixture().await;
	let block = static_block(&fx.store, fx.page_type.id, "Visible").await;
	let ghost = static_block(&fx.store, fx.page_type.id, "Ghost").await;

	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "main", block, 0))
		.await
		.unwrap();
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "main", ghost, 1).hidden())
		.await
		.unwrap();

	let ctx = RequestContext::new("/", "en");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert!(page.regions["main"].contains("Visible"));
	assert!(!page.regions["main"].contains("Ghost"));
}

#[tokio::test]
async fn test_static_block_gates_on_language_and_status() {
	let fx = fixture().await;

	let greek = fx
		.store
		.insert_node(Node::new(fx.page_type.id, UserId(1), "Greek only").with_language("el"))
		.await
		.unwrap();
	let unpublished = fx
		.store
		.insert_node(Node::new(fx.page_type.id, UserId(1), "Hidden draft").with_status(false))
		.await
		.unwrap();
	for (name, target) in [("greek", greek.id), ("draft", unpublished.id)] {
		let block = fx
			.store
			.insert_block(ContentBlock::new(name, BlockKind::Static { node: target }))
			.await
			.unwrap();
		fx.store
			.insert_element(LayoutElement::new(fx.page_type.id, "main", block.id, 0))
			.await
			.unwrap();
	}

	let ctx = RequestContext::new("/", "en");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	// Region key exists but both fragments degraded to empty.
	assert_eq!(page.regions["main"], "");

	let ctx = RequestContext::new("/", "el");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert!(page.regions["main"].contains("Greek only"));
}

#[tokio::test]
async fn test_signal_block_last_non_null_wins() {
	let fx = fixture().await;
	fx.signals
		.connect("featured", |_| Some(json!("X")));
	fx.signals
		.connect("featured", |_| Some(json!("Y")));
	fx.signals.connect("featured", |_| None);

	let block = fx
		.store
		.insert_block(ContentBlock::new(
			"featured",
			BlockKind::Signal {
				name: "featured".to_string(),
			},
		))
		.await
		.unwrap();
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "main", block.id, 0))
		.await
		.unwrap();

	let ctx = RequestContext::new("/", "en");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert!(page.regions["main"].contains("Y"));
	assert!(!page.regions["main"].contains("X"));
}

#[tokio::test]
async fn test_signal_block_can_surface_taxonomy_terms() {
	use coppice::store::TaxonomyStore;
	use coppice::taxonomy::TermTree;

	let fx = fixture().await;
	fx.store
		.insert_term(coppice::models::TaxonomyTerm::new("Announcements"))
		.await
		.unwrap();
	let terms = TermTree::load(fx.store.as_ref()).await.unwrap().to_value();
	fx.signals
		.connect("terms", move |_| Some(terms.clone()));

	let block = fx
		.store
		.insert_block(ContentBlock::new(
			"term list",
			BlockKind::Signal {
				name: "terms".to_string(),
			},
		))
		.await
		.unwrap();
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "footer", block.id, 0))
		.await
		.unwrap();

	let ctx = RequestContext::new("/", "en");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert!(page.regions["footer"].contains("Announcements"));
}

#[tokio::test]
async fn test_signal_without_listeners_is_empty() {
	let fx = fixture().await;
	let block = fx
		.store
		.insert_block(ContentBlock::new(
			"silent",
			BlockKind::Signal {
				name: "nobody-listens".to_string(),
			},
		))
		.await
		.unwrap();
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "main", block.id, 0))
		.await
		.unwrap();

	let ctx = RequestContext::new("/", "en");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert_eq!(page.regions["main"], "");
}

#[tokio::test]
async fn test_menu_block_lists_enabled_descendants() {
	let fx = fixture().await;
	let root = fx.store.insert_item(MenuItem::new("Main", "")).await.unwrap();
	fx.store
		.insert_item(
			MenuItem::new("About", "about")
				.with_parent(root.id)
				.with_weight(0)
				.with_language("en"),
		)
		.await
		.unwrap();
	fx.store
		.insert_item(
			MenuItem::new("Secret", "secret")
				.with_parent(root.id)
				.with_weight(1)
				.disabled(),
		)
		.await
		.unwrap();

	let block = fx
		.store
		.insert_block(ContentBlock::new(
			"main menu",
			BlockKind::Menu { item: root.id },
		))
		.await
		.unwrap();
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "header", block.id, 0))
		.await
		.unwrap();

	let ctx = RequestContext::new("/en/about/", "en");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	let header = &page.regions["header"];
	assert!(header.contains("About"));
	assert!(header.contains("/en/about/"));
	assert!(header.contains("active"));
	assert!(!header.contains("Secret"));
}

#[tokio::test]
async fn test_search_results_block_matches_all_text_fields() {
	let fx = fixture().await;
	fx.store
		.insert_node(
			Node::new(fx.page_type.id, UserId(1), "Guide")
				.with_summary("a needle in the summary")
				.with_alias("guide"),
		)
		.await
		.unwrap();
	let block = fx
		.store
		.insert_block(ContentBlock::new("results", BlockKind::SearchResults))
		.await
		.unwrap();
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "main", block.id, 0))
		.await
		.unwrap();

	let ctx = RequestContext::new("/search/", "en")
		.with_query(HashMap::from([("q".to_string(), "NEEDLE".to_string())]));
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert!(page.regions["main"].contains("Results for NEEDLE"));
	assert!(page.regions["main"].contains("Guide"));

	// Without a query the block renders nothing.
	let ctx = RequestContext::new("/search/", "en");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert_eq!(page.regions["main"], "");
}

#[tokio::test]
async fn test_login_block_repopulates_read_once() {
	let fx = fixture().await;
	let block = fx
		.store
		.insert_block(ContentBlock::new("login box", BlockKind::Login))
		.await
		.unwrap();
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "sidebar", block.id, 0))
		.await
		.unwrap();

	let ctx = RequestContext::new("/", "en");
	ctx.session.insert(
		LOGIN_FORM_POST,
		json!({"username": "kim", "password": "secret", "redirect": "/"}),
	);

	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert!(page.regions["sidebar"].contains("value=\"kim\""));
	// The password never reappears and the slot is consumed.
	assert!(!page.regions["sidebar"].contains("secret"));
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert!(page.regions["sidebar"].contains("value=\"\""));
}

#[tokio::test]
async fn test_missing_block_reference_degrades() {
	let fx = fixture().await;
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "main", BlockId(999), 0))
		.await
		.unwrap();

	let ctx = RequestContext::new("/", "en");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert_eq!(page.regions["main"], "");
}

#[tokio::test]
async fn test_content_fragment_uses_page_type_override() {
	let fx = fixture().await;
	fx.composer
		.templates()
		.register("content_basic", "OVERRIDE {{ node.title }}")
		.unwrap();

	let ctx = RequestContext::new("/", "en");
	let page = fx.composer.compose_page(&fx.node, &ctx).await.unwrap();
	assert_eq!(page.content, "OVERRIDE Front");
}

#[tokio::test]
async fn test_language_block_labels_by_style() {
	let settings = SiteSettings {
		languages: vec![
			("en".to_string(), "English".to_string()),
			("el".to_string(), "Greek".to_string()),
		],
		..SiteSettings::with_site_name("Acme")
	};
	let store = Arc::new(MemoryStore::new());
	let composer = LayoutComposer::new(
		Arc::new(settings),
		Arc::new(TemplateRegistry::with_defaults()),
		Arc::new(SignalRegistry::new()),
		store.clone(),
		store.clone(),
		store.clone(),
	);
	let page_type = store
		.insert_page_type(PageType::new("basic", "Basic page"))
		.await
		.unwrap();
	let node = store
		.insert_node(Node::new(page_type.id, UserId(1), "Front").with_alias("/"))
		.await
		.unwrap();
	let block = store
		.insert_block(ContentBlock::new("switcher", BlockKind::Language))
		.await
		.unwrap();
	store
		.insert_element(LayoutElement::new(page_type.id, "header", block.id, 0))
		.await
		.unwrap();

	let ctx = RequestContext::new("/en/about/", "en");
	let page = composer.compose_page(&node, &ctx).await.unwrap();
	let header = &page.regions["header"];
	assert!(header.contains("English"));
	assert!(header.contains("Greek"));
	assert!(header.contains("/el/about/"));
}
