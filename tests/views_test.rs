//! Endpoint behavior: canonical redirects, permissions and form flows.

use async_trait::async_trait;
use coppice::compose::LayoutComposer;
use coppice::conf::SiteSettings;
use coppice::error::PageError;
use coppice::forms::{ContactSubmission, PostData};
use coppice::models::{
	BlockKind, ContentBlock, LayoutElement, MenuItem, Node, NodeId, PageType, UserId,
};
use coppice::request::{AuthState, RequestContext, VIEW_UNPUBLISHED};
use coppice::session::{CONTACT_FORM_POST, Level};
use coppice::signals::SignalRegistry;
use coppice::store::{LayoutStore, MemoryStore, MenuStore, NodeStore};
use coppice::templates::TemplateRegistry;
use coppice::views::{AuthBackend, AuthUser, Mailer, PageViews};
use http::StatusCode;
use parking_lot::Mutex;
use std::sync::Arc;

struct Fixture {
	store: Arc<MemoryStore>,
	views: PageViews,
	page_type: PageType,
}

async fn fixture() -> Fixture {
	let settings = Arc::new(SiteSettings::with_site_name("Acme"));
	let store = Arc::new(MemoryStore::new());
	let composer = LayoutComposer::new(
		settings,
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
	Fixture {
		store,
		views: PageViews::new(composer),
		page_type,
	}
}

#[derive(Default)]
struct RecordingMailer {
	sent: Mutex<Vec<ContactSubmission>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
	async fn send_contact(&self, submission: &ContactSubmission) -> anyhow::Result<()> {
		self.sent.lock().push(submission.clone());
		Ok(())
	}
}

struct SingleUserBackend;

#[async_trait]
impl AuthBackend for SingleUserBackend {
	async fn authenticate(
		&self,
		username: &str,
		password: &str,
	) -> anyhow::Result<Option<AuthUser>> {
		if username == "kim" && password == "correct" {
			Ok(Some(AuthUser {
				id: UserId(1),
				username: username.to_string(),
				active: true,
			}))
		} else if username == "dormant" {
			Ok(Some(AuthUser {
				id: UserId(2),
				username: username.to_string(),
				active: false,
			}))
		} else {
			Ok(None)
		}
	}
}

#[tokio::test]
async fn test_numeric_id_redirects_to_canonical_alias() {
	let fx = fixture().await;
	let node = fx
		.store
		.insert_node(Node::new(fx.page_type.id, UserId(1), "About").with_alias("about"))
		.await
		.unwrap();

	let ctx = RequestContext::new("/cms/content/1/", "en");
	let err = fx.views.content_by_id(node.id, &ctx).await.unwrap_err();
	match err {
		PageError::Redirect {
			location,
			permanent,
		} => {
			assert_eq!(location, "/about/");
			assert!(permanent);
		}
		other => panic!("expected redirect, got {other:?}"),
	}
}

#[tokio::test]
async fn test_numeric_id_renders_when_no_alias() {
	let fx = fixture().await;
	let node = fx
		.store
		.insert_node(Node::new(fx.page_type.id, UserId(1), "Unaliased"))
		.await
		.unwrap();

	let ctx = RequestContext::new("/cms/content/1/", "en");
	let page = fx.views.content_by_id(node.id, &ctx).await.unwrap();
	assert_eq!(page.title, "Unaliased | Acme");
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
	let fx = fixture().await;
	let ctx = RequestContext::new("/cms/content/99/", "en");
	let err = fx.views.content_by_id(NodeId(99), &ctx).await.unwrap_err();
	assert!(matches!(err, PageError::NotFound(_)));
	assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_trailing_slash_redirects() {
	let fx = fixture().await;
	let ctx = RequestContext::new("/en/about", "en");
	let err = fx.views.alias_path("about", &ctx).await.unwrap_err();
	match err {
		PageError::Redirect {
			location,
			permanent,
		} => {
			assert_eq!(location, "/en/about/");
			assert!(permanent);
		}
		other => panic!("expected redirect, got {other:?}"),
	}
}

#[tokio::test]
async fn test_unpublished_forbidden_for_anonymous_only() {
	let fx = fixture().await;
	fx.store
		.insert_node(
			Node::new(fx.page_type.id, UserId(1), "Draft")
				.with_alias("draft")
				.with_status(false),
		)
		.await
		.unwrap();

	let ctx = RequestContext::new("/draft/", "en");
	let err = fx.views.alias_path("draft/", &ctx).await.unwrap_err();
	assert!(matches!(err, PageError::Forbidden(_)));
	assert_eq!(err.status(), StatusCode::FORBIDDEN);

	let ctx = RequestContext::new("/draft/", "en")
		.with_auth(AuthState::user(UserId(2)).with_capability(VIEW_UNPUBLISHED));
	let page = fx.views.alias_path("draft/", &ctx).await.unwrap();
	assert!(page.classes.contains("page-unpublished"));
}

#[tokio::test]
async fn test_redirect_flagged_node_redirects_to_link() {
	let fx = fixture().await;
	fx.store
		.insert_node(
			Node::new(fx.page_type.id, UserId(1), "Old home")
				.with_alias("old")
				.with_language("en")
				.with_link("new-home")
				.with_redirect(true),
		)
		.await
		.unwrap();

	let ctx = RequestContext::new("/en/old/", "en");
	let err = fx.views.alias_path("old/", &ctx).await.unwrap_err();
	match err {
		PageError::Redirect { location, .. } => assert_eq!(location, "/en/new-home/"),
		other => panic!("expected redirect, got {other:?}"),
	}
}

#[tokio::test]
async fn test_index_serves_front_page_alias() {
	let fx = fixture().await;
	fx.store
		.insert_node(Node::new(fx.page_type.id, UserId(1), "Welcome").with_alias("/"))
		.await
		.unwrap();

	let ctx = RequestContext::new("/", "en");
	let page = fx.views.index(&ctx).await.unwrap();
	assert_eq!(page.title, "Welcome | Acme");
}

#[tokio::test]
async fn test_index_without_front_page_is_not_found() {
	let fx = fixture().await;
	let ctx = RequestContext::new("/", "en");
	let err = fx.views.index(&ctx).await.unwrap_err();
	assert!(matches!(err, PageError::NotFound(_)));
}

#[tokio::test]
async fn test_render_html_full_page() {
	let fx = fixture().await;
	fx.store
		.insert_node(Node::new(fx.page_type.id, UserId(1), "About").with_alias("about"))
		.await
		.unwrap();
	let block = fx
		.store
		.insert_block(ContentBlock::new("login box", BlockKind::Login))
		.await
		.unwrap();
	fx.store
		.insert_element(LayoutElement::new(fx.page_type.id, "sidebar", block.id, 0))
		.await
		.unwrap();

	let ctx = RequestContext::new("/about/", "en");
	ctx.messages.success("saved");
	let page = fx.views.alias_path("about/", &ctx).await.unwrap();
	let html = fx.views.render_html(&page, &ctx).unwrap();

	assert!(html.contains("<title>About | Acme</title>"));
	assert!(html.contains("region-sidebar"));
	assert!(html.contains("block-login"));
	assert!(html.contains("alert-success"));
	// Messages drain on render.
	assert!(ctx.messages.peek().is_empty());
}

#[tokio::test]
async fn test_contact_post_valid_sends_mail() {
	let fx = fixture().await;
	let mailer = Arc::new(RecordingMailer::default());
	let views = {
		let settings = Arc::new(SiteSettings::with_site_name("Acme"));
		let composer = LayoutComposer::new(
			settings,
			Arc::new(TemplateRegistry::with_defaults()),
			Arc::new(SignalRegistry::new()),
			fx.store.clone(),
			fx.store.clone(),
			fx.store.clone(),
		);
		PageViews::new(composer).with_mailer(mailer.clone())
	};

	let post = PostData::from([
		("sender_name".to_string(), "Kim".to_string()),
		("sender_email".to_string(), "kim@example.org".to_string()),
		("subject".to_string(), "Hello".to_string()),
		("message".to_string(), "A question".to_string()),
		("redirect".to_string(), "/contact/".to_string()),
	]);
	let ctx = RequestContext::new("/contact/", "en");
	let target = views.contact_post(&ctx, &post).await.unwrap();

	assert_eq!(target, "/contact/");
	let sent = mailer.sent.lock();
	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].subject, "[Website Feedback] Hello");
	assert_eq!(ctx.messages.peek()[0].level, Level::Success);
}

#[tokio::test]
async fn test_contact_post_invalid_stashes_payload() {
	let fx = fixture().await;
	let post = PostData::from([
		("sender_name".to_string(), "Kim".to_string()),
		("redirect".to_string(), "/contact/".to_string()),
	]);
	let ctx = RequestContext::new("/contact/", "en");
	let target = fx.views.contact_post(&ctx, &post).await.unwrap();

	assert_eq!(target, "/contact/");
	assert_eq!(ctx.messages.peek()[0].level, Level::Warning);
	// The raw payload waits in the read-once slot for re-rendering.
	let stashed = ctx.session.pop(CONTACT_FORM_POST).unwrap();
	assert_eq!(stashed["sender_name"], "Kim");
	assert!(ctx.session.pop(CONTACT_FORM_POST).is_none());
}

#[tokio::test]
async fn test_login_post_flows() {
	let fx = fixture().await;
	let views = {
		let settings = Arc::new(SiteSettings::with_site_name("Acme"));
		let composer = LayoutComposer::new(
			settings,
			Arc::new(TemplateRegistry::with_defaults()),
			Arc::new(SignalRegistry::new()),
			fx.store.clone(),
			fx.store.clone(),
			fx.store.clone(),
		);
		PageViews::new(composer).with_auth_backend(Arc::new(SingleUserBackend))
	};

	let valid = PostData::from([
		("username".to_string(), "kim".to_string()),
		("password".to_string(), "correct".to_string()),
		("redirect".to_string(), "/".to_string()),
	]);
	let ctx = RequestContext::new("/", "en");
	views.login_post(&ctx, &valid).await.unwrap();
	assert_eq!(ctx.messages.drain()[0].level, Level::Success);

	let wrong = PostData::from([
		("username".to_string(), "kim".to_string()),
		("password".to_string(), "wrong".to_string()),
		("redirect".to_string(), "/".to_string()),
	]);
	views.login_post(&ctx, &wrong).await.unwrap();
	assert_eq!(ctx.messages.drain()[0].level, Level::Warning);

	let disabled = PostData::from([
		("username".to_string(), "dormant".to_string()),
		("password".to_string(), "anything".to_string()),
		("redirect".to_string(), "/".to_string()),
	]);
	views.login_post(&ctx, &disabled).await.unwrap();
	assert_eq!(ctx.messages.drain()[0].level, Level::Warning);
}

#[tokio::test]
async fn test_logout_post_redirects_with_message() {
	let fx = fixture().await;
	let post = PostData::from([("redirect".to_string(), "/".to_string())]);
	let ctx = RequestContext::new("/", "en");
	let target = fx.views.logout_post(&ctx, &post).await.unwrap();
	assert_eq!(target, "/");
	assert_eq!(ctx.messages.peek()[0].level, Level::Success);
}

#[tokio::test]
async fn test_rebuild_menus_requires_staff() {
	let fx = fixture().await;
	let root = fx.store.insert_item(MenuItem::new("Main", "")).await.unwrap();
	fx.store
		.insert_item(MenuItem::new("Child", "child").with_parent(root.id))
		.await
		.unwrap();

	let ctx = RequestContext::new("/cms/status/", "en");
	let err = fx.views.rebuild_menus(&ctx).await.unwrap_err();
	assert!(matches!(err, PageError::Forbidden(_)));

	let ctx = RequestContext::new("/cms/status/", "en")
		.with_auth(AuthState::user(UserId(1)).with_staff());
	fx.views.rebuild_menus(&ctx).await.unwrap();
	let stored = fx.store.item(root.id).await.unwrap().unwrap();
	assert_eq!(stored.rght, 4);
}
