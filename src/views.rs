//! Inbound endpoints: node rendering by alias or id, and the contact,
//! login, logout and menu-rebuild flows.
//!
//! The host router hands over `(normalized path, language)` and maps the
//! error taxonomy back to HTTP: `NotFound` to 404, `Forbidden` to 403,
//! `Redirect` to a permanent redirect, everything else to 500.

use crate::compose::{ComposedPage, LayoutComposer};
use crate::error::{PageError, PageResult};
use crate::forms::{ContactForm, ContactSubmission, LoginForm, PostData, RedirectForm};
use crate::menu;
use crate::models::{Node, NodeId, UserId};
use crate::paths::full_path;
use crate::request::{RequestContext, VIEW_UNPUBLISHED};
use crate::resolver;
use crate::session::{CONTACT_FORM_POST, LOGIN_FORM_POST};
use crate::templates::page_suggestions;
use async_trait::async_trait;
use std::sync::Arc;
use tera::Context;

/// Outbound mail delivery, provided by the host.
#[async_trait]
pub trait Mailer: Send + Sync {
	async fn send_contact(&self, submission: &ContactSubmission) -> anyhow::Result<()>;
}

/// An authenticated account as reported by the host's credential check.
#[derive(Debug, Clone)]
pub struct AuthUser {
	pub id: UserId,
	pub username: String,
	pub active: bool,
}

/// Credential verification, provided by the host.
#[async_trait]
pub trait AuthBackend: Send + Sync {
	async fn authenticate(&self, username: &str, password: &str)
	-> anyhow::Result<Option<AuthUser>>;
}

/// The public view surface over the composition core.
pub struct PageViews {
	composer: LayoutComposer,
	mailer: Option<Arc<dyn Mailer>>,
	auth_backend: Option<Arc<dyn AuthBackend>>,
}

impl PageViews {
	pub fn new(composer: LayoutComposer) -> Self {
		Self {
			composer,
			mailer: None,
			auth_backend: None,
		}
	}

	pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
		self.mailer = Some(mailer);
		self
	}

	pub fn with_auth_backend(mut self, backend: Arc<dyn AuthBackend>) -> Self {
		self.auth_backend = Some(backend);
		self
	}

	pub fn composer(&self) -> &LayoutComposer {
		&self.composer
	}

	/// Front page: the node aliased to `/`.
	pub async fn index(&self, ctx: &RequestContext) -> PageResult<ComposedPage> {
		let node = resolver::resolve(self.composer.nodes.as_ref(), "/", &ctx.language).await?;
		self.check_visible(&node, ctx)?;
		self.composer.compose_page(&node, ctx).await
	}

	/// Content by numeric id, permanently redirected to the canonical
	/// alias when one exists.
	pub async fn content_by_id(
		&self,
		id: NodeId,
		ctx: &RequestContext,
	) -> PageResult<ComposedPage> {
		let node = self
			.composer
			.nodes
			.node(id)
			.await?
			.ok_or_else(|| PageError::NotFound(format!("cms/content/{id}")))?;
		if !node.alias.is_empty() {
			return Err(PageError::Redirect {
				location: node.absolute_url(self.composer.settings()),
				permanent: true,
			});
		}
		self.check_visible(&node, ctx)?;
		self.composer.compose_page(&node, ctx).await
	}

	/// Content by alias. The canonical form carries a trailing slash;
	/// anything else redirects permanently, as do redirect-flagged nodes.
	pub async fn alias_path(&self, raw: &str, ctx: &RequestContext) -> PageResult<ComposedPage> {
		let settings = self.composer.settings();
		if !raw.ends_with('/') {
			return Err(PageError::Redirect {
				location: full_path(raw, &ctx.language, "", settings),
				permanent: true,
			});
		}
		let alias = raw.trim_end_matches('/');
		if alias.is_empty() {
			return Err(PageError::Redirect {
				location: "/".to_string(),
				permanent: true,
			});
		}
		let node = resolver::resolve(self.composer.nodes.as_ref(), alias, &ctx.language).await?;
		self.check_visible(&node, ctx)?;
		if node.redirect {
			return Err(PageError::Redirect {
				location: node.redirect_path(settings),
				permanent: true,
			});
		}
		self.composer.compose_page(&node, ctx).await
	}

	/// Render a composed page to HTML with the page-type template chain,
	/// draining queued flash messages into the context.
	pub fn render_html(&self, page: &ComposedPage, ctx: &RequestContext) -> PageResult<String> {
		let settings = self.composer.settings();
		let messages: Vec<serde_json::Value> = ctx
			.messages
			.drain()
			.into_iter()
			.map(|message| {
				serde_json::json!({"level": message.level.tag(), "text": message.text})
			})
			.collect();
		let mut context = Context::new();
		context.insert("title", &page.title);
		context.insert("classes", &page.classes);
		context.insert("language", &ctx.language);
		context.insert("author", &settings.site_author);
		context.insert("keywords", &settings.site_keywords);
		context.insert("regions", &page.regions);
		context.insert("content", &page.content);
		context.insert("messages", &messages);
		self.composer
			.templates()
			.select_render(&page_suggestions(&page.page_type), &context)
	}

	/// Contact form submission; returns the redirect target.
	///
	/// An invalid submission stashes the raw payload in the read-once
	/// session slot so the re-rendered form repopulates, and flashes a
	/// warning instead of failing.
	pub async fn contact_post(&self, ctx: &RequestContext, post: &PostData) -> PageResult<String> {
		let form = ContactForm::bind(post);
		match form.validate() {
			Ok(submission) => {
				match &self.mailer {
					Some(mailer) => match mailer.send_contact(&submission).await {
						Ok(()) => ctx.messages.success(
							"A message has been sent to the site using the contact form.",
						),
						Err(err) => {
							tracing::warn!(%err, "contact mail delivery failed");
							ctx.messages
								.error("Contact form message has NOT been sent.");
						}
					},
					None => {
						tracing::warn!("contact form posted without a configured mailer");
						ctx.messages
							.error("Contact form message has NOT been sent.");
					}
				}
				Ok(submission.redirect)
			}
			Err(_) => {
				ctx.messages.warning(
					"Contact form message has NOT been sent. \
					 Please fill in all contact form fields.",
				);
				ctx.session
					.insert(CONTACT_FORM_POST, serde_json::to_value(post).unwrap_or_default());
				Ok(RedirectForm::bind(post).fallback_target())
			}
		}
	}

	/// Login form submission; returns the redirect target. The host owns
	/// the actual session establishment.
	pub async fn login_post(&self, ctx: &RequestContext, post: &PostData) -> PageResult<String> {
		let form = LoginForm::bind(post);
		match form.validate() {
			Ok(submission) => {
				match &self.auth_backend {
					Some(backend) => {
						match backend
							.authenticate(&submission.username, &submission.password)
							.await
						{
							Ok(Some(user)) if user.active => {
								ctx.messages
									.success(format!("Login successful for {}.", user.username));
							}
							Ok(Some(_)) => {
								ctx.messages.warning(
									"The account is disabled. \
									 Please use the contact form for more information.",
								);
							}
							Ok(None) => {
								ctx.messages.warning(
									"Unfortunately the username or password are not correct.",
								);
							}
							Err(err) => {
								tracing::warn!(%err, "credential check failed");
								ctx.messages.error("Login is temporarily unavailable.");
							}
						}
					}
					None => {
						tracing::warn!("login posted without a configured auth backend");
						ctx.messages.error("Login is temporarily unavailable.");
					}
				}
				Ok(submission.redirect)
			}
			Err(_) => {
				ctx.messages.warning("Please fill in all login form fields.");
				ctx.session
					.insert(LOGIN_FORM_POST, serde_json::to_value(post).unwrap_or_default());
				Ok(RedirectForm::bind(post).fallback_target())
			}
		}
	}

	/// Logout submission; returns the redirect target.
	pub async fn logout_post(&self, ctx: &RequestContext, post: &PostData) -> PageResult<String> {
		let form = RedirectForm::bind(post);
		match form.validate() {
			Ok(target) => {
				ctx.messages.success("Logout successful.");
				Ok(target)
			}
			Err(_) => Ok(form.fallback_target()),
		}
	}

	/// Recompute menu tree metadata after bulk edits; staff only.
	pub async fn rebuild_menus(&self, ctx: &RequestContext) -> PageResult<()> {
		if !ctx.auth.staff {
			return Err(PageError::Forbidden("menu rebuild".to_string()));
		}
		menu::rebuild(self.composer.menus.as_ref()).await?;
		ctx.messages.success("Menu has been rebuilt.");
		Ok(())
	}

	fn check_visible(&self, node: &Node, ctx: &RequestContext) -> PageResult<()> {
		if !node.status && !ctx.auth.has_capability(VIEW_UNPUBLISHED) {
			tracing::debug!(node = %node.id, "unpublished node denied");
			return Err(PageError::Forbidden(format!("node {}", node.id)));
		}
		Ok(())
	}
}
