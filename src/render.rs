//! Block renderers: one strategy per [`BlockKind`], dispatched by the
//! composer.
//!
//! Renderers are pure functions of the element, its block and the
//! request context. A precondition that does not hold (unpublished
//! target, wrong language, no signal response, empty search query)
//! yields an empty fragment rather than an error.

use crate::compose::LayoutComposer;
use crate::error::PageResult;
use crate::forms::{ContactForm, LoginForm, SearchForm};
use crate::menu::MenuTree;
use crate::models::{BlockKind, ContentBlock, LayoutElement, MenuItemId, Node, NodeId};
use crate::paths::clean_url;
use crate::request::RequestContext;
use crate::session::{CONTACT_FORM_POST, LOGIN_FORM_POST};
use crate::templates::block_suggestions;
use serde_json::{Value, json};
use tera::Context;

fn css_classes(classes: &str) -> String {
	let trimmed = classes.trim();
	if trimmed.is_empty() {
		String::new()
	} else {
		format!(" {trimmed}")
	}
}

fn language_matches(language: &str, requested: &str) -> bool {
	language.is_empty() || language == requested
}

impl LayoutComposer {
	/// Render one layout element's block into a fragment.
	pub(crate) async fn render_block(
		&self,
		element: &LayoutElement,
		block: &ContentBlock,
		node: &Node,
		ctx: &RequestContext,
	) -> PageResult<String> {
		let base = format!("block_{}", block.kind.type_name().replace('-', "_"));
		let chain = block_suggestions(&base, &element.region, &block.name);
		let mut context = Context::new();
		context.insert("classes", &css_classes(&block.classes));

		match &block.kind {
			BlockKind::Static { node: target } => {
				self.render_static(*target, ctx, &chain, context).await
			}
			BlockKind::Menu { item } => self.render_menu(*item, ctx, &chain, context).await,
			BlockKind::Signal { name } => {
				match self.signals.send(name, node, ctx) {
					Some(payload) => {
						context.insert("payload", &payload);
						self.templates.select_render(&chain, &context)
					}
					None => Ok(String::new()),
				}
			}
			BlockKind::Language => {
				context.insert("current", &ctx.language);
				context.insert("languages", &self.language_entries(ctx));
				self.templates.select_render(&chain, &context)
			}
			BlockKind::UserMenu => {
				context.insert(
					"auth",
					&json!({
						"authenticated": ctx.auth.authenticated,
						"superuser": ctx.auth.superuser,
						"staff": ctx.auth.staff,
					}),
				);
				self.templates.select_render(&chain, &context)
			}
			BlockKind::Login => {
				let form = LoginForm::from_session(ctx.session.pop(LOGIN_FORM_POST));
				context.insert("form", &form);
				self.templates.select_render(&chain, &context)
			}
			BlockKind::Search => {
				context.insert("form", &SearchForm::bind(&ctx.query));
				self.templates.select_render(&chain, &context)
			}
			BlockKind::SearchResults => self.render_search_results(ctx, &chain, context).await,
			BlockKind::Contact => {
				let form = ContactForm::from_session(ctx.session.pop(CONTACT_FORM_POST), &ctx.query);
				context.insert("form", &form);
				self.templates.select_render(&chain, &context)
			}
		}
	}

	/// Embed of another node; renders only when the target is published
	/// and its language fits the request.
	async fn render_static(
		&self,
		target: NodeId,
		ctx: &RequestContext,
		chain: &[String],
		mut context: Context,
	) -> PageResult<String> {
		let Some(target) = self.nodes.node(target).await? else {
			tracing::warn!(node = %target, "static block references missing node");
			return Ok(String::new());
		};
		if !language_matches(&target.language, &ctx.language) || !target.status {
			return Ok(String::new());
		}
		context.insert("node", &target);
		self.templates.select_render(chain, &context)
	}

	/// Descendant listing of a menu item, disabled entries filtered.
	async fn render_menu(
		&self,
		item: MenuItemId,
		ctx: &RequestContext,
		chain: &[String],
		mut context: Context,
	) -> PageResult<String> {
		let Some(root) = self.menus.item(item).await? else {
			tracing::warn!(item = %item, "menu block references missing item");
			return Ok(String::new());
		};
		if !language_matches(&root.language, &ctx.language) || root.disabled {
			return Ok(String::new());
		}
		let tree = MenuTree::load(self.menus.as_ref()).await?;
		let trail: Vec<MenuItemId> = tree
			.active_trail(Some(root.id), &ctx.path, &self.settings)
			.iter()
			.map(|entry| entry.id)
			.collect();
		let root_depth = tree.ancestors(root.id, false).len() as i64;
		let items: Vec<Value> = tree
			.descendants(root.id, false)
			.into_iter()
			.filter(|entry| !entry.disabled)
			.map(|entry| {
				let depth = tree.ancestors(entry.id, false).len() as i64 - root_depth - 1;
				json!({
					"title": entry.title,
					"href": entry.full_path(&self.settings),
					"depth": depth,
					"active": trail.contains(&entry.id),
				})
			})
			.collect();
		context.insert("items", &items);
		self.templates.select_render(chain, &context)
	}

	/// Search result listing; empty fragment when no valid `q` is
	/// present.
	async fn render_search_results(
		&self,
		ctx: &RequestContext,
		chain: &[String],
		mut context: Context,
	) -> PageResult<String> {
		let Ok(q) = SearchForm::bind(&ctx.query).validate() else {
			return Ok(String::new());
		};
		let hits = self.nodes.search_nodes(&q).await?;
		tracing::debug!(%q, hits = hits.len(), "search block");
		let nodes: Vec<Value> = hits
			.iter()
			.map(|hit| {
				json!({
					"title": hit.title,
					"url": hit.absolute_url(&self.settings),
					"summary": hit.summary,
				})
			})
			.collect();
		context.insert("q", &q);
		context.insert("nodes", &nodes);
		self.templates.select_render(chain, &context)
	}

	/// Language switcher entries with labels per the configured style.
	fn language_entries(&self, ctx: &RequestContext) -> Vec<Value> {
		use crate::conf::LanguageLabelStyle;

		let path = clean_url(&ctx.path, &self.settings);
		self.settings
			.languages
			.iter()
			.map(|(code, name)| {
				let label = match self.settings.language_menu_labels {
					LanguageLabelStyle::Name => name.clone(),
					LanguageLabelStyle::Code | LanguageLabelStyle::Flag => code.clone(),
				};
				let href = if self.settings.i18n_urls {
					crate::paths::full_path(&path, code, "", &self.settings)
				} else {
					crate::paths::full_path(&path, "", "", &self.settings)
				};
				json!({"code": code, "label": label, "href": href})
			})
			.collect()
	}
}
