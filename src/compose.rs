//! Page composition: ordered layout elements rendered into regions.

use crate::conf::SiteSettings;
use crate::error::{PageError, PageResult};
use crate::models::{Node, PageType};
use crate::request::RequestContext;
use crate::signals::SignalRegistry;
use crate::store::{LayoutStore, MenuStore, NodeStore};
use crate::templates::{TemplateRegistry, content_suggestions};
use crate::transliterate::slug;
use std::collections::BTreeMap;
use std::sync::Arc;
use tera::Context;

/// Result of composing one page: per-region fragments plus the page
/// metadata templates need.
#[derive(Debug, Clone)]
pub struct ComposedPage {
	/// Composed title, site name appended unless the node title equals it.
	pub title: String,
	/// Body CSS classes derived from page type, status and auth state.
	pub classes: String,
	/// Page type machine name, used for whole-page template selection.
	pub page_type: String,
	/// Accumulated fragment output per region, region-sorted.
	pub regions: BTreeMap<String, String>,
	/// Primary content fragment, rendered independently of the layout
	/// elements.
	pub content: String,
}

/// Composes pages from a node, its page type's layout and the block
/// renderers.
pub struct LayoutComposer {
	pub(crate) settings: Arc<SiteSettings>,
	pub(crate) templates: Arc<TemplateRegistry>,
	pub(crate) signals: Arc<SignalRegistry>,
	pub(crate) nodes: Arc<dyn NodeStore>,
	pub(crate) menus: Arc<dyn MenuStore>,
	pub(crate) layout: Arc<dyn LayoutStore>,
}

impl LayoutComposer {
	pub fn new(
		settings: Arc<SiteSettings>,
		templates: Arc<TemplateRegistry>,
		signals: Arc<SignalRegistry>,
		nodes: Arc<dyn NodeStore>,
		menus: Arc<dyn MenuStore>,
		layout: Arc<dyn LayoutStore>,
	) -> Self {
		Self {
			settings,
			templates,
			signals,
			nodes,
			menus,
			layout,
		}
	}

	pub fn settings(&self) -> &SiteSettings {
		&self.settings
	}

	pub fn templates(&self) -> &TemplateRegistry {
		&self.templates
	}

	/// Compose the page for a resolved node.
	///
	/// Layout elements render in `(region, weight, id)` order and append
	/// to their region, so several elements in one region concatenate in
	/// weight order. A failing block degrades to an empty fragment and
	/// never aborts the page; only a missing base template is fatal.
	pub async fn compose_page(
		&self,
		node: &Node,
		ctx: &RequestContext,
	) -> PageResult<ComposedPage> {
		let page_type = self
			.nodes
			.page_type(node.page_type)
			.await?
			.ok_or_else(|| PageError::NotFound(format!("page type {}", node.page_type)))?;

		let mut elements = self.layout.elements_for(node.page_type).await?;
		elements.sort_by_key(|element| (element.region.clone(), element.weight, element.id));
		tracing::debug!(
			node = %node.id,
			page_type = %page_type.name,
			elements = elements.len(),
			"composing page"
		);

		let mut regions: BTreeMap<String, String> = BTreeMap::new();
		for element in elements {
			let slot = regions.entry(element.region.clone()).or_default();
			let block = match self.layout.block(element.block).await? {
				Some(block) => block,
				None => {
					tracing::warn!(element = %element.id, "layout element references missing block");
					continue;
				}
			};
			match self.render_block(&element, &block, node, ctx).await {
				Ok(fragment) => slot.push_str(&fragment),
				Err(fatal @ PageError::MissingTemplate(_)) => return Err(fatal),
				Err(err) => {
					tracing::warn!(
						block = %block.name,
						kind = block.kind.type_name(),
						%err,
						"block render degraded to empty fragment"
					);
				}
			}
		}

		let mut content_context = Context::new();
		content_context.insert("node", node);
		let content = self.templates.select_render(
			&content_suggestions(&page_type.name, node.id.0),
			&content_context,
		)?;

		Ok(ComposedPage {
			title: self.page_title(node),
			classes: self.page_classes(node, &page_type, ctx),
			page_type: page_type.name.clone(),
			regions,
			content,
		})
	}

	/// Node title with the site name appended, unless the node title
	/// already is the site name.
	pub fn page_title(&self, node: &Node) -> String {
		if node.title == self.settings.site_name {
			node.title.clone()
		} else {
			format!("{} | {}", node.title, self.settings.site_name)
		}
	}

	/// Body CSS classes: page type, content marker, publication status,
	/// language and auth flags.
	pub fn page_classes(&self, node: &Node, page_type: &PageType, ctx: &RequestContext) -> String {
		let status = if node.status {
			"published"
		} else {
			"unpublished"
		};
		let mut classes: Vec<String> = [page_type.name.as_str(), "content", status]
			.iter()
			.map(|part| format!("page-{}", slug(part)))
			.collect();
		if !ctx.language.is_empty() {
			classes.push(format!("i18n-{}", ctx.language));
		}
		if ctx.auth.authenticated {
			classes.push("logged-in".to_string());
		}
		if ctx.auth.superuser {
			classes.push("superuser".to_string());
		}
		if ctx.auth.staff {
			classes.push("toolbar".to_string());
		}
		classes.join(" ")
	}
}
