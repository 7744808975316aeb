//! Named extension hooks feeding signal blocks.
//!
//! Handlers are injected into the registry at construction time; a
//! signal block dispatches its configured name and renders the last
//! non-null response, so later-registered handlers override earlier
//! ones.

use crate::models::Node;
use crate::request::RequestContext;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Arguments passed to every signal handler.
pub struct SignalArgs<'a> {
	/// Signal name being dispatched.
	pub name: &'a str,
	/// Node whose page is being composed.
	pub node: &'a Node,
	pub ctx: &'a RequestContext,
}

/// A registered handler; `None` means "no response for this dispatch".
pub type SignalHandler = Arc<dyn Fn(&SignalArgs<'_>) -> Option<Value> + Send + Sync>;

/// Registry of named signal handlers.
///
/// # Examples
///
/// ```
/// use coppice::signals::SignalRegistry;
/// use serde_json::json;
///
/// let registry = SignalRegistry::new();
/// registry.connect("greeting", |_args| Some(json!("hello")));
/// assert!(registry.has_listeners("greeting"));
/// ```
#[derive(Default)]
pub struct SignalRegistry {
	handlers: RwLock<HashMap<String, Vec<SignalHandler>>>,
}

impl SignalRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a handler under a signal name. Handlers fire in
	/// registration order on dispatch.
	pub fn connect<F>(&self, name: impl Into<String>, handler: F)
	where
		F: Fn(&SignalArgs<'_>) -> Option<Value> + Send + Sync + 'static,
	{
		self.handlers
			.write()
			.entry(name.into())
			.or_default()
			.push(Arc::new(handler));
	}

	pub fn has_listeners(&self, name: &str) -> bool {
		self.handlers
			.read()
			.get(name)
			.is_some_and(|handlers| !handlers.is_empty())
	}

	/// Dispatch to every handler registered under `name`, returning the
	/// last non-null response.
	pub fn send(&self, name: &str, node: &Node, ctx: &RequestContext) -> Option<Value> {
		let handlers = self.handlers.read();
		let registered = handlers.get(name)?;
		let args = SignalArgs { name, node, ctx };
		let mut last = None;
		for handler in registered {
			if let Some(response) = handler(&args) {
				last = Some(response);
			}
		}
		last
	}
}
