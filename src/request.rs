//! Request-scoped context handed to the composition core by the host.

use crate::models::UserId;
use crate::session::{Messages, Session};
use std::collections::{HashMap, HashSet};

/// Capability required to view unpublished content.
pub const VIEW_UNPUBLISHED: &str = "view_unpublished";

/// Authentication facts about the requester.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
	pub user: Option<UserId>,
	pub authenticated: bool,
	pub superuser: bool,
	/// Grants access to the editorial toolbar.
	pub staff: bool,
	capabilities: HashSet<String>,
}

impl AuthState {
	/// An unauthenticated requester with no capabilities.
	pub fn anonymous() -> Self {
		Self::default()
	}

	/// An authenticated requester.
	pub fn user(id: UserId) -> Self {
		Self {
			user: Some(id),
			authenticated: true,
			..Self::default()
		}
	}

	pub fn superuser(id: UserId) -> Self {
		Self {
			user: Some(id),
			authenticated: true,
			superuser: true,
			staff: true,
			capabilities: HashSet::new(),
		}
	}

	pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
		self.capabilities.insert(capability.into());
		self
	}

	pub fn with_staff(mut self) -> Self {
		self.staff = true;
		self
	}

	/// Superusers implicitly hold every capability.
	pub fn has_capability(&self, capability: &str) -> bool {
		self.superuser || self.capabilities.contains(capability)
	}
}

/// Everything the core needs to know about one request.
///
/// The host's router strips the leading slash and any language prefix
/// from the URL before handing it over; `path` keeps the original
/// request path for active-trail matching.
#[derive(Debug, Default)]
pub struct RequestContext {
	/// Original request path, with slashes.
	pub path: String,
	/// Negotiated language code; empty means no preference.
	pub language: String,
	/// Decoded query-string parameters.
	pub query: HashMap<String, String>,
	pub auth: AuthState,
	pub session: Session,
	pub messages: Messages,
}

impl RequestContext {
	pub fn new(path: impl Into<String>, language: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			language: language.into(),
			..Self::default()
		}
	}

	pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
		self.query = query;
		self
	}

	pub fn with_auth(mut self, auth: AuthState) -> Self {
		self.auth = auth;
		self
	}

	pub fn query_param(&self, key: &str) -> Option<&str> {
		self.query.get(key).map(String::as_str)
	}
}
