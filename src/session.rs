//! Request-scoped transient state: read-once slots and flash messages.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};

/// Session slot holding a failed contact submission across a redirect.
pub const CONTACT_FORM_POST: &str = "contact_form_post";
/// Session slot holding a failed login submission across a redirect.
pub const LOGIN_FORM_POST: &str = "login_form_post";

/// Key-scoped transient session state with read-once semantics.
///
/// # Examples
///
/// ```
/// use coppice::session::Session;
/// use serde_json::json;
///
/// let session = Session::new();
/// session.insert("key", json!({"a": 1}));
/// assert!(session.pop("key").is_some());
/// assert!(session.pop("key").is_none());
/// ```
#[derive(Debug, Default)]
pub struct Session {
	slots: Mutex<HashMap<String, Value>>,
}

impl Session {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&self, key: impl Into<String>, value: Value) {
		self.slots.lock().insert(key.into(), value);
	}

	/// Remove and return a slot; subsequent reads see nothing.
	pub fn pop(&self, key: &str) -> Option<Value> {
		self.slots.lock().remove(key)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.slots.lock().contains_key(key)
	}
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
	Success,
	Warning,
	Error,
}

impl Level {
	/// CSS tag used by the default templates.
	pub fn tag(&self) -> &'static str {
		match self {
			Level::Success => "success",
			Level::Warning => "warning",
			Level::Error => "error",
		}
	}
}

/// A user-facing notification queued for the next rendered page.
#[derive(Debug, Clone)]
pub struct Message {
	pub level: Level,
	pub text: String,
}

/// Queue of flash messages, drained when a page renders them.
#[derive(Debug, Default)]
pub struct Messages {
	queue: Mutex<VecDeque<Message>>,
}

impl Messages {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&self, level: Level, text: impl Into<String>) {
		self.queue.lock().push_back(Message {
			level,
			text: text.into(),
		});
	}

	pub fn success(&self, text: impl Into<String>) {
		self.add(Level::Success, text);
	}

	pub fn warning(&self, text: impl Into<String>) {
		self.add(Level::Warning, text);
	}

	pub fn error(&self, text: impl Into<String>) {
		self.add(Level::Error, text);
	}

	/// Remove and return all queued messages.
	pub fn drain(&self) -> Vec<Message> {
		self.queue.lock().drain(..).collect()
	}

	/// Messages currently queued, without consuming them.
	pub fn peek(&self) -> Vec<Message> {
		self.queue.lock().iter().cloned().collect()
	}
}
