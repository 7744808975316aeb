//! Form binding and validation for the contact, login and search blocks.
//!
//! Validation failures are recoverable by design: the caller re-renders
//! the originating page with the submitted values preserved through a
//! read-once session slot, so none of these errors escalates into a hard
//! failure.

use crate::sanitize::sanitize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Posted key/value pairs, as decoded by the host.
pub type PostData = HashMap<String, String>;

/// Recoverable form validation failure.
#[derive(Debug, Error)]
pub enum FormError {
	#[error("missing or invalid field: {0}")]
	Field(String),
}

fn field(data: &PostData, key: &str) -> String {
	data.get(key).cloned().unwrap_or_default()
}

fn from_session_map(value: Option<Value>) -> PostData {
	match value {
		Some(Value::Object(map)) => map
			.into_iter()
			.filter_map(|(key, value)| match value {
				Value::String(text) => Some((key, text)),
				_ => None,
			})
			.collect(),
		_ => PostData::new(),
	}
}

/// Hidden-redirect form shared by the contact, login and logout flows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedirectForm {
	pub redirect: String,
}

impl RedirectForm {
	pub fn bind(data: &PostData) -> Self {
		Self {
			redirect: field(data, "redirect"),
		}
	}

	/// The sanitized redirect target, or an error when absent.
	pub fn validate(&self) -> Result<String, FormError> {
		let redirect = sanitize(&self.redirect, false);
		if redirect.is_empty() {
			return Err(FormError::Field("redirect".to_string()));
		}
		Ok(redirect)
	}

	/// Redirect target to fall back to when validation itself failed.
	pub fn fallback_target(&self) -> String {
		let redirect = sanitize(&self.redirect, false);
		if redirect.is_empty() {
			"/".to_string()
		} else {
			redirect
		}
	}
}

/// Validated contact submission ready for mail delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
	pub sender_name: String,
	pub sender_email: String,
	/// Subject with the site feedback prefix applied.
	pub subject: String,
	pub message: String,
	pub redirect: String,
}

/// Contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
	pub sender_name: String,
	pub sender_email: String,
	pub subject: String,
	pub message: String,
	pub redirect: String,
}

impl ContactForm {
	pub fn bind(data: &PostData) -> Self {
		Self {
			sender_name: field(data, "sender_name"),
			sender_email: field(data, "sender_email"),
			subject: field(data, "subject"),
			message: field(data, "message"),
			redirect: field(data, "redirect"),
		}
	}

	/// Repopulate from a stashed failed submission, falling back to
	/// query-string initial values for fields the stash does not carry.
	pub fn from_session(stash: Option<Value>, initial: &HashMap<String, String>) -> Self {
		let mut data = from_session_map(stash);
		for (key, value) in initial {
			data.entry(key.clone()).or_insert_with(|| value.clone());
		}
		Self::bind(&data)
	}

	/// Sanitize and validate all fields.
	///
	/// The email check is intentionally shallow: a user-supplied address
	/// only needs text around a single `@` to be deliverable-looking;
	/// real verification happens at the mail relay.
	pub fn validate(&self) -> Result<ContactSubmission, FormError> {
		let sender_name = sanitize(&self.sender_name, false);
		let sender_email = sanitize(&self.sender_email, false);
		let message = sanitize(&self.message, false);
		let subject = sanitize(&self.subject, false);
		let redirect = sanitize(&self.redirect, false);
		if sender_name.is_empty() {
			return Err(FormError::Field("sender_name".to_string()));
		}
		if !valid_email(&sender_email) {
			return Err(FormError::Field("sender_email".to_string()));
		}
		if subject.is_empty() {
			return Err(FormError::Field("subject".to_string()));
		}
		if message.is_empty() {
			return Err(FormError::Field("message".to_string()));
		}
		if redirect.is_empty() {
			return Err(FormError::Field("redirect".to_string()));
		}
		Ok(ContactSubmission {
			sender_name,
			sender_email,
			subject: format!("[Website Feedback] {subject}"),
			message,
			redirect,
		})
	}
}

fn valid_email(email: &str) -> bool {
	match email.split_once('@') {
		Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
		None => false,
	}
}

/// Validated login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSubmission {
	pub username: String,
	pub password: String,
	pub redirect: String,
}

/// Login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
	pub username: String,
	#[serde(skip_serializing)]
	pub password: String,
	pub redirect: String,
}

impl LoginForm {
	pub fn bind(data: &PostData) -> Self {
		Self {
			username: field(data, "username"),
			password: field(data, "password"),
			redirect: field(data, "redirect"),
		}
	}

	/// Repopulate from a stashed failed submission. The password is
	/// never redisplayed.
	pub fn from_session(stash: Option<Value>) -> Self {
		let mut form = Self::bind(&from_session_map(stash));
		form.password.clear();
		form
	}

	pub fn validate(&self) -> Result<LoginSubmission, FormError> {
		let username = sanitize(&self.username, false);
		if username.is_empty() {
			return Err(FormError::Field("username".to_string()));
		}
		if self.password.is_empty() {
			return Err(FormError::Field("password".to_string()));
		}
		let redirect = sanitize(&self.redirect, false);
		if redirect.is_empty() {
			return Err(FormError::Field("redirect".to_string()));
		}
		Ok(LoginSubmission {
			username,
			password: self.password.clone(),
			redirect,
		})
	}
}

/// Search query form, bound from the query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchForm {
	pub q: String,
}

impl SearchForm {
	pub fn bind(query: &HashMap<String, String>) -> Self {
		Self {
			q: query.get("q").cloned().unwrap_or_default(),
		}
	}

	/// The sanitized, trimmed query term; empty terms fail validation.
	pub fn validate(&self) -> Result<String, FormError> {
		let q = sanitize(&self.q, false).trim().to_string();
		if q.is_empty() {
			return Err(FormError::Field("q".to_string()));
		}
		Ok(q)
	}
}
