//! HTML escaping and tag stripping for user-supplied text.

/// Escape HTML special characters.
///
/// # Examples
///
/// ```
/// use coppice::sanitize::escape;
///
/// assert_eq!(escape("5 < 10 & 10 > 5"), "5 &lt; 10 &amp; 10 &gt; 5");
/// assert_eq!(
///     escape("<script>alert('x')</script>"),
///     "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
/// );
/// ```
pub fn escape(text: &str) -> String {
	let mut result = String::with_capacity(text.len() + 10);
	for ch in text.chars() {
		match ch {
			'&' => result.push_str("&amp;"),
			'<' => result.push_str("&lt;"),
			'>' => result.push_str("&gt;"),
			'"' => result.push_str("&quot;"),
			'\'' => result.push_str("&#x27;"),
			_ => result.push(ch),
		}
	}
	result
}

/// Remove HTML tags, keeping the text content.
///
/// Unterminated tags are dropped to the end of input rather than kept.
///
/// # Examples
///
/// ```
/// use coppice::sanitize::strip_tags;
///
/// assert_eq!(strip_tags("<b>bold</b> text"), "bold text");
/// assert_eq!(strip_tags("a <broken"), "a ");
/// ```
pub fn strip_tags(text: &str) -> String {
	let mut result = String::with_capacity(text.len());
	let mut in_tag = false;
	for ch in text.chars() {
		match ch {
			'<' => in_tag = true,
			'>' if in_tag => in_tag = false,
			_ if !in_tag => result.push(ch),
			_ => {}
		}
	}
	result
}

/// Sanitize free text for storage or redisplay.
///
/// With `allow_html` false every tag is stripped; otherwise the text is
/// passed through unchanged and the caller is expected to escape at the
/// template boundary. Richer allowlist filtering is host policy, not part
/// of this contract.
pub fn sanitize(text: &str, allow_html: bool) -> String {
	if text.is_empty() {
		return String::new();
	}
	if !allow_html {
		return strip_tags(text);
	}
	text.to_string()
}
