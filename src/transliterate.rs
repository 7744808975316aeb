//! Unicode-to-ASCII transliteration for URL slugs and file names.
//!
//! Supports Greek, Serbian, Russian and Bulgarian scripts, applied in that
//! priority order when a character appears in more than one table.

use crate::conf::SiteSettings;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Single-character mappings per script, priority by order.
const CHAR_TABLES: [(&str, &str); 4] = [
	(
		"αβγδεζηικλμνξοπρστυφωΑΒΓΔΕΖΗΙΚΛΜΝΞΟΠΡΣΤΥΦΩάέίήύόώϊϋΐΰςΆΈΊΉΎΌΏ",
		"abgdeziiklmnxoprstyfoABGDEZIIKLMNXOPRSTYFOaeiiyooiyiysAEIIYOO",
	),
	(
		"абвгдезијклмнопрстуфхцАБВГДЕЗИЈКЛМНОПРСТУФХЦ",
		"abvgdezijklmnoprstufhcABVGDEZIJKLMNOPRSTUFHC",
	),
	(
		"абвгдезийклмнопрстуфхъыьАБВГДЕЗИЙКЛМНОПРСТУФХЪЫЬ",
		"abvgdezijklmnoprstufh_y_ABVGDEZIJKLMNOPRSTUFH_Y_",
	),
	(
		"абвгдезийклмнопрстуфхАБВГДЕЗИЙКЛМНОПРСТУФХ",
		"abvgdeziyklmnoprstufhABVGDEZIYKLMNOPRSTUFH",
	),
];

/// Multi-character expansions per script, applied after the single tables.
const MULTI_TABLES: [(&[&str], &[&str]); 5] = [
	(
		&["θ", "χ", "ψ", "Θ", "Χ", "Ψ"],
		&["th", "ch", "ps", "Th", "Ch", "Ps"],
	),
	(
		&[
			"ђ", "ж", "љ", "њ", "ћ", "ч", "џ", "ш", "Ђ", "Ж", "Љ", "Њ", "Ћ", "Ч", "Џ", "Ш",
		],
		&[
			"dj", "zh", "lj", "nj", "c", "ch", "dz", "sh", "Dj", "Zh", "Lj", "Nj", "C", "Ch",
			"Dz", "Sh",
		],
	),
	(
		&["đ", "ž", "ć", "č", "š", "Đ", "Ž", "Ć", "Č", "Š"],
		&["dj", "zh", "c", "ch", "sh", "Dj", "Zh", "C", "Ch", "Sh"],
	),
	(
		&[
			"ж", "ц", "ч", "ш", "щ", "ю", "я", "Ж", "Ц", "Ч", "Ш", "Щ", "Ю", "Я",
		],
		&[
			"zh", "ts", "ch", "sh", "sch", "ju", "ja", "Zh", "Ts", "Ch", "Sh", "Sch", "Ju", "Ja",
		],
	),
	(
		&[
			"ж", "ц", "ч", "ш", "щ", "ю", "я", "Ж", "Ц", "Ч", "Ш", "Щ", "Ю", "Я",
		],
		&[
			"zh", "ts", "ch", "sh", "sht", "yu", "ya", "Zh", "Ts", "Ch", "Sh", "Sht", "Yu", "Ya",
		],
	),
];

/// Combined lookup, first insertion wins so table order is priority order.
static CHAR_MAP: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
	let mut map: HashMap<char, &'static str> = HashMap::new();
	for (from, to) in CHAR_TABLES {
		for (src, dst) in from.chars().zip(to.char_indices()) {
			let end = dst.0 + dst.1.len_utf8();
			map.entry(src).or_insert(&to[dst.0..end]);
		}
	}
	for (from, to) in MULTI_TABLES {
		for (src, dst) in from.iter().zip(to.iter()) {
			let ch = src.chars().next().expect("table entry is non-empty");
			map.entry(ch).or_insert(*dst);
		}
	}
	map
});

/// Transliterate unicode text into an ASCII-safe string.
///
/// With `filename` set, punctuation that is invalid in file names is
/// removed and spaces become underscores; otherwise the settings-driven
/// replacement table applies (by default separators become hyphens).
///
/// # Examples
///
/// ```
/// use coppice::conf::SiteSettings;
/// use coppice::transliterate::transliterate;
///
/// let settings = SiteSettings::default();
/// assert_eq!(transliterate("Test Aliases Node", &settings, false, true), "test-aliases-node");
/// assert_eq!(transliterate("Καλημέρα κόσμε", &settings, false, true), "kalimera-kosme");
/// assert_eq!(transliterate("Report (final).pdf", &settings, true, false), "Report_final.pdf");
/// ```
pub fn transliterate(s: &str, settings: &SiteSettings, filename: bool, to_lower: bool) -> String {
	let mut out = String::with_capacity(s.len());
	for ch in s.chars() {
		match CHAR_MAP.get(&ch) {
			Some(rep) => out.push_str(rep),
			None => out.push(ch),
		}
	}

	let mut remove: Vec<char> = settings.transliterate_remove.chars().collect();
	if filename {
		remove.extend("/\\?%*:|\"<>".chars());
		out = out.replace(' ', "_");
	} else {
		let from: Vec<char> = settings.transliterate_replace.0.chars().collect();
		let to: Vec<char> = settings.transliterate_replace.1.chars().collect();
		out = out
			.chars()
			.map(|c| match from.iter().position(|f| *f == c) {
				Some(i) => to.get(i).copied().unwrap_or(c),
				None => c,
			})
			.collect();
	}
	out.retain(|c| !remove.contains(&c));
	if to_lower {
		out = out.to_lowercase();
	}
	out
}

/// Convert text to a lowercase hyphen-separated slug.
///
/// Unlike [`transliterate`] this is a lossy ASCII slug used for CSS class
/// names and template suggestion keys, not for alias generation.
///
/// # Examples
///
/// ```
/// use coppice::transliterate::slug;
///
/// assert_eq!(slug("Hello World"), "hello-world");
/// assert_eq!(slug("Main  menu!"), "main-menu");
/// ```
pub fn slug(text: &str) -> String {
	text.to_lowercase()
		.chars()
		.map(|ch| match ch {
			'a'..='z' | '0'..='9' => ch,
			_ => '-',
		})
		.collect::<String>()
		.split('-')
		.filter(|s| !s.is_empty())
		.collect::<Vec<_>>()
		.join("-")
}

/// Uppercase a string, removing Greek intonation marks.
///
/// # Examples
///
/// ```
/// use coppice::transliterate::upper_no_intonation;
///
/// assert_eq!(upper_no_intonation("Καλημέρα"), "ΚΑΛΗΜΕΡΑ");
/// ```
pub fn upper_no_intonation(s: &str) -> String {
	let from = "ΆΈΊΉΎΌΏ";
	let to = "ΑΕΙΗΥΟΩ";
	s.to_uppercase()
		.chars()
		.map(|c| match from.chars().position(|f| f == c) {
			Some(i) => to.chars().nth(i).unwrap_or(c),
			None => c,
		})
		.collect()
}
