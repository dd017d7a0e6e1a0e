/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use lazy_regex::{lazy_regex, Lazy, Regex};

static GUID: Lazy<Regex> =
	lazy_regex!(r"guid: ([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})");

static LEADING_GUID: Lazy<Regex> =
	lazy_regex!(r"^guid: ([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})");

/// Locates the identifiers embedded in a document.
pub trait GuidExtractor: Send + Sync {
	/// Returns every identifier of `document`, in document order.
	fn extract<'a>(&self, document: &'a str) -> Vec<&'a str>;
}

/// Matches `guid: ` followed by a lowercase 8-4-4-4-12 token, anywhere in the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl GuidExtractor for PatternExtractor {
	fn extract<'a>(&self, document: &'a str) -> Vec<&'a str> {
		GUID.captures_iter(document)
			.filter_map(|captures| captures.get(1))
			.map(|token| token.as_str())
			.collect()
	}
}

/// First identifier of the document, wherever it is.
pub fn first_guid(document: &str) -> Option<&str> {
	GUID.captures(document).and_then(|captures| captures.get(1)).map(|token| token.as_str())
}

/// Identifier the document starts with, if any.
pub fn leading_guid(document: &str) -> Option<&str> {
	LEADING_GUID
		.captures(document)
		.and_then(|captures| captures.get(1))
		.map(|token| token.as_str())
}
