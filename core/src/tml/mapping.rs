/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::slice;

/// An identifier as authored (`original`) and as known by the service (`computed`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuidPair {
	pub original: String,
	pub computed: String,
}

impl GuidPair {
	pub fn new(original: impl Into<String>, computed: impl Into<String>) -> Self {
		Self { original: original.into(), computed: computed.into() }
	}
}

/// Ordered correspondence between the identifiers of a local document and the ones of the
/// document rendered by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuidMapping(Vec<GuidPair>);

impl GuidMapping {
	pub fn new(pairs: Vec<GuidPair>) -> Self {
		Self(pairs)
	}

	/// Maps the object id onto itself, used when the document carries no identifier.
	pub fn identity(object_id: &str) -> Self {
		Self(vec![GuidPair::new(object_id, object_id)])
	}

	pub fn pairs(&self) -> &[GuidPair] {
		&self.0
	}

	pub fn iter(&self) -> slice::Iter<'_, GuidPair> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl FromIterator<GuidPair> for GuidMapping {
	fn from_iter<I: IntoIterator<Item = GuidPair>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a GuidMapping {
	type Item = &'a GuidPair;
	type IntoIter = slice::Iter<'a, GuidPair>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Pairs `original[i]` with `computed[i]`.
///
/// - `require_guids`: both documents must carry identifiers, otherwise `GuidsNotFound`.
/// - When the lengths differ, a `prior` mapping is reused as is. Without one the pairing fails
///   with `GuidCountMismatch` if identifiers are required, or keeps the common prefix.
/// - An empty result becomes the identity mapping of `object_id`; the mapping is never empty.
pub fn correspond(
	original: &[&str],
	computed: &[&str],
	prior: Option<&GuidMapping>,
	object_id: &str,
	require_guids: bool,
) -> Result<GuidMapping> {
	if require_guids && (original.is_empty() || computed.is_empty()) {
		return Err(Error::GuidsNotFound { id: object_id.to_string() })
	}

	let mapping = if original.len() == computed.len() {
		zip(original, computed)
	} else if let Some(prior) = prior {
		log::debug!(
			"guid count changed ({} authored, {} rendered) for {}, keeping the previous mapping",
			original.len(),
			computed.len(),
			object_id
		);
		prior.clone()
	} else if require_guids {
		return Err(Error::GuidCountMismatch { original: original.len(), computed: computed.len() })
	} else {
		log::warn!(
			"guid count differs ({} authored, {} rendered) for {}, only the first {} are mapped",
			original.len(),
			computed.len(),
			object_id,
			original.len().min(computed.len())
		);
		zip(original, computed)
	};

	if mapping.is_empty() {
		Ok(GuidMapping::identity(object_id))
	} else {
		Ok(mapping)
	}
}

fn zip(original: &[&str], computed: &[&str]) -> GuidMapping {
	original
		.iter()
		.zip(computed)
		.map(|(original, computed)| GuidPair::new(*original, *computed))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn pairs_by_position() -> Result<()> {
		let mapping = correspond(&["a1", "a2", "a3"], &["b1", "b2", "b3"], None, "id", true)?;
		assert_eq!(
			mapping.pairs(),
			&[GuidPair::new("a1", "b1"), GuidPair::new("a2", "b2"), GuidPair::new("a3", "b3")]
		);
		Ok(())
	}

	#[test]
	fn no_identifiers_maps_object_id_onto_itself() -> Result<()> {
		let mapping = correspond(&[], &[], None, "obj-42", false)?;
		assert_eq!(mapping, GuidMapping::identity("obj-42"));
		Ok(())
	}

	#[test]
	fn required_identifiers_missing() {
		let err = correspond(&["a1"], &[], None, "obj-42", true).unwrap_err();
		assert!(matches!(err, Error::GuidsNotFound { id } if id == "obj-42"));
	}

	#[test]
	fn count_change_reuses_prior_mapping() -> Result<()> {
		let prior = GuidMapping::new(vec![GuidPair::new("a1", "b1"), GuidPair::new("a2", "b2")]);
		let mapping = correspond(&["a1", "a2"], &["c1", "c2", "c3"], Some(&prior), "id", true)?;
		assert_eq!(mapping, prior);
		Ok(())
	}

	#[test]
	fn count_change_without_prior_fails_when_required() {
		let err = correspond(&["a1", "a2"], &["c1", "c2", "c3"], None, "id", true).unwrap_err();
		assert!(matches!(err, Error::GuidCountMismatch { original: 2, computed: 3 }));
	}

	#[test]
	fn count_change_without_prior_keeps_prefix_when_optional() -> Result<()> {
		let mapping = correspond(&["a1", "a2"], &["c1"], None, "id", false)?;
		assert_eq!(mapping.pairs(), &[GuidPair::new("a1", "c1")]);
		Ok(())
	}

	#[test]
	fn equal_counts_ignore_prior() -> Result<()> {
		let prior = GuidMapping::new(vec![GuidPair::new("a1", "old")]);
		let mapping = correspond(&["a1"], &["new"], Some(&prior), "id", true)?;
		assert_eq!(mapping.pairs(), &[GuidPair::new("a1", "new")]);
		Ok(())
	}

	#[test]
	fn serializes_as_list_of_pairs() -> serde_json::Result<()> {
		let mapping = GuidMapping::new(vec![GuidPair::new("a1", "b1")]);
		assert_eq!(
			serde_json::to_value(&mapping)?,
			serde_json::json!([{ "original": "a1", "computed": "b1" }])
		);
		Ok(())
	}
}
