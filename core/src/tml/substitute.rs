/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use super::{GuidMapping, GuidPair};
use serde::{Deserialize, Serialize};

/// How successive replacements of a mapping are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionMode {
	/// Each replacement is applied to the output of the previous one.
	#[default]
	Chained,
	/// When reading a rendering back, each replacement is computed from the unmodified source and
	/// the last one wins: only the last pair of the mapping is visible in the result. Documents
	/// sent to the service are always chained.
	Pristine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
	/// `computed` → `original`, used when reading the service rendering back.
	ToPortable,
	/// `original` → `computed`, used before sending a local document to the service.
	ToResolved,
}

impl Direction {
	fn select(self, pair: &GuidPair) -> (&str, &str) {
		match self {
			Direction::ToPortable => (&pair.computed, &pair.original),
			Direction::ToResolved => (&pair.original, &pair.computed),
		}
	}
}

/// Replaces the first occurrence of each pair's token, in mapping order.
pub(crate) fn substitute(
	document: &str,
	mapping: &GuidMapping,
	mode: SubstitutionMode,
	direction: Direction,
) -> String {
	let replace = |source: &str, pair: &GuidPair| {
		let (from, to) = direction.select(pair);
		if from.is_empty() || from == to {
			source.to_string()
		} else {
			source.replacen(from, to, 1)
		}
	};

	match (mode, direction) {
		(SubstitutionMode::Chained, _) | (SubstitutionMode::Pristine, Direction::ToResolved) =>
			mapping.iter().fold(document.to_string(), |output, pair| replace(&output, pair)),
		(SubstitutionMode::Pristine, Direction::ToPortable) => mapping
			.iter()
			.map(|pair| replace(document, pair))
			.last()
			.unwrap_or_else(|| document.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn mapping() -> GuidMapping {
		GuidMapping::new(vec![GuidPair::new("a1", "b1"), GuidPair::new("a2", "b2")])
	}

	#[test]
	fn chained_applies_every_pair() {
		let doc = "guid: b1\n  guid: b2\n";
		assert_eq!(
			substitute(doc, &mapping(), SubstitutionMode::Chained, Direction::ToPortable),
			"guid: a1\n  guid: a2\n"
		);
	}

	#[test]
	fn pristine_keeps_last_replacement_only() {
		let doc = "guid: b1\n  guid: b2\n";
		assert_eq!(
			substitute(doc, &mapping(), SubstitutionMode::Pristine, Direction::ToPortable),
			"guid: b1\n  guid: a2\n"
		);
	}

	#[test]
	fn pristine_still_resolves_every_pair() {
		let doc = "guid: a1\n  guid: a2\n";
		assert_eq!(
			substitute(doc, &mapping(), SubstitutionMode::Pristine, Direction::ToResolved),
			"guid: b1\n  guid: b2\n"
		);
	}

	#[test]
	fn first_occurrence_only() {
		let mapping = GuidMapping::new(vec![GuidPair::new("a1", "b1")]);
		assert_eq!(
			substitute("a1 a1", &mapping, SubstitutionMode::Chained, Direction::ToResolved),
			"b1 a1"
		);
	}

	#[test]
	fn empty_mapping_returns_source() {
		let mapping = GuidMapping::default();
		for mode in [SubstitutionMode::Chained, SubstitutionMode::Pristine] {
			assert_eq!(substitute("guid: b1", &mapping, mode, Direction::ToPortable), "guid: b1");
		}
	}
}
