/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


//! TML GUID reconciliation.
//!
//! A TML document authored locally references objects by *portable* GUIDs. Once imported, the
//! service renders the same document with the GUIDs of the current environment. The
//! [`Reconciler`] pairs both sets of identifiers by position and rewrites documents in either
//! direction so the state keeps the portable form while the remote object keeps its identity.
//!
//! ```
//! use tsprov_core::tml::Reconciler;
//!
//! let local = "guid: aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa\nname: Foo";
//! let rendered = "guid: bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb\nname: Foo";
//!
//! let reconciled = Reconciler::new().reconcile(local, rendered, None, "obj-1", true).unwrap();
//! assert_eq!(reconciled.document, local);
//! ```

mod guid;
mod mapping;
mod substitute;

pub use guid::{first_guid, leading_guid, GuidExtractor, PatternExtractor};
pub use mapping::{correspond, GuidMapping, GuidPair};
pub use substitute::SubstitutionMode;

use crate::Result;
use substitute::{substitute, Direction};

/// Output of [`Reconciler::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
	pub mapping: GuidMapping,
	/// The rendered document with service GUIDs replaced by the portable ones.
	pub document: String,
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler<E = PatternExtractor> {
	extractor: E,
	mode: SubstitutionMode,
}

impl Reconciler {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<E: GuidExtractor> Reconciler<E> {
	pub fn with_extractor(extractor: E, mode: SubstitutionMode) -> Self {
		Self { extractor, mode }
	}

	pub fn extract<'a>(&self, document: &'a str) -> Vec<&'a str> {
		self.extractor.extract(document)
	}

	/// Pairs the identifiers of `local` with the ones of `rendered` (see [`correspond`]) and
	/// rewrites `rendered` into its portable form.
	pub fn reconcile(
		&self,
		local: &str,
		rendered: &str,
		prior: Option<&GuidMapping>,
		object_id: &str,
		require_guids: bool,
	) -> Result<Reconciled> {
		let original = self.extract(local);
		let computed = self.extract(rendered);
		let mapping = correspond(&original, &computed, prior, object_id, require_guids)?;
		let document = self.to_portable(rendered, &mapping);

		Ok(Reconciled { mapping, document })
	}

	/// Service GUIDs → portable GUIDs.
	pub fn to_portable(&self, document: &str, mapping: &GuidMapping) -> String {
		substitute(document, mapping, self.mode, Direction::ToPortable)
	}

	/// Portable GUIDs → service GUIDs.
	pub fn to_resolved(&self, document: &str, mapping: &GuidMapping) -> String {
		substitute(document, mapping, self.mode, Direction::ToResolved)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	const A: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
	const B: &str = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";
	const C: &str = "cccccccc-cccc-cccc-cccc-cccccccccccc";
	const D: &str = "dddddddd-dddd-dddd-dddd-dddddddddddd";

	#[test]
	fn fresh_import_is_read_back_portable() -> Result<()> {
		let local = format!("guid: {A}\nname: Foo");
		let rendered = format!("guid: {B}\nname: Foo");

		let reconciled = Reconciler::new().reconcile(&local, &rendered, None, "obj-1", true)?;

		assert_eq!(reconciled.mapping.pairs(), &[GuidPair::new(A, B)]);
		assert_eq!(reconciled.document, local);
		Ok(())
	}

	#[test]
	fn document_without_identifiers() -> Result<()> {
		let reconciler = Reconciler::new();
		let doc = "table:\n  name: Foo\n";

		assert!(reconciler.extract(doc).is_empty());
		let reconciled = reconciler.reconcile(doc, doc, None, "obj-7", false)?;
		assert_eq!(reconciled.mapping, GuidMapping::identity("obj-7"));
		assert_eq!(reconciled.document, doc);
		Ok(())
	}

	#[test]
	fn portable_then_resolved_round_trips() -> Result<()> {
		let reconciler = Reconciler::new();
		let local = format!("guid: {A}\nworksheet:\n  tables:\n  - guid: {C}\n");
		let rendered = format!("guid: {B}\nworksheet:\n  tables:\n  - guid: {D}\n");

		let Reconciled { mapping, document } =
			reconciler.reconcile(&local, &rendered, None, "obj-1", true)?;

		assert_eq!(document, local);
		assert_eq!(reconciler.to_resolved(&document, &mapping), rendered);
		Ok(())
	}

	#[test]
	fn shape_change_keeps_prior_mapping() -> Result<()> {
		let reconciler = Reconciler::new();
		let prior = GuidMapping::new(vec![GuidPair::new(A, B), GuidPair::new(C, D)]);
		let local = format!("guid: {A}\n  guid: {C}\n");
		let rendered = format!("guid: {B}\n  guid: {D}\n  guid: {}\n", "eeeeeeee-eeee-eeee-eeee-eeeeeeeeeeee");

		let reconciled = reconciler.reconcile(&local, &rendered, Some(&prior), "obj-1", true)?;

		assert_eq!(reconciled.mapping, prior);
		assert!(reconciled.document.starts_with(&local));
		Ok(())
	}

	#[test]
	fn pristine_mode_is_available() -> Result<()> {
		let reconciler = Reconciler::with_extractor(PatternExtractor, SubstitutionMode::Pristine);
		let local = format!("guid: {A}\n  guid: {C}\n");
		let rendered = format!("guid: {B}\n  guid: {D}\n");

		let reconciled = reconciler.reconcile(&local, &rendered, None, "obj-1", true)?;

		assert_eq!(reconciled.document, format!("guid: {B}\n  guid: {C}\n"));
		Ok(())
	}
}
