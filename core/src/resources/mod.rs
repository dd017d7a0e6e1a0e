/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


//! TML backed resources and the export/import steps they share.

mod metadata;
mod tml;

pub use metadata::{MetadataEntry, MetadataResource};
pub use tml::TmlResource;

use crate::{
	client::{
		ExportMetadataTmlRequest, ExportOptions, ImportMetadataTmlRequest, ImportPolicy,
		MetadataService,
	},
	error::{IMPORT_TML, READ_TML},
	tml::{GuidMapping, Reconciled, Reconciler},
	Error, Result,
};

/// Name of the provider in resource URNs.
pub const PROVIDER: &str = "thoughtspot";

/// One exported and reconciled object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Refreshed {
	/// Object id reported by the service.
	pub id: String,
	pub reconciled: Reconciled,
}

/// What to reconcile an exported object against.
pub(crate) struct ExportTarget<'a> {
	pub id: &'a str,
	/// The document as known locally, carrying portable GUIDs.
	pub local: &'a str,
	pub prior: Option<&'a GuidMapping>,
}

/// Imports `tmls` in a single request and returns the id of every document.
///
/// The first document reported as failed aborts the whole operation, whatever the outcome of
/// the others.
pub(crate) async fn import_tmls<C: MetadataService + ?Sized>(
	client: &C,
	metadata_tmls: Vec<String>,
	import_policy: ImportPolicy,
	create_new: bool,
) -> Result<Vec<String>> {
	let expected = metadata_tmls.len();
	let request = ImportMetadataTmlRequest { metadata_tmls, import_policy, create_new };

	log::debug!("Importing {} TML document(s) ({:?})", expected, import_policy);
	let imported = client.import_tml(&request).await.map_err(Error::remote(IMPORT_TML))?;

	if let Some((index, failed)) =
		imported.iter().enumerate().find(|(_, imported)| imported.response.status.is_error())
	{
		return Err(Error::Status {
			summary: IMPORT_TML,
			position: index + 1,
			message: failed.response.status.message().to_string(),
		})
	}

	(0..expected)
		.map(|index| {
			imported
				.get(index)
				.and_then(|imported| imported.response.header.id_guid.clone())
				.ok_or(Error::MissingResult { summary: IMPORT_TML, position: index + 1 })
		})
		.collect()
}

/// Exports `targets` and reconciles each rendering with its local document.
///
/// Returns `None` when the service doesn't know the objects anymore.
pub(crate) async fn export_tmls<C: MetadataService + ?Sized>(
	client: &C,
	reconciler: &Reconciler,
	targets: &[ExportTarget<'_>],
	use_object_id: bool,
	require_guids: bool,
) -> Result<Option<Vec<Refreshed>>> {
	let request = ExportMetadataTmlRequest::new(
		targets.iter().map(|target| target.id),
		ExportOptions::for_object_id(use_object_id),
	);

	let exported = match client.export_tml(&request).await {
		Ok(exported) => exported,
		Err(err) if err.is_not_found() => {
			log::debug!("{err}");
			return Ok(None)
		},
		Err(err) => return Err(Error::remote(READ_TML)(err)),
	};

	if exported.is_empty() {
		return Ok(None)
	}

	targets
		.iter()
		.enumerate()
		.map(|(index, target)| {
			let position = index + 1;
			let object = exported
				.get(index)
				.ok_or(Error::MissingResult { summary: READ_TML, position })?;

			if object.info.status.is_error() {
				return Err(Error::Status {
					summary: READ_TML,
					position,
					message: object.info.status.message().to_string(),
				})
			}

			let reconciled = reconciler.reconcile(
				target.local,
				&object.edoc,
				target.prior,
				target.id,
				require_guids,
			)?;
			Ok(Refreshed { id: object.info.id.clone(), reconciled })
		})
		.collect::<Result<Vec<_>>>()
		.map(Some)
}
