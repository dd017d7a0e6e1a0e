/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use super::{export_tmls, import_tmls, ExportTarget, Refreshed};
use crate::{
	client::{ClientError, DeleteMetadataRequest, ImportPolicy, MetadataService},
	error::{DELETE_METADATA, READ_TML},
	tml::{first_guid, leading_guid, GuidMapping, PatternExtractor, Reconciler, SubstitutionMode},
	Error,
};
use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tsprov_sdk::{ReadOutcome, Resource, ResourceDiff, Result};

/// A single TML document imported into ThoughtSpot.
///
/// `tml` holds portable GUIDs; `guids` maps them onto the GUIDs the service assigned. Both `id`
/// and `guids` are computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmlResource {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	pub tml: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub guids: Option<GuidMapping>,
	/// Export with object ids instead of GUIDs.
	#[serde(default)]
	pub use_object_id: bool,
	#[serde(default, skip_serializing_if = "is_chained")]
	pub substitution: SubstitutionMode,
}

fn is_chained(mode: &SubstitutionMode) -> bool {
	*mode == SubstitutionMode::Chained
}

impl TmlResource {
	pub fn new(tml: impl Into<String>) -> Self {
		Self { tml: tml.into(), ..Default::default() }
	}

	pub fn use_object_id(mut self, use_object_id: bool) -> Self {
		self.use_object_id = use_object_id;
		self
	}

	fn reconciler(&self) -> Reconciler {
		Reconciler::with_extractor(PatternExtractor, self.substitution)
	}

	fn object_id(&self) -> Result<&str> {
		self.id.as_deref().ok_or_else(|| anyhow!("tml resource has no id, it was never created"))
	}

	async fn refresh<C: MetadataService + ?Sized>(
		&self,
		client: &C,
		id: &str,
		prior: Option<&GuidMapping>,
	) -> crate::Result<Option<Refreshed>> {
		let target = ExportTarget { id, local: &self.tml, prior };
		let refreshed =
			export_tmls(client, &self.reconciler(), &[target], self.use_object_id, !self.use_object_id)
				.await?;
		Ok(refreshed.and_then(|refreshed| refreshed.into_iter().next()))
	}
}

#[async_trait]
impl<C: MetadataService + ?Sized> Resource<C> for TmlResource {
	const KIND: &'static str = "tml";

	fn validate(&self) -> Result<()> {
		if self.use_object_id && leading_guid(&self.tml).is_some() {
			return Err(Error::GuidsNotAllowed.into())
		}
		Ok(())
	}

	fn keep_computed(&mut self, prior: &Self) {
		if self.id.is_none() {
			self.id = prior.id.clone();
		}
		if self.guids.is_none() {
			self.guids = prior.guids.clone();
		}
	}

	fn requires_replace(&self, prior: &Self) -> bool {
		if self.tml == prior.tml ||
			!self.tml.starts_with("guid:") ||
			!prior.tml.starts_with("guid:")
		{
			return false
		}

		match (first_guid(&prior.tml), first_guid(&self.tml)) {
			(Some(current), Some(desired)) => current != desired,
			_ => false,
		}
	}

	async fn get(&mut self, client: &C) -> Result<ReadOutcome> {
		let id = self.object_id()?.to_string();
		let prior = self.guids.clone().unwrap_or_default();

		log::debug!("Exporting TML {}", id);
		match self.refresh(client, &id, Some(&prior)).await? {
			Some(Refreshed { reconciled, .. }) => {
				self.tml = reconciled.document;
				self.guids = Some(reconciled.mapping);
				Ok(ReadOutcome::Present)
			},
			None => {
				log::warn!("TML {} not found, it was removed outside of tsprov", id);
				Ok(ReadOutcome::Removed)
			},
		}
	}

	async fn create(&mut self, client: &C) -> Result<()> {
		let ids = import_tmls(client, vec![self.tml.clone()], ImportPolicy::AllOrNone, false).await?;
		let id = ids.into_iter().next().ok_or(Error::MissingResult {
			summary: crate::error::IMPORT_TML,
			position: 1,
		})?;

		// the authored document stays in the state, only the computed attributes come back
		let refreshed = self
			.refresh(client, &id, None)
			.await?
			.ok_or_else(|| anyhow!("{READ_TML}: {id} not found right after its import"))?;

		log::info!("Imported TML {}", id);
		self.id = Some(id);
		self.guids = Some(refreshed.reconciled.mapping);
		Ok(())
	}

	async fn delete(&mut self, client: &C) -> Result<()> {
		let id = self.object_id()?;
		match client.delete_metadata(&DeleteMetadataRequest::new([id])).await {
			Ok(()) => Ok(()),
			Err(ClientError::NotFound(_)) => {
				log::warn!("TML {} was already deleted", id);
				Ok(())
			},
			Err(err) => Err(Error::remote(DELETE_METADATA)(err).into()),
		}
	}

	async fn update(&mut self, client: &C, diff: &ResourceDiff) -> Result<()> {
		let id = self.object_id()?.to_string();
		let mapping = self.guids.clone().unwrap_or_default();
		let resolved = self.reconciler().to_resolved(&self.tml, &mapping);

		log::debug!("Updating TML {} ({:?})", id, diff.changes());
		let ids = import_tmls(client, vec![resolved], ImportPolicy::AllOrNone, false).await?;
		if let Some(imported) = ids.first().filter(|imported| **imported != id) {
			log::warn!("import of {} answered with id {}, keeping {}", id, imported, id);
		}

		if let Some(refreshed) = self.refresh(client, &id, Some(&mapping)).await? {
			self.guids = Some(refreshed.reconciled.mapping);
		}
		Ok(())
	}
}
