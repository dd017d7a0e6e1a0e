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
	tml::{GuidMapping, Reconciler},
	Error,
};
use anyhow::{anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tsprov_sdk::{ReadOutcome, Resource, ResourceDiff, Result};

/// One document of a [`MetadataResource`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	pub tml: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub guids: Option<GuidMapping>,
}

impl MetadataEntry {
	pub fn new(tml: impl Into<String>) -> Self {
		Self { tml: tml.into(), ..Default::default() }
	}
}

/// Several TML documents imported together, in a single request.
///
/// The id of the resource is the id of its first document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataResource {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub import_policy: Option<ImportPolicy>,
	pub metadata: Vec<MetadataEntry>,
}

impl MetadataResource {
	pub fn new<I, S>(documents: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { metadata: documents.into_iter().map(MetadataEntry::new).collect(), ..Default::default() }
	}

	fn entry_ids(&self) -> Result<Vec<&str>> {
		self.metadata
			.iter()
			.enumerate()
			.map(|(index, entry)| {
				entry
					.id
					.as_deref()
					.ok_or_else(|| anyhow!("metadata document #{} has no id, it was never imported", index + 1))
			})
			.collect()
	}

	async fn import<C: MetadataService + ?Sized>(&self, client: &C, documents: Vec<String>) -> Result<Vec<String>> {
		let policy = self.import_policy.unwrap_or_default();
		Ok(import_tmls(client, documents, policy, true).await?)
	}

	/// Exports `ids` and reconciles them with the entries, in order.
	async fn refresh<C: MetadataService + ?Sized>(
		&self,
		client: &C,
		ids: &[&str],
		with_prior: bool,
	) -> crate::Result<Option<Vec<Refreshed>>> {
		let targets = self
			.metadata
			.iter()
			.zip(ids.iter().copied())
			.map(|(entry, id)| ExportTarget {
				id,
				local: &entry.tml,
				prior: entry.guids.as_ref().filter(|_| with_prior),
			})
			.collect::<Vec<_>>();

		export_tmls(client, &Reconciler::new(), &targets, false, false).await
	}

	fn store(&mut self, refreshed: Vec<Refreshed>) {
		for (entry, refreshed) in self.metadata.iter_mut().zip(refreshed) {
			entry.id = Some(refreshed.id);
			entry.guids = Some(refreshed.reconciled.mapping);
		}
		self.id = self.metadata.first().and_then(|entry| entry.id.clone());
	}
}

#[async_trait]
impl<C: MetadataService + ?Sized> Resource<C> for MetadataResource {
	const KIND: &'static str = "metadata";

	fn validate(&self) -> Result<()> {
		if self.metadata.is_empty() {
			bail!("metadata must contain at least one TML document")
		}
		Ok(())
	}

	fn keep_computed(&mut self, prior: &Self) {
		if self.id.is_none() {
			self.id = prior.id.clone();
		}
		for (entry, prior) in self.metadata.iter_mut().zip(&prior.metadata) {
			if entry.id.is_none() {
				entry.id = prior.id.clone();
			}
			if entry.guids.is_none() {
				entry.guids = prior.guids.clone();
			}
		}
	}

	async fn get(&mut self, client: &C) -> Result<ReadOutcome> {
		let owned = self.entry_ids()?.into_iter().map(String::from).collect::<Vec<_>>();
		let ids = owned.iter().map(String::as_str).collect::<Vec<_>>();

		log::debug!("Exporting {} metadata object(s)", ids.len());
		match self.refresh(client, &ids, true).await? {
			Some(refreshed) => {
				for (entry, refreshed) in self.metadata.iter_mut().zip(refreshed) {
					entry.tml = refreshed.reconciled.document;
					entry.guids = Some(refreshed.reconciled.mapping);
				}
				Ok(ReadOutcome::Present)
			},
			None => {
				log::warn!("Metadata {:?} not found, it was removed outside of tsprov", ids);
				Ok(ReadOutcome::Removed)
			},
		}
	}

	async fn create(&mut self, client: &C) -> Result<()> {
		let documents = self.metadata.iter().map(|entry| entry.tml.clone()).collect();
		let ids = self.import(client, documents).await?;
		let ids = ids.iter().map(String::as_str).collect::<Vec<_>>();

		let refreshed = self
			.refresh(client, &ids, false)
			.await?
			.ok_or_else(|| anyhow!("{READ_TML}: {:?} not found right after their import", ids))?;

		log::info!("Imported {} metadata object(s)", refreshed.len());
		self.store(refreshed);
		Ok(())
	}

	async fn delete(&mut self, client: &C) -> Result<()> {
		let ids = self.entry_ids()?;
		match client.delete_metadata(&DeleteMetadataRequest::new(ids.iter().copied())).await {
			Ok(()) => Ok(()),
			Err(ClientError::NotFound(missing)) => {
				log::warn!("Metadata {} was already deleted", missing);
				Ok(())
			},
			Err(err) => Err(Error::remote(DELETE_METADATA)(err).into()),
		}
	}

	async fn update(&mut self, client: &C, diff: &ResourceDiff) -> Result<()> {
		let reconciler = Reconciler::new();
		let documents = self
			.metadata
			.iter()
			.map(|entry| reconciler.to_resolved(&entry.tml, &entry.guids.clone().unwrap_or_default()))
			.collect();

		log::debug!("Updating metadata {:?} ({:?})", self.id, diff.changes());
		let ids = self.import(client, documents).await?;
		let ids = ids.iter().map(String::as_str).collect::<Vec<_>>();

		let refreshed = self
			.refresh(client, &ids, true)
			.await?
			.ok_or_else(|| anyhow!("{READ_TML}: {:?} not found right after their import", ids))?;
		self.store(refreshed);
		Ok(())
	}
}
