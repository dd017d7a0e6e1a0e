/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


//! In-memory stand-in for the ThoughtSpot object store.

use crate::{
	client::{
		ClientError, DeleteMetadataRequest, ExportInfo, ExportMetadataTmlRequest, ExportedTml,
		ImportMetadataTmlRequest, ImportPolicy, ImportedTml, MetadataService, Status,
	},
	tml::{first_guid, GuidExtractor, PatternExtractor},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Imports assign a fresh server GUID to every GUID it hasn't issued itself, the way a new
/// environment does. A document whose first (server) GUID belongs to a stored object updates it.
#[derive(Debug, Default)]
pub(crate) struct FakeService {
	inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
	objects: BTreeMap<String, String>,
	issued: HashSet<String>,
	next: usize,
	scripted: VecDeque<Vec<ImportedTml>>,
	empty_exports: usize,
	imports: Vec<ImportMetadataTmlRequest>,
	exports: Vec<ExportMetadataTmlRequest>,
	deletes: Vec<DeleteMetadataRequest>,
}

impl Inner {
	fn issue_guid(&mut self) -> String {
		self.next += 1;
		let guid = format!("{:08x}-5e7e-4000-8000-{:012x}", self.next, self.next);
		self.issued.insert(guid.clone());
		guid
	}

	fn render(&mut self, document: &str) -> String {
		let tokens = PatternExtractor.extract(document).into_iter().map(String::from).collect::<Vec<_>>();
		tokens.into_iter().fold(document.to_string(), |rendered, token| {
			if self.issued.contains(&token) {
				rendered
			} else {
				let guid = self.issue_guid();
				rendered.replacen(&token, &guid, 1)
			}
		})
	}

	fn object_for(&mut self, rendered: &str) -> String {
		let existing = first_guid(rendered).and_then(|guid| {
			self.objects
				.iter()
				.find(|(_, stored)| first_guid(stored) == Some(guid))
				.map(|(id, _)| id.clone())
		});
		existing.unwrap_or_else(|| {
			self.next += 1;
			format!("obj-{}", self.next)
		})
	}
}

impl FakeService {
	pub fn insert(&self, id: &str, rendered: &str) {
		let mut inner = self.inner.lock();
		inner.issued.extend(PatternExtractor.extract(rendered).into_iter().map(String::from));
		inner.objects.insert(id.to_string(), rendered.to_string());
	}

	pub fn rendered(&self, id: &str) -> Option<String> {
		self.inner.lock().objects.get(id).cloned()
	}

	pub fn remove(&self, id: &str) {
		self.inner.lock().objects.remove(id);
	}

	/// The next import answers `results` verbatim and stores nothing.
	pub fn fail_next_import(&self, results: Vec<ImportedTml>) {
		self.inner.lock().scripted.push_back(results);
	}

	/// The next export answers successfully, without any document.
	pub fn empty_next_export(&self) {
		self.inner.lock().empty_exports += 1;
	}

	pub fn imports(&self) -> Vec<ImportMetadataTmlRequest> {
		self.inner.lock().imports.clone()
	}

	pub fn exports(&self) -> Vec<ExportMetadataTmlRequest> {
		self.inner.lock().exports.clone()
	}

	pub fn deletes(&self) -> Vec<DeleteMetadataRequest> {
		self.inner.lock().deletes.clone()
	}

	pub fn object_count(&self) -> usize {
		self.inner.lock().objects.len()
	}
}

#[async_trait]
impl MetadataService for FakeService {
	async fn export_tml(
		&self,
		request: &ExportMetadataTmlRequest,
	) -> Result<Vec<ExportedTml>, ClientError> {
		let mut inner = self.inner.lock();
		inner.exports.push(request.clone());

		if inner.empty_exports > 0 {
			inner.empty_exports -= 1;
			return Ok(vec![])
		}

		request
			.metadata
			.iter()
			.map(|metadata| {
				let edoc = inner
					.objects
					.get(&metadata.identifier)
					.cloned()
					.ok_or_else(|| ClientError::NotFound(metadata.identifier.clone()))?;
				Ok(ExportedTml {
					edoc,
					info: ExportInfo { id: metadata.identifier.clone(), name: None, status: Status::ok() },
				})
			})
			.collect()
	}

	async fn import_tml(
		&self,
		request: &ImportMetadataTmlRequest,
	) -> Result<Vec<ImportedTml>, ClientError> {
		let mut inner = self.inner.lock();
		inner.imports.push(request.clone());

		if let Some(results) = inner.scripted.pop_front() {
			return Ok(results)
		}
		if request.import_policy == ImportPolicy::ValidateOnly {
			return Ok(request.metadata_tmls.iter().map(|_| ImportedTml::ok("")).collect())
		}

		Ok(request
			.metadata_tmls
			.iter()
			.map(|document| {
				let rendered = inner.render(document);
				let id = inner.object_for(&rendered);
				inner.objects.insert(id.clone(), rendered);
				ImportedTml::ok(id)
			})
			.collect())
	}

	async fn delete_metadata(&self, request: &DeleteMetadataRequest) -> Result<(), ClientError> {
		let mut inner = self.inner.lock();
		inner.deletes.push(request.clone());

		if let Some(missing) =
			request.metadata.iter().find(|metadata| !inner.objects.contains_key(&metadata.identifier))
		{
			return Err(ClientError::NotFound(missing.identifier.clone()))
		}
		for metadata in &request.metadata {
			inner.objects.remove(&metadata.identifier);
		}
		Ok(())
	}
}
