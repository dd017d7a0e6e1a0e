/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


//! Access to the object management endpoints of ThoughtSpot.
//!
//! Resources only see the [`MetadataService`] trait; [`ThoughtSpotClient`] is the REST
//! implementation built from the provider configuration.

use async_trait::async_trait;
use thiserror::Error;

mod models;
mod thoughtspot;

pub use models::*;
pub use thoughtspot::ThoughtSpotClient;

/// Failure of a call to the service.
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("{0}")]
	Http(#[from] reqwest::Error),

	#[error("unexpected status {status}: {body}")]
	Status { status: u16, body: String },

	#[error("not found: {0}")]
	NotFound(String),

	#[error("invalid endpoint: {0}")]
	Url(#[from] url::ParseError),

	#[error("unable to decode response: {0}")]
	Decode(#[from] serde_json::Error),
}

impl ClientError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, ClientError::NotFound(_))
	}
}

/// The object management operations the TML resources rely on.
///
/// Export distinguishes a missing object ([`ClientError::NotFound`]) from any other failure.
/// Import reports a status per document; a transport failure is an `Err`.
#[async_trait]
pub trait MetadataService: Send + Sync {
	async fn export_tml(
		&self,
		request: &ExportMetadataTmlRequest,
	) -> Result<Vec<ExportedTml>, ClientError>;

	async fn import_tml(
		&self,
		request: &ImportMetadataTmlRequest,
	) -> Result<Vec<ImportedTml>, ClientError>;

	async fn delete_metadata(&self, request: &DeleteMetadataRequest) -> Result<(), ClientError>;
}
