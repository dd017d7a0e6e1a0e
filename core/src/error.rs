/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use crate::client::ClientError;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Lifecycle steps, used as the summary of an [`Error`].
pub const IMPORT_TML: &str = "Error importing TML";
pub const READ_TML: &str = "Error reading TML";
pub const DELETE_METADATA: &str = "Error deleting metadata";
pub const CONNECT: &str = "Unable to create ThoughtSpot client";

/// Errors returned by the reconciler and the resources.
///
/// Every message starts with the lifecycle step that failed, followed by the verbatim text of the
/// underlying failure.
#[derive(Debug, Error)]
pub enum Error {
	#[error("{summary}: {source}")]
	Remote {
		summary: &'static str,
		#[source]
		source: ClientError,
	},

	/// A document of a batch was rejected by the service. The whole operation is aborted.
	/// `position` is 1-based.
	#[error("{summary}: document #{position} failed, unexpected error: {message}")]
	Status { summary: &'static str, position: usize, message: String },

	#[error("{summary}: the service answered without a result for document #{position}")]
	MissingResult { summary: &'static str, position: usize },

	#[error("Could not extract guids from TML: no guids found for metadata id {id}")]
	GuidsNotFound { id: String },

	#[error(
		"Could not correlate guids: {original} guid(s) authored but {computed} rendered by the service"
	)]
	GuidCountMismatch { original: usize, computed: usize },

	#[error(
		"GUIDs Not Allowed When Using Object ID: when 'use_object_id' is set to true, the 'tml' attribute must not contain any GUIDs"
	)]
	GuidsNotAllowed,

	#[error("Missing {attribute}: {message}")]
	MissingConfig { attribute: &'static str, message: String },

	#[error("Invalid {attribute}: {message}")]
	InvalidConfig { attribute: &'static str, message: String },

	/// Several configuration errors reported together.
	#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
	Config(Vec<Error>),
}

impl Error {
	/// Wraps a client failure under `summary`, for use with `map_err`.
	pub fn remote(summary: &'static str) -> impl FnOnce(ClientError) -> Self {
		move |source| Error::Remote { summary, source }
	}
}
