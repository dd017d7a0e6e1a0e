/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


//! Request and response bodies of the ThoughtSpot REST API v2 endpoints used by tsprov.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataIdentifier {
	pub identifier: String,
}

impl From<String> for MetadataIdentifier {
	fn from(identifier: String) -> Self {
		Self { identifier }
	}
}

impl From<&str> for MetadataIdentifier {
	fn from(identifier: &str) -> Self {
		Self { identifier: identifier.to_string() }
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdocFormat {
	Json,
	#[default]
	Yaml,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
	pub include_guid: bool,
	pub include_obj_id: bool,
}

impl ExportOptions {
	/// Export GUIDs, or object ids when `use_object_id` is set.
	pub fn for_object_id(use_object_id: bool) -> Self {
		Self { include_guid: !use_object_id, include_obj_id: use_object_id }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportMetadataTmlRequest {
	pub metadata: Vec<MetadataIdentifier>,
	pub edoc_format: EdocFormat,
	pub export_options: ExportOptions,
}

impl ExportMetadataTmlRequest {
	pub fn new<I, S>(ids: I, export_options: ExportOptions) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			metadata: ids.into_iter().map(|id| MetadataIdentifier { identifier: id.into() }).collect(),
			edoc_format: EdocFormat::Yaml,
			export_options,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
	Ok,
	Warning,
	Error,
	#[serde(other)]
	Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
	pub status_code: StatusCode,
	#[serde(default)]
	pub error_message: Option<String>,
}

impl Status {
	pub fn ok() -> Self {
		Self { status_code: StatusCode::Ok, error_message: None }
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self { status_code: StatusCode::Error, error_message: Some(message.into()) }
	}

	pub fn is_error(&self) -> bool {
		self.status_code == StatusCode::Error
	}

	pub fn message(&self) -> &str {
		self.error_message.as_deref().unwrap_or("no error message")
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportInfo {
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	pub status: Status,
}

/// One exported object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedTml {
	/// The document as rendered by the service.
	#[serde(default)]
	pub edoc: String,
	pub info: ExportInfo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportPolicy {
	Partial,
	#[default]
	AllOrNone,
	ValidateOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportMetadataTmlRequest {
	pub metadata_tmls: Vec<String>,
	pub import_policy: ImportPolicy,
	pub create_new: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportHeader {
	#[serde(default)]
	pub id_guid: Option<String>,
	#[serde(default)]
	pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
	pub status: Status,
	#[serde(default)]
	pub header: ImportHeader,
}

/// Outcome of one imported document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedTml {
	pub response: ImportResponse,
}

impl ImportedTml {
	pub fn ok(id_guid: impl Into<String>) -> Self {
		Self {
			response: ImportResponse {
				status: Status::ok(),
				header: ImportHeader { id_guid: Some(id_guid.into()), name: None },
			},
		}
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self {
			response: ImportResponse { status: Status::error(message), header: Default::default() },
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteMetadataRequest {
	pub metadata: Vec<MetadataIdentifier>,
}

impl DeleteMetadataRequest {
	pub fn new<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { metadata: ids.into_iter().map(|id| MetadataIdentifier { identifier: id.into() }).collect() }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct TokenRequest<'a> {
	pub username: &'a str,
	pub password: &'a str,
	pub org_identifier: &'a str,
	pub validity_time_in_sec: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
	pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Org {
	pub id: serde_json::Value,
	#[serde(default)]
	pub name: Option<String>,
}

/// The user the client is authenticated as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub current_org: Option<Org>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	#[test]
	fn export_request_wire_format() -> serde_json::Result<()> {
		let request = ExportMetadataTmlRequest::new(["id-1"], ExportOptions::for_object_id(false));
		assert_eq!(
			serde_json::to_value(&request)?,
			json!({
				"metadata": [{ "identifier": "id-1" }],
				"edoc_format": "YAML",
				"export_options": { "include_guid": true, "include_obj_id": false },
			})
		);
		Ok(())
	}

	#[test]
	fn import_response_without_header() -> serde_json::Result<()> {
		let imported: Vec<ImportedTml> = serde_json::from_value(json!([{
			"response": { "status": { "status_code": "ERROR", "error_message": "bad column" } }
		}]))?;
		assert!(imported[0].response.status.is_error());
		assert_eq!(imported[0].response.status.message(), "bad column");
		assert_eq!(imported[0].response.header.id_guid, None);
		Ok(())
	}

	#[test]
	fn unknown_status_code_is_tolerated() -> serde_json::Result<()> {
		let status: Status = serde_json::from_value(json!({ "status_code": "PENDING" }))?;
		assert_eq!(status.status_code, StatusCode::Unknown);
		assert!(!status.is_error());
		Ok(())
	}
}
