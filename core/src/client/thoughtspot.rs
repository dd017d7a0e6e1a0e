/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use super::{
	models::{TokenRequest, TokenResponse},
	ClientError, CurrentUser, DeleteMetadataRequest, ExportMetadataTmlRequest, ExportedTml,
	ImportMetadataTmlRequest, ImportedTml, MetadataService,
};
use crate::config::Credentials;
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

const TOKEN_PATH: &str = "api/rest/2.0/auth/token/full";
const CURRENT_USER_PATH: &str = "api/rest/2.0/auth/session/user";
const EXPORT_PATH: &str = "api/rest/2.0/metadata/tml/export";
const IMPORT_PATH: &str = "api/rest/2.0/metadata/tml/import";
const DELETE_PATH: &str = "api/rest/2.0/metadata/delete";

const TOKEN_VALIDITY_SECS: u64 = 3600;

/// REST client for a single ThoughtSpot org, authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct ThoughtSpotClient {
	client: reqwest::Client,
	base_url: Url,
	token: String,
}

impl ThoughtSpotClient {
	/// Logs in with the given credentials and returns an authenticated client.
	pub async fn connect(credentials: &Credentials) -> Result<Self, ClientError> {
		let client = reqwest::Client::builder()
			.user_agent(concat!("tsprov/", env!("CARGO_PKG_VERSION")))
			.timeout(credentials.timeout)
			.build()?;
		let base_url = normalize_base(&credentials.host);

		log::debug!("Requesting a token from {}", base_url);
		let response = client
			.post(base_url.join(TOKEN_PATH)?)
			.header(ACCEPT, "application/json")
			.json(&TokenRequest {
				username: &credentials.username,
				password: &credentials.password,
				org_identifier: &credentials.org_identifier,
				validity_time_in_sec: TOKEN_VALIDITY_SECS,
			})
			.send()
			.await?;
		let TokenResponse { token } = decode(response).await?;

		Ok(Self::from_client(client, base_url, token))
	}

	pub fn from_client(client: reqwest::Client, base_url: Url, token: String) -> Self {
		Self { client, base_url: normalize_base(&base_url), token }
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	pub async fn current_user(&self) -> Result<CurrentUser, ClientError> {
		let response = self
			.client
			.get(self.base_url.join(CURRENT_USER_PATH)?)
			.bearer_auth(&self.token)
			.header(ACCEPT, "application/json")
			.send()
			.await?;
		decode(response).await
	}

	async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, ClientError> {
		let url = self.base_url.join(path)?;
		log::trace!("POST {}", url);
		let response = self
			.client
			.post(url)
			.bearer_auth(&self.token)
			.header(ACCEPT, "application/json")
			.json(body)
			.send()
			.await?;
		check_status(response).await
	}
}

#[async_trait]
impl MetadataService for ThoughtSpotClient {
	async fn export_tml(
		&self,
		request: &ExportMetadataTmlRequest,
	) -> Result<Vec<ExportedTml>, ClientError> {
		decode(self.post(EXPORT_PATH, request).await?).await
	}

	async fn import_tml(
		&self,
		request: &ImportMetadataTmlRequest,
	) -> Result<Vec<ImportedTml>, ClientError> {
		decode(self.post(IMPORT_PATH, request).await?).await
	}

	async fn delete_metadata(&self, request: &DeleteMetadataRequest) -> Result<(), ClientError> {
		self.post(DELETE_PATH, request).await.map(|_| ())
	}
}

/// `Url::join` drops the last path segment when it has no trailing slash.
fn normalize_base(host: &Url) -> Url {
	let mut base = host.clone();
	if !base.path().ends_with('/') {
		let path = format!("{}/", base.path());
		base.set_path(&path);
	}
	base
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
	let status = response.status();
	if status == StatusCode::NOT_FOUND {
		let url = response.url().to_string();
		return Err(ClientError::NotFound(url))
	} else if !status.is_success() {
		let body = response.text().await.unwrap_or_default();
		return Err(ClientError::Status { status: status.as_u16(), body })
	}
	Ok(response)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
	let response = check_status(response).await?;
	let body = response.text().await?;
	serde_json::from_str(&body).map_err(Into::into)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::client::{ExportOptions, ImportPolicy};
	use pretty_assertions::assert_eq;
	use serde_json::json;
	use std::time::Duration;
	use wiremock::{
		matchers::{body_json, header, method, path},
		Mock, MockServer, ResponseTemplate,
	};

	async fn connected(server: &MockServer) -> ThoughtSpotClient {
		Mock::given(method("POST"))
			.and(path("/api/rest/2.0/auth/token/full"))
			.and(body_json(json!({
				"username": "admin",
				"password": "secret",
				"org_identifier": "primary",
				"validity_time_in_sec": 3600,
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t0k" })))
			.expect(1)
			.mount(server)
			.await;

		let credentials = Credentials {
			host: Url::parse(&server.uri()).expect("mock server uri"),
			username: "admin".into(),
			password: "secret".into(),
			org_identifier: "primary".into(),
			timeout: Duration::from_secs(5),
		};
		ThoughtSpotClient::connect(&credentials).await.expect("login succeeds")
	}

	#[tokio::test]
	async fn export_sends_bearer_token() -> Result<(), ClientError> {
		let server = MockServer::start().await;
		let client = connected(&server).await;

		Mock::given(method("POST"))
			.and(path("/api/rest/2.0/metadata/tml/export"))
			.and(header("Authorization", "Bearer t0k"))
			.and(body_json(json!({
				"metadata": [{ "identifier": "obj-1" }],
				"edoc_format": "YAML",
				"export_options": { "include_guid": true, "include_obj_id": false },
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!([{
				"edoc": "guid: bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb\nname: Foo",
				"info": { "id": "obj-1", "name": "Foo", "status": { "status_code": "OK" } },
			}])))
			.mount(&server)
			.await;

		let exported = client
			.export_tml(&ExportMetadataTmlRequest::new(["obj-1"], ExportOptions::for_object_id(false)))
			.await?;

		assert_eq!(exported.len(), 1);
		assert_eq!(exported[0].info.id, "obj-1");
		assert!(exported[0].edoc.ends_with("name: Foo"));
		Ok(())
	}

	#[tokio::test]
	async fn missing_object_is_not_found() {
		let server = MockServer::start().await;
		let client = connected(&server).await;

		Mock::given(method("POST"))
			.and(path("/api/rest/2.0/metadata/tml/export"))
			.respond_with(ResponseTemplate::new(404))
			.mount(&server)
			.await;

		let err = client
			.export_tml(&ExportMetadataTmlRequest::new(["gone"], ExportOptions::default()))
			.await
			.unwrap_err();
		assert!(err.is_not_found());
	}

	#[tokio::test]
	async fn failure_keeps_response_body() {
		let server = MockServer::start().await;
		let client = connected(&server).await;

		Mock::given(method("POST"))
			.and(path("/api/rest/2.0/metadata/tml/import"))
			.respond_with(ResponseTemplate::new(500).set_body_string("tml parse error at line 3"))
			.mount(&server)
			.await;

		let err = client
			.import_tml(&ImportMetadataTmlRequest {
				metadata_tmls: vec!["guid: x".into()],
				import_policy: ImportPolicy::AllOrNone,
				create_new: false,
			})
			.await
			.unwrap_err();
		assert_eq!(err.to_string(), "unexpected status 500: tml parse error at line 3");
	}

	#[tokio::test]
	async fn delete_accepts_empty_body() -> Result<(), ClientError> {
		let server = MockServer::start().await;
		let client = connected(&server).await;

		Mock::given(method("POST"))
			.and(path("/api/rest/2.0/metadata/delete"))
			.and(body_json(json!({ "metadata": [{ "identifier": "a" }, { "identifier": "b" }] })))
			.respond_with(ResponseTemplate::new(204))
			.expect(1)
			.mount(&server)
			.await;

		client.delete_metadata(&DeleteMetadataRequest::new(["a", "b"])).await
	}

	#[test]
	fn base_url_keeps_path_prefix() -> Result<(), ClientError> {
		let base = normalize_base(&Url::parse("https://acme.example.com/thoughtspot")?);
		assert_eq!(
			base.join(EXPORT_PATH)?.as_str(),
			"https://acme.example.com/thoughtspot/api/rest/2.0/metadata/tml/export"
		);
		Ok(())
	}
}
