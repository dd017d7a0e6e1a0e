/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use url::Url;

pub const ENV_HOST: &str = "THOUGHTSPOT_HOST";
pub const ENV_USERNAME: &str = "THOUGHTSPOT_USERNAME";
pub const ENV_PASSWORD: &str = "THOUGHTSPOT_PASSWORD";
pub const ENV_ORG_IDENTIFIER: &str = "THOUGHTSPOT_ORG_IDENTIFIER";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Provider configuration as written by the user. Every explicit value, even an empty one, wins
/// over its environment variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
	pub host: Option<String>,
	pub username: Option<String>,
	pub password: Option<String>,
	pub org_identifier: Option<String>,
	/// Per request timeout of the REST client, in seconds.
	pub timeout: Option<u64>,
}

/// Fully resolved connection settings.
#[derive(Clone, PartialEq)]
pub struct Credentials {
	pub host: Url,
	pub username: String,
	pub password: String,
	pub org_identifier: String,
	pub timeout: Duration,
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("host", &self.host.as_str())
			.field("username", &self.username)
			.field("password", &"[sensitive]")
			.field("org_identifier", &self.org_identifier)
			.field("timeout", &self.timeout)
			.finish()
	}
}

impl ProviderConfig {
	/// Resolves the configuration against the process environment.
	pub fn resolve(&self) -> Result<Credentials> {
		self.resolve_with(|key| std::env::var(key).ok())
	}

	/// Resolves the configuration, reading missing values through `env`.
	///
	/// All missing attributes are reported at once.
	pub fn resolve_with(&self, env: impl Fn(&str) -> Option<String>) -> Result<Credentials> {
		let pick = |explicit: &Option<String>, key: &str| {
			explicit.clone().or_else(|| env(key)).unwrap_or_default()
		};

		let host = pick(&self.host, ENV_HOST);
		let username = pick(&self.username, ENV_USERNAME);
		let password = pick(&self.password, ENV_PASSWORD);
		let org_identifier = pick(&self.org_identifier, ENV_ORG_IDENTIFIER);

		let mut errors = vec![];
		for (value, attribute, label, key) in [
			(&host, "host", "Host", ENV_HOST),
			(&username, "username", "Username", ENV_USERNAME),
			(&password, "password", "Password", ENV_PASSWORD),
			(&org_identifier, "org_identifier", "OrgIdentifier", ENV_ORG_IDENTIFIER),
		] {
			if value.is_empty() {
				errors.push(missing(attribute, label, key));
			}
		}

		if !errors.is_empty() {
			return Err(if errors.len() == 1 { errors.remove(0) } else { Error::Config(errors) })
		}

		Ok(Credentials {
			host: parse_host(&host)?,
			username,
			password,
			org_identifier,
			timeout: Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
		})
	}
}

fn missing(attribute: &'static str, label: &str, env_key: &str) -> Error {
	Error::MissingConfig {
		attribute,
		message: format!(
			"The provider cannot create the ThoughtSpot API client as there is a missing or empty value for the ThoughtSpot {label}. \
			 Set the {attribute} value in the configuration or use the {env_key} environment variable. \
			 If either is already set, ensure the value is not empty."
		),
	}
}

/// Accepts bare host names, `https` is assumed when no scheme is given.
fn parse_host(host: &str) -> Result<Url> {
	let with_scheme = if host.contains("://") { host.to_string() } else { format!("https://{host}") };
	Url::parse(&with_scheme)
		.map_err(|err| Error::InvalidConfig { attribute: "host", message: err.to_string() })
}
