/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use crate::Result;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, str::FromStr};

const PROVIDER_PREFIX: &str = "urn:provider:";

/// URNs (Uniform Resource Name) identify a resource within the tsprov state.
///
/// A URN is made of the provider name, the resource kind and, in the q-component, the name the
/// user gave to the resource:
///
/// - Resource URN:        `urn:provider:thoughtspot:tml`
/// - Named Resource URN:  `urn:provider:thoughtspot:tml?=sales_worksheet`
///
/// The state store is keyed by named resource URNs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Urn(urn::Urn);

impl PartialOrd for Urn {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Urn {
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.cmp(&other.0)
	}
}

impl Urn {
	/// Builds the URN of the resource `name` of kind `kind` managed by `provider`.
	pub fn resource(provider: &str, kind: &str, name: &str) -> Result<Self> {
		format!("{PROVIDER_PREFIX}{provider}:{kind}?={name}").parse()
	}

	pub fn as_provider(&self) -> Result<String> {
		self.nss()
			.split(':')
			.next()
			.filter(|provider| !provider.is_empty())
			.map(ToString::to_string)
			.ok_or_else(|| anyhow!("invalid provider in `{}`", self))
	}

	/// Resource kind, the NSS without the provider segment.
	pub fn kind(&self) -> Option<&str> {
		self.nss().split_once(':').map(|(_, kind)| kind)
	}

	/// Name of the resource, stored in the q-component.
	pub fn name(&self) -> Option<&str> {
		self.q_component()
	}

	pub fn as_display(&self) -> String {
		self.to_string().replace(PROVIDER_PREFIX, "")
	}

	pub fn as_str(&self) -> &str {
		self.0.as_str()
	}

	/// NSS (Namespace-specific string) identifying the resource.
	///
	/// For example, in `urn:provider:thoughtspot:tml`, `thoughtspot:tml` is the NSS.
	pub fn nss(&self) -> &str {
		self.0.nss()
	}

	/// q-component, following the `?=` character sequence.
	pub fn q_component(&self) -> Option<&str> {
		self.0.q_component()
	}
}

impl FromStr for Urn {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Urn(urn::Urn::from_str(s)?))
	}
}

impl std::fmt::Display for Urn {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}
