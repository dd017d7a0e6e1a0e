/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


//! The tsprov SDK holds the vocabulary shared by every tsprov resource: the [`Resource`] trait
//! the engine drives, the [`ResourceAction`] a plan resolves to, the [`ResourceDiff`] describing
//! which attributes moved, and the [`Urn`] resources are stored under.
//!
//! # Key concepts
//!
//! - **Client**: the remote service a resource talks to. It is handed to every lifecycle call
//!   explicitly, resources never keep a global handle around.
//!
//! - **Resource**: a serializable struct that is at the same time the desired configuration and,
//!   once an action ran, the state persisted by the engine.
//!
//! # Re-exports
//!
//! This module re-exports some helpers from other libraries, such as `serde`, `async_trait`,
//! `serde_json`, and `tokio`. These re-exports are available under the `ext` submodule.

pub use crate::urn::Urn;
pub use anyhow::Result;
use async_trait::async_trait;
pub use logger::CliLogger;
use serde::{Deserialize, Serialize};

mod logger;
mod urn;

/// Re-exports some helpers from other libraries
pub mod ext {
	pub use anyhow;
	pub use async_trait;
	pub use serde;
	pub use serde_json;
	pub use tokio;
}

/// An enum that defines the possible actions that can be performed on a
/// resource, such as creating, updating, replacing or deleting
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ResourceAction {
	Update {
		diff: ResourceDiff,
	},
	/// The change can't be applied in place, the resource is deleted and created again.
	Replace {
		diff: ResourceDiff,
	},
	Create,
	Delete,
	#[default]
	Get,
}

impl ResourceAction {
	/// Present participe of the action
	pub fn action_present_participe_str(&self) -> &str {
		match self {
			ResourceAction::Update { .. } => "Updating",
			ResourceAction::Replace { .. } => "Replacing",
			ResourceAction::Create => "Creating",
			ResourceAction::Delete => "Deleting",
			ResourceAction::Get => "Reading",
		}
	}

	pub fn action_past_str(&self) -> &str {
		match self {
			ResourceAction::Update { .. } => "Updated",
			ResourceAction::Replace { .. } => "Replaced",
			ResourceAction::Create => "Created",
			ResourceAction::Delete => "Deleted",
			ResourceAction::Get => "Read",
		}
	}

	/// The attribute diff carried by the action, if any.
	pub fn diff(&self) -> Option<&ResourceDiff> {
		match self {
			ResourceAction::Update { diff } | ResourceAction::Replace { diff } => Some(diff),
			_ => None,
		}
	}
}

/// The top level attributes that differ between the prior state and the planned state of a
/// resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDiff(Vec<String>);

impl ResourceDiff {
	pub fn new(diff: Vec<String>) -> Self {
		Self(diff)
	}

	pub fn has_change(&self, key: impl ToString) -> bool {
		self.0.contains(&key.to_string())
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn changes(&self) -> &[String] {
		&self.0
	}
}

/// What a refresh found on the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
	/// The object exists, `self` now holds its refreshed state.
	Present,
	/// The object was deleted outside of tsprov and should be dropped from the state.
	Removed,
}

/// A trait for serializing a resource to its raw state.
pub trait ResourceSerialize {
	/// Converts the resource to its raw state as a `serde_json::Value`.
	fn to_raw_state(&self) -> Result<serde_json::Value>;
}

impl<R: Serialize> ResourceSerialize for R {
	fn to_raw_state(&self) -> Result<serde_json::Value> {
		serde_json::to_value(self).map_err(Into::into)
	}
}

/// A trait representing a resource managed through a client `C`.
///
/// The resource struct is both the desired configuration and the state written back by the
/// engine, computed attributes are filled in by the lifecycle calls.
#[async_trait]
pub trait Resource<C: ?Sized + Sync>: ResourceSerialize + Send + Sync {
	/// Resource kind, used as the last segment of the resource URN.
	const KIND: &'static str;

	/// Checks the desired configuration before any plan is made.
	fn validate(&self) -> Result<()> {
		Ok(())
	}

	/// Copies the computed attributes of `prior` (ids, GUID mappings, ...) that a freshly written
	/// configuration can't know about.
	fn keep_computed(&mut self, prior: &Self)
	where
		Self: Sized;

	/// Returns `true` when moving from `prior` to `self` can't be done in place.
	fn requires_replace(&self, _prior: &Self) -> bool
	where
		Self: Sized,
	{
		false
	}

	/// Refreshes the resource from the remote side.
	///
	/// ### Returns
	///
	/// [`ReadOutcome::Removed`] when the remote object no longer exists; this is not an error.
	async fn get(&mut self, client: &C) -> Result<ReadOutcome>;
	/// Creates the resource and populates its computed attributes.
	async fn create(&mut self, client: &C) -> Result<()>;
	/// Deletes the resource.
	async fn delete(&mut self, client: &C) -> Result<()>;
	/// Applies the planned state, `self` already carries the computed attributes of the prior
	/// state.
	///
	/// # Arguments
	///
	/// * `client` - the remote service.
	/// * `diff` - A `ResourceDiff` that represents the changes to be applied to the resource.
	async fn update(&mut self, client: &C, diff: &ResourceDiff) -> Result<()>;
}
