/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


//! Drives [`Resource`] lifecycles against a client and keeps the state store current.
//!
//! A run is made of two steps: [`Engine::plan`] compares the desired resource with the state and
//! resolves a [`ResourceAction`], [`Engine::apply`] executes it. Nothing is written to the state
//! when a lifecycle call fails.

use crate::{
	resources::PROVIDER,
	state::{self, StateDiff, StateHandler},
};
use serde::de::DeserializeOwned;
use tsprov_sdk::{ReadOutcome, Resource, ResourceAction, Result, Urn};

/// The outcome of [`Engine::plan`] for one resource.
#[derive(Debug, Clone)]
pub struct Plan<R> {
	pub urn: Urn,
	/// [`ResourceAction::Get`] when there is nothing to do.
	pub action: ResourceAction,
	/// The state the resource will have, computed attributes excepted.
	pub resource: R,
	pub prior: Option<R>,
	/// Leaf by leaf changes between `prior` and `resource`.
	pub changes: StateDiff,
}

impl<R> Plan<R> {
	pub fn has_changes(&self) -> bool {
		self.action != ResourceAction::Get
	}
}

pub struct Engine<'a, C: ?Sized, S: ?Sized> {
	client: &'a C,
	state: &'a S,
}

impl<'a, C, S> Engine<'a, C, S>
where
	C: ?Sized + Sync,
	S: StateHandler + ?Sized,
{
	pub fn new(client: &'a C, state: &'a S) -> Self {
		Self { client, state }
	}

	pub fn urn<R: Resource<C>>(name: &str) -> Result<Urn> {
		Urn::resource(PROVIDER, R::KIND, name)
	}

	/// The resource `urn` as last written to the state.
	pub fn prior<R: DeserializeOwned>(&self, urn: &Urn) -> Result<Option<R>> {
		self.state
			.get(urn)?
			.map(|raw| serde_json::from_value(raw).map_err(Into::into))
			.transpose()
	}

	pub fn plan<R>(&self, name: &str, desired: R) -> Result<Plan<R>>
	where
		R: Resource<C> + DeserializeOwned + Clone,
	{
		desired.validate()?;
		let urn = Self::urn::<R>(name)?;

		let Some(prior) = self.prior::<R>(&urn)? else {
			let changes = state::diff(&desired.to_raw_state()?, &serde_json::Value::Null);
			return Ok(Plan { urn, action: ResourceAction::Create, resource: desired, prior: None, changes })
		};

		let mut planned = desired.clone();
		planned.keep_computed(&prior);

		let changes = state::diff(&planned.to_raw_state()?, &prior.to_raw_state()?);
		let diff = changes.resource_diff();
		let (action, resource) = if diff.is_empty() {
			(ResourceAction::Get, planned)
		} else if planned.requires_replace(&prior) {
			(ResourceAction::Replace { diff }, desired)
		} else {
			(ResourceAction::Update { diff }, planned)
		};

		log::debug!("{}: {:?}", urn.as_display(), action);
		Ok(Plan { urn, action, resource, prior: Some(prior), changes })
	}

	/// Executes `plan` and returns the resource as saved in the state.
	pub async fn apply<R>(&self, plan: Plan<R>) -> Result<R>
	where
		R: Resource<C>,
	{
		let Plan { urn, action, mut resource, prior, .. } = plan;
		if action == ResourceAction::Get {
			return Ok(resource)
		}

		log::info!("{} {}", action.action_present_participe_str(), urn.as_display());
		match &action {
			ResourceAction::Create => resource.create(self.client).await?,
			ResourceAction::Update { diff } => resource.update(self.client, diff).await?,
			ResourceAction::Replace { .. } => {
				if let Some(mut prior) = prior {
					prior.delete(self.client).await?;
					self.state.delete(&urn)?;
				}
				resource.create(self.client).await?;
			},
			ResourceAction::Delete => {
				resource.delete(self.client).await?;
				self.state.delete(&urn)?;
				return Ok(resource)
			},
			ResourceAction::Get => {},
		}

		self.state.save(&urn, &resource.to_raw_state()?)?;
		log::info!("{} {}", action.action_past_str(), urn.as_display());
		Ok(resource)
	}

	/// Refreshes `name` from the service.
	///
	/// Returns `None` when the resource isn't managed, or when it was deleted remotely, in which
	/// case it is dropped from the state.
	pub async fn refresh<R>(&self, name: &str) -> Result<Option<R>>
	where
		R: Resource<C> + DeserializeOwned,
	{
		let urn = Self::urn::<R>(name)?;
		let Some(mut resource) = self.prior::<R>(&urn)? else {
			return Ok(None)
		};

		match resource.get(self.client).await? {
			ReadOutcome::Present => {
				self.state.save(&urn, &resource.to_raw_state()?)?;
				Ok(Some(resource))
			},
			ReadOutcome::Removed => {
				self.state.delete(&urn)?;
				Ok(None)
			},
		}
	}

	/// Deletes `name`, returns `false` when it wasn't managed.
	pub async fn destroy<R>(&self, name: &str) -> Result<bool>
	where
		R: Resource<C> + DeserializeOwned,
	{
		let urn = Self::urn::<R>(name)?;
		let Some(resource) = self.prior::<R>(&urn)? else {
			return Ok(false)
		};

		let plan = Plan {
			urn,
			action: ResourceAction::Delete,
			resource,
			prior: None,
			changes: StateDiff::default(),
		};
		self.apply(plan).await?;
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{resources::TmlResource, state::FileState, testing::FakeService};
	use pretty_assertions::assert_eq;
	use tempfile::TempDir;
	use tsprov_sdk::ResourceDiff;

	const A: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
	const B: &str = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";

	fn sales(name: &str) -> TmlResource {
		TmlResource::new(format!("guid: {A}\ntable:\n  name: {name}"))
	}

	fn store() -> Result<(TempDir, FileState)> {
		let dir = tempfile::tempdir()?;
		let state = FileState::new(dir.path().join("state.json"))?;
		Ok((dir, state))
	}

	#[tokio::test]
	async fn first_apply_creates() -> Result<()> {
		let (_dir, state) = store()?;
		let service = FakeService::default();
		let engine = Engine::new(&service, &state);

		let plan = engine.plan("sales", sales("Sales"))?;
		assert_eq!(plan.action, ResourceAction::Create);

		let created = engine.apply(plan).await?;
		let urn = Engine::<FakeService, FileState>::urn::<TmlResource>("sales")?;
		assert_eq!(state.get(&urn)?, Some(created.to_raw_state()?));
		assert!(created.id.is_some());
		Ok(())
	}

	#[tokio::test]
	async fn unchanged_configuration_is_a_no_op() -> Result<()> {
		let (_dir, state) = store()?;
		let service = FakeService::default();
		let engine = Engine::new(&service, &state);
		engine.apply(engine.plan("sales", sales("Sales"))?).await?;

		let plan = engine.plan("sales", sales("Sales"))?;

		assert!(!plan.has_changes());
		engine.apply(plan).await?;
		assert_eq!(service.imports().len(), 1);
		Ok(())
	}

	#[tokio::test]
	async fn edited_document_is_updated_in_place() -> Result<()> {
		let (_dir, state) = store()?;
		let service = FakeService::default();
		let engine = Engine::new(&service, &state);
		let created = engine.apply(engine.plan("sales", sales("Sales"))?).await?;

		let plan = engine.plan("sales", sales("Net sales"))?;
		assert_eq!(plan.action, ResourceAction::Update { diff: ResourceDiff::new(vec!["tml".into()]) });

		let updated = engine.apply(plan).await?;
		assert_eq!(updated.id, created.id);
		assert_eq!(updated.guids, created.guids);
		assert!(service.deletes().is_empty());
		Ok(())
	}

	#[tokio::test]
	async fn new_leading_guid_replaces() -> Result<()> {
		let (_dir, state) = store()?;
		let service = FakeService::default();
		let engine = Engine::new(&service, &state);
		let created = engine.apply(engine.plan("sales", sales("Sales"))?).await?;

		let moved = TmlResource::new(format!("guid: {B}\ntable:\n  name: Sales"));
		let plan = engine.plan("sales", moved)?;
		assert!(matches!(plan.action, ResourceAction::Replace { .. }));
		assert_eq!(plan.resource.id, None);

		let replaced = engine.apply(plan).await?;
		assert_eq!(service.deletes().len(), 1);
		assert_ne!(replaced.id, created.id);
		assert_eq!(service.object_count(), 1);
		Ok(())
	}

	#[tokio::test]
	async fn refresh_drops_remotely_deleted_resource() -> Result<()> {
		let (_dir, state) = store()?;
		let service = FakeService::default();
		let engine = Engine::new(&service, &state);
		let created = engine.apply(engine.plan("sales", sales("Sales"))?).await?;

		assert!(engine.refresh::<TmlResource>("sales").await?.is_some());

		service.remove(created.id.as_deref().expect("id"));
		assert_eq!(engine.refresh::<TmlResource>("sales").await?, None);
		assert!(state.resources()?.is_empty());
		Ok(())
	}

	#[tokio::test]
	async fn destroy_forgets_the_resource() -> Result<()> {
		let (_dir, state) = store()?;
		let service = FakeService::default();
		let engine = Engine::new(&service, &state);
		engine.apply(engine.plan("sales", sales("Sales"))?).await?;

		assert!(engine.destroy::<TmlResource>("sales").await?);
		assert!(!engine.destroy::<TmlResource>("sales").await?);
		assert_eq!(service.object_count(), 0);
		assert!(state.resources()?.is_empty());
		Ok(())
	}

	#[tokio::test]
	async fn invalid_configuration_is_rejected_before_planning() -> Result<()> {
		let (_dir, state) = store()?;
		let service = FakeService::default();
		let engine = Engine::new(&service, &state);

		let err = engine.plan("sales", sales("Sales").use_object_id(true)).unwrap_err();

		assert!(err.to_string().starts_with("GUIDs Not Allowed"));
		assert!(state.resources()?.is_empty());
		Ok(())
	}
}
