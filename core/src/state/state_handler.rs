/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use serde_json::Value;
use std::collections::BTreeSet;
use tsprov_sdk::{Result, Urn};

/// Where the state of the managed resources is kept, keyed by resource URN.
pub trait StateHandler: Send + Sync {
	fn get(&self, urn: &Urn) -> Result<Option<Value>>;
	fn save(&self, urn: &Urn, state: &Value) -> Result<()>;
	/// Removing an unknown URN is a no-op.
	fn delete(&self, urn: &Urn) -> Result<()>;
	fn resources(&self) -> Result<BTreeSet<Urn>>;
}
