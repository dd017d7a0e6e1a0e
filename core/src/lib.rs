/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


//! Core of tsprov: the ThoughtSpot REST client, the TML GUID reconciler, the resources built on
//! top of them, and the engine persisting their state.

pub use error::{Error, Result};
pub use tsprov_sdk as sdk;

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod resources;
pub mod state;
pub mod tml;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ClientError, MetadataService, ThoughtSpotClient};
pub use config::{Credentials, ProviderConfig};
pub use engine::{Engine, Plan};
pub use resources::{MetadataEntry, MetadataResource, TmlResource};
pub use state::{FileState, StateHandler};
pub use tml::{GuidMapping, Reconciler, SubstitutionMode};
