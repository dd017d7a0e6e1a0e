/* -------------------------------------------------------- *\
 *                                                          *
 *  tsprov: declarative ThoughtSpot TML provider            *
 *                                                          *
 *  This file is licensed as MIT. See LICENSE for details.  *
 *                                                          *
\* ---------------------------------------------------------*/


use crate::{plan, version};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, ValueEnum};
use console::style;
use dialoguer::Confirm;
use std::{fs, path::PathBuf};
use tsprov_core::{
    client::ImportPolicy,
    error::{Error, CONNECT},
    state::DEFAULT_STATE_PATH,
    Engine, FileState, MetadataResource, ProviderConfig, StateHandler, SubstitutionMode,
    ThoughtSpotClient, TmlResource,
};
use tsprov_sdk::{ext::serde::de::DeserializeOwned, Resource, Urn};

const TML: &str = <TmlResource as Resource<ThoughtSpotClient>>::KIND;
const METADATA: &str = <MetadataResource as Resource<ThoughtSpotClient>>::KIND;

type TsEngine<'a> = Engine<'a, ThoughtSpotClient, FileState>;

#[derive(Debug, Parser)]
#[command(name = "tsprov", version = version::LONG_VERSION, about = "Manage ThoughtSpot TML objects declaratively")]
pub struct Cli {
    #[command(flatten)]
    pub provider: ProviderArgs,
    /// State file.
    #[arg(long, global = true, default_value = DEFAULT_STATE_PATH)]
    pub state: PathBuf,
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

/// Connection settings, each one falls back to its `THOUGHTSPOT_*` environment variable.
#[derive(Debug, Default, Args)]
pub struct ProviderArgs {
    /// ThoughtSpot instance, e.g. `https://acme.thoughtspot.cloud`.
    #[arg(long, global = true)]
    pub host: Option<String>,
    #[arg(long, global = true)]
    pub username: Option<String>,
    #[arg(long, global = true)]
    pub password: Option<String>,
    #[arg(long, global = true)]
    pub org_identifier: Option<String>,
    /// Request timeout, in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl From<&ProviderArgs> for ProviderConfig {
    fn from(args: &ProviderArgs) -> Self {
        ProviderConfig {
            host: args.host.clone(),
            username: args.username.clone(),
            password: args.password.clone(),
            org_identifier: args.org_identifier.clone(),
            timeout: args.timeout,
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    /// Create or update a resource from TML files.
    Apply(ApplyCmd),
    /// Read a managed resource back from ThoughtSpot.
    Refresh(RefreshCmd),
    /// Delete a managed resource.
    Destroy(DestroyCmd),
    /// Print the state of one or every managed resource.
    Show(ShowCmd),
    /// Print the user tsprov is authenticated as.
    Whoami,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    Partial,
    AllOrNone,
    ValidateOnly,
}

impl From<Policy> for ImportPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Partial => ImportPolicy::Partial,
            Policy::AllOrNone => ImportPolicy::AllOrNone,
            Policy::ValidateOnly => ImportPolicy::ValidateOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Substitution {
    Chained,
    Pristine,
}

impl From<Substitution> for SubstitutionMode {
    fn from(substitution: Substitution) -> Self {
        match substitution {
            Substitution::Chained => SubstitutionMode::Chained,
            Substitution::Pristine => SubstitutionMode::Pristine,
        }
    }
}

#[derive(Debug, Parser)]
pub struct ApplyCmd {
    /// Name of the resource in the state.
    pub name: String,
    /// TML documents. Several files are imported together as one metadata batch.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Import a single file as a metadata batch.
    #[arg(long, default_value_t = false)]
    pub batch: bool,
    /// Export with object ids instead of GUIDs.
    #[arg(long, default_value_t = false, conflicts_with = "batch")]
    pub use_object_id: bool,
    #[arg(long, value_enum, conflicts_with = "batch")]
    pub substitution: Option<Substitution>,
    /// Import policy of a metadata batch.
    #[arg(long, value_enum)]
    pub import_policy: Option<Policy>,
    /// Only print the plan.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
    /// Apply without asking for confirmation.
    #[arg(long, short, default_value_t = false)]
    pub yes: bool,
}

#[derive(Debug, Parser)]
pub struct RefreshCmd {
    pub name: String,
}

#[derive(Debug, Parser)]
pub struct DestroyCmd {
    pub name: String,
    /// Destroy without asking for confirmation.
    #[arg(long, short, default_value_t = false)]
    pub yes: bool,
}

#[derive(Debug, Parser)]
pub struct ShowCmd {
    pub name: Option<String>,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.subcommand {
            Subcommand::Apply(apply) => apply.run(self).await,
            Subcommand::Refresh(refresh) => refresh.run(self).await,
            Subcommand::Destroy(destroy) => destroy.run(self).await,
            Subcommand::Show(show) => show.run(self),
            Subcommand::Whoami => {
                let client = self.connect().await?;
                let user = client.current_user().await.map_err(Error::remote(CONNECT))?;
                println!("{} <{}>", user.display_name.as_deref().unwrap_or(&user.name), user.id);
                if let Some(org) = &user.current_org {
                    println!("org: {} ({})", org.name.as_deref().unwrap_or_default(), org.id);
                }
                println!("host: {}", client.base_url());
                Ok(())
            },
        }
    }

    fn open_state(&self) -> Result<FileState> {
        FileState::new(&self.state)
    }

    async fn connect(&self) -> Result<ThoughtSpotClient> {
        let credentials = ProviderConfig::from(&self.provider).resolve()?;
        log::debug!("Connecting to {:?}", credentials);
        Ok(ThoughtSpotClient::connect(&credentials).await.map_err(Error::remote(CONNECT))?)
    }
}

/// Finds the kind of the managed resource `name`.
fn managed_kind(state: &FileState, name: &str) -> Result<Option<String>> {
    Ok(state
        .resources()?
        .into_iter()
        .find(|urn| urn.name() == Some(name))
        .and_then(|urn| urn.kind().map(String::from)))
}

fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true)
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

impl ApplyCmd {
    pub async fn run(&self, cli: &Cli) -> Result<()> {
        let documents = self
            .files
            .iter()
            .map(|file| {
                fs::read_to_string(file).with_context(|| format!("unable to read {}", file.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        let state = cli.open_state()?;
        if let Some(kind) = managed_kind(&state, &self.name)? {
            let wanted = if self.is_batch() { METADATA } else { TML };
            if kind != wanted {
                bail!("`{}` is already managed as a {} resource, destroy it first", self.name, kind)
            }
        }

        let client = cli.connect().await?;
        let engine = Engine::new(&client, &state);

        if self.is_batch() {
            let mut resource = MetadataResource::new(documents);
            resource.import_policy = self.import_policy.map(Into::into);
            self.apply(&engine, resource).await
        } else {
            let tml = documents.into_iter().next().unwrap_or_default();
            let mut resource = TmlResource::new(tml).use_object_id(self.use_object_id);
            resource.substitution = self.substitution.map(Into::into).unwrap_or_default();
            self.apply(&engine, resource).await
        }
    }

    fn is_batch(&self) -> bool {
        self.batch || self.files.len() > 1
    }

    async fn apply<R>(&self, engine: &TsEngine<'_>, resource: R) -> Result<()>
    where
        R: Resource<ThoughtSpotClient> + DeserializeOwned + Clone,
    {
        let plan = engine.plan(&self.name, resource)?;
        plan::print_plan(&plan)?;

        if self.dry_run || !plan.has_changes() {
            return Ok(())
        }
        if !confirm("Do you want to apply?", self.yes)? {
            log::info!("Apply cancelled.");
            return Ok(())
        }

        engine.apply(plan).await?;
        log::info!("{}", style("Apply complete!").green().bold());
        Ok(())
    }
}

impl RefreshCmd {
    pub async fn run(&self, cli: &Cli) -> Result<()> {
        let state = cli.open_state()?;
        let kind = managed_kind(&state, &self.name)?
            .ok_or_else(|| anyhow!("`{}` is not managed by tsprov", self.name))?;
        let client = cli.connect().await?;
        let engine = Engine::new(&client, &state);

        let present = match kind.as_str() {
            TML => engine.refresh::<TmlResource>(&self.name).await?.is_some(),
            METADATA => engine.refresh::<MetadataResource>(&self.name).await?.is_some(),
            other => bail!("unknown resource kind `{}`", other),
        };

        if present {
            log::info!("Refreshed `{}`", self.name);
        } else {
            log::warn!("`{}` no longer exists in ThoughtSpot, it was removed from the state", self.name);
        }
        Ok(())
    }
}

impl DestroyCmd {
    pub async fn run(&self, cli: &Cli) -> Result<()> {
        let state = cli.open_state()?;
        let Some(kind) = managed_kind(&state, &self.name)? else {
            log::info!("`{}` is not managed by tsprov, nothing to destroy", self.name);
            return Ok(())
        };

        if !confirm(&format!("Do you want to destroy `{}`?", self.name), self.yes)? {
            log::info!("Destroy cancelled.");
            return Ok(())
        }

        let client = cli.connect().await?;
        let engine = Engine::new(&client, &state);
        match kind.as_str() {
            TML => engine.destroy::<TmlResource>(&self.name).await?,
            METADATA => engine.destroy::<MetadataResource>(&self.name).await?,
            other => bail!("unknown resource kind `{}`", other),
        };

        log::info!("{}", style("Destroy complete!").red().bold());
        Ok(())
    }
}

impl ShowCmd {
    pub fn run(&self, cli: &Cli) -> Result<()> {
        let state = cli.open_state()?;
        let output = match &self.name {
            Some(name) => show_resource(&state, name)?,
            None => list_resources(&state)?,
        };
        plan::write_to_stdout_ignore_sigpipe(output.as_bytes())?;
        Ok(())
    }
}

fn show_resource(state: &FileState, name: &str) -> Result<String> {
    let urn = state
        .resources()?
        .into_iter()
        .find(|urn| urn.name() == Some(name))
        .ok_or_else(|| anyhow!("`{}` is not managed by tsprov", name))?;
    let raw = state.get(&urn)?.unwrap_or_default();
    Ok(format!("{}\n", serde_json::to_string_pretty(&raw)?))
}

fn list_resources(state: &FileState) -> Result<String> {
    Ok(state.resources()?.iter().map(|urn: &Urn| format!("{}\n", urn.as_display())).collect())
}
