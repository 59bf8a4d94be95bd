//! `netcad origin`: sync device types from NetBox and inspect the cache.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use netcad_core::{config, FromPayload, NetcadConfig, OriginRecord, RegistryContext};
use netcad_origin::netbox::sync_device_types;
use netcad_origin::{NetboxOriginDeviceType, SyncOutcome, SyncReport};

#[derive(Subcommand, Debug)]
pub enum OriginCommand {
    /// Fetch device types from NetBox into the cache.
    Sync(SyncArgs),

    /// List cached device types.
    List(ListArgs),

    /// Show the interfaces of a cached device type.
    Show(ShowArgs),
}

pub fn run(command: OriginCommand) -> Result<()> {
    match command {
        OriginCommand::Sync(args) => args.run(),
        OriginCommand::List(args) => args.run(),
        OriginCommand::Show(args) => args.run(),
    }
}

fn load_config() -> Result<NetcadConfig> {
    let config = config::load().context("failed to load netcad configuration")?;
    tracing::debug!(cache_dir = %config.cache_dir.display(), "configuration loaded");
    Ok(config)
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

/// Arguments for `netcad origin sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Device-type model names as known to NetBox.
    #[arg(required = true)]
    pub models: Vec<String>,

    /// Exit non-zero unless every model was saved.
    #[arg(long)]
    pub strict: bool,

    /// Emit the sync report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config()?;
        let settings = config
            .netbox()
            .context("NetBox origin is not configured")?;
        let cache = config.cache_store();
        let ctx = Arc::new(RegistryContext::new());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let report = runtime
            .block_on(sync_device_types(&settings, ctx, cache, self.models))
            .context("origin sync failed")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize sync report")?
            );
        } else {
            print_report(&report);
        }

        if self.strict && !report.all_saved() {
            let missed = report.outcomes.len() - report.saved().len();
            bail!("{missed} of {} models were not saved", report.outcomes.len());
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "model")]
    model: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn print_report(report: &SyncReport) {
    let rows: Vec<OutcomeRow> = report
        .outcomes
        .iter()
        .map(|(model, outcome)| OutcomeRow {
            model: model.clone(),
            status: outcome_label(outcome),
            detail: match outcome {
                SyncOutcome::Saved { path, .. } => path.display().to_string(),
                SyncOutcome::NotFound => format!("not found in {}", report.origin.source),
                SyncOutcome::Error { detail } => detail.clone(),
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{} saved, {} not found, {} failed in {} ms",
        report.saved().len(),
        report.not_found().len(),
        report.failed().len(),
        report.duration_ms,
    );
}

fn outcome_label(outcome: &SyncOutcome) -> String {
    let label = outcome.label().to_uppercase();
    match outcome {
        SyncOutcome::Saved { changed: true, .. } => label.green().bold().to_string(),
        SyncOutcome::Saved { changed: false, .. } => label.bright_black().to_string(),
        SyncOutcome::NotFound => label.yellow().bold().to_string(),
        SyncOutcome::Error { .. } => label.red().bold().to_string(),
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

/// Arguments for `netcad origin list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit the model names as a JSON array.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config()?;
        let cache = config.cache_store();
        let keys = cache
            .list_keys(&NetboxOriginDeviceType::kind())
            .context("failed to read origin cache")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&keys)?);
            return Ok(());
        }
        if keys.is_empty() {
            println!("No cached device types. Run `netcad origin sync <model>` first.");
            return Ok(());
        }
        for key in keys {
            println!("{key}");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

/// Arguments for `netcad origin show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Device-type model name.
    pub model: String,

    /// Print the cached NetBox payload as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "interface")]
    name: String,
    #[tabled(rename = "type")]
    if_type: String,
    #[tabled(rename = "label")]
    label: String,
}

impl ShowArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config()?;
        let cache = config.cache_store();
        let Some(record) = NetboxOriginDeviceType::load(&cache, &self.model)
            .with_context(|| format!("failed to load cached device type '{}'", self.model))?
        else {
            bail!(
                "device type '{}' is not cached; run `netcad origin sync {}`",
                self.model,
                self.model
            );
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(record.raw_payload())?);
            return Ok(());
        }

        println!(
            "{} ({})",
            record.model().bold(),
            record.manufacturer().unwrap_or("unknown manufacturer")
        );
        let rows = record
            .subcomponent_names()
            .into_iter()
            .map(|name| {
                let spec = record.get_interface(name)?;
                Ok(InterfaceRow {
                    name: spec.if_name,
                    if_type: spec.if_type,
                    label: spec.if_type_label,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if rows.is_empty() {
            println!("No interfaces.");
        } else {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }

        let consoles = record.console_port_names();
        if !consoles.is_empty() {
            println!("Console: {}", consoles.join(", "));
        }
        Ok(())
    }
}
