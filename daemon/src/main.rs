//! govgate — encode upgrade payloads, inspect registry metadata and rehearse
//! governance-gated upgrade plans.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use govgate_action::{encode, UpgradeIntent};
use govgate_nullables::NullLedger;
use govgate_registry::{
    CodeRegistry, FileMetadataSource, HttpMetadataSource, MetadataSnapshot, MetadataSource,
};
use govgate_session::{SessionConfig, UpgradeSession, UpgradeStep};
use govgate_types::{
    parse_address, Address, ContractCode, MemberRole, NetworkId, ProposalCategory,
};
use govgate_utils::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "govgate", about = "Governance-gated contract upgrade tooling")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true, env = "GOVGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Metadata network section: "mainnet", "kovan" or "localhost".
    #[arg(long, global = true, env = "GOVGATE_NETWORK")]
    network: Option<NetworkId>,

    /// URL of the registry metadata document.
    #[arg(long, global = true, env = "GOVGATE_METADATA_URL")]
    metadata_url: Option<String>,

    /// Read the registry metadata document from a file instead.
    #[arg(long, global = true, env = "GOVGATE_METADATA_FILE")]
    metadata_file: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "GOVGATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "GOVGATE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the action payload of an upgrade proposal.
    Encode {
        /// Proposal category, by name ("upgrade_proxy") or id (5).
        #[arg(long, value_parser = parse_category)]
        category: ProposalCategory,

        /// Contract code to upgrade; repeat for several.
        #[arg(long = "code", required = true)]
        codes: Vec<ContractCode>,

        /// New address for the code at the same position.
        #[arg(long = "address", required = true, value_parser = parse_address)]
        addresses: Vec<Address>,
    },
    /// Fetch the registry metadata and list its contract codes.
    Inspect,
    /// Run the configured upgrade plan against an in-memory ledger seeded
    /// from the registry metadata.
    Rehearse,
    /// Print the effective configuration as TOML.
    ShowConfig,
}

fn parse_category(raw: &str) -> Result<ProposalCategory, String> {
    if let Ok(id) = raw.parse::<u64>() {
        return ProposalCategory::from_id(id).ok_or_else(|| format!("unknown category id {id}"));
    }
    raw.parse().map_err(|e| format!("{e}"))
}

impl Cli {
    /// File settings overridden by flags and env vars.
    fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let base = match &self.config {
            Some(path) => SessionConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SessionConfig::default(),
        };
        Ok(SessionConfig {
            network: self.network.unwrap_or(base.network),
            metadata_url: self.metadata_url.clone().unwrap_or(base.metadata_url),
            metadata_file: self.metadata_file.clone().or(base.metadata_file),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            log_format: self.log_format.unwrap_or(base.log_format),
            ..base
        })
    }
}

fn metadata_source(config: &SessionConfig) -> Box<dyn MetadataSource> {
    match &config.metadata_file {
        Some(path) => Box::new(FileMetadataSource::new(path.clone())),
        None => Box::new(HttpMetadataSource::with_url(&config.metadata_url)),
    }
}

async fn load_snapshot(config: &SessionConfig) -> anyhow::Result<MetadataSnapshot> {
    let source = metadata_source(config);
    let document = source.fetch().await?;
    let snapshot = MetadataSnapshot::from_document(&document, config.network)?;
    tracing::info!(
        source = %source.describe(),
        network = %config.network,
        codes = snapshot.len(),
        "loaded registry metadata"
    );
    Ok(snapshot)
}

fn encode_command(
    category: ProposalCategory,
    codes: Vec<ContractCode>,
    addresses: Vec<Address>,
) -> anyhow::Result<()> {
    if !category.is_upgrade() {
        bail!("{category} does not carry an upgrade payload");
    }
    let intent = UpgradeIntent::new(codes, addresses)?;
    println!("{}", encode(&intent));
    Ok(())
}

async fn inspect_command(config: &SessionConfig) -> anyhow::Result<()> {
    let snapshot = load_snapshot(config).await?;
    for meta in snapshot.codes() {
        println!(
            "{}\t{}\t{}\t{}",
            meta.code,
            meta.published_address,
            if meta.is_proxy { "proxy" } else { "direct" },
            meta.name.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

async fn rehearse_command(config: &SessionConfig) -> anyhow::Result<()> {
    if config.steps.is_empty() {
        bail!("no upgrade steps configured");
    }

    let snapshot = load_snapshot(config).await?;
    let ledger = NullLedger::from_snapshot(&snapshot);

    let rehearsal = &config.rehearsal;
    let board = if rehearsal.board.is_empty() {
        (0..rehearsal.board_size).map(|_| ledger.deploy()).collect()
    } else {
        rehearsal.board.clone()
    };
    let ledger = Arc::new(
        ledger
            .with_members(MemberRole::AdvisoryBoard, board)
            .with_quorum(ProposalCategory::UpgradeProxy, rehearsal.quorum)
            .with_quorum(ProposalCategory::UpgradeNonProxy, rehearsal.quorum)
            .requiring_unlocked_accounts(),
    );

    // Steps without targets upgrade to freshly deployed contracts.
    let steps: Vec<UpgradeStep> = config
        .steps
        .iter()
        .map(|step| {
            let mut step = step.clone();
            if step.new_addresses.is_empty() {
                step.new_addresses = step.codes.iter().map(|_| ledger.deploy()).collect();
            }
            step
        })
        .collect();

    let registry = CodeRegistry::new(snapshot, Arc::clone(&ledger));
    let session = UpgradeSession::new(registry, config.voters)
        .with_extra_accounts(config.extra_accounts.clone());

    let outcomes = session.run_plan(&steps).await?;
    for outcome in &outcomes {
        for check in &outcome.report.checks {
            println!(
                "{}\t{}\t{}\t{}",
                outcome.proposal.id, outcome.step.category, check.code, check.actual
            );
        }
    }
    tracing::info!(steps = outcomes.len(), "rehearsal passed");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.session_config()?;
    init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Encode {
            category,
            codes,
            addresses,
        } => encode_command(category, codes, addresses)?,
        Command::Inspect => inspect_command(&config).await?,
        Command::Rehearse => rehearse_command(&config).await?,
        Command::ShowConfig => print!("{}", config.to_toml_string()?),
    }

    Ok(())
}
