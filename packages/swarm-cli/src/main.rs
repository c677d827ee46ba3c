//! `swarm` - command-line driver for the outreach pipeline stages.
//!
//! Configuration comes from the environment (and `.env`), is read once
//! here, and is handed to components explicitly - nothing inside the
//! library reads ambient process state. A missing required credential
//! fails the invoked stage, never silently degrades it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use outreach::contact::ResolutionChain;
use outreach::traits::classifier::ReplyClassifier;
use outreach::traits::enricher::EmailEnricher;
use outreach::traits::searcher::SearchProvider;
use outreach::{
    Analyst, AnalystConfig, ClientKey, Closer, CloserConfig, CsvLedger, DuckDuckGoClient,
    GeminiClient, GuardPolicy, HttpFetcher, HttpMailRelay, HunterClient, KeywordClassifier,
    PainPointEngine, ProfileBook, Scout, ScoutConfig, SenderIdentity, SerpApiClient, Sniper,
    SniperConfig,
};

#[derive(Parser)]
#[command(name = "swarm", version, about = "Lead discovery, analysis, and outreach pipeline")]
struct Cli {
    /// Directory holding the per-client CSV ledgers.
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// JSON profile book (`client_key -> profile`); built-in default
    /// profile when omitted.
    #[arg(long, global = true)]
    profiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover fresh leads for a niche and location.
    Scout {
        #[arg(long)]
        niche: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        client_key: String,
        /// How many fresh leads to aim for.
        #[arg(long, default_value_t = 10)]
        target: usize,
    },
    /// Scrape and analyze unscanned leads, resolving contact emails.
    Analyst {
        #[arg(long)]
        client_key: String,
    },
    /// Send personalized outreach for analyzed audits.
    Sniper {
        #[arg(long)]
        client_key: String,
    },
    /// Check for replies and dispatch follow-ups.
    Closer {
        #[arg(long)]
        client_key: String,
    },
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_env(name: &'static str) -> Result<String> {
    env_var(name).with_context(|| format!("{name} is missing from the environment"))
}

fn sender_identity() -> SenderIdentity {
    SenderIdentity {
        name: env_var("SENDER_NAME").unwrap_or_else(|| SenderIdentity::default().name),
        phone: env_var("SENDER_PHONE"),
    }
}

fn throttle_bounds() -> (u64, u64) {
    let lo = env_var("THROTTLE_MIN_SECS").and_then(|v| v.parse().ok()).unwrap_or(30);
    let hi = env_var("THROTTLE_MAX_SECS").and_then(|v| v.parse().ok()).unwrap_or(60);
    (lo, hi.max(lo))
}

/// Search tiers in fallback order: paid primary, then the zero-cost tier.
fn search_tiers(primary_required: bool) -> Result<Vec<Arc<dyn SearchProvider>>> {
    let mut tiers: Vec<Arc<dyn SearchProvider>> = Vec::new();
    match env_var("SERP_API_KEY") {
        Some(key) => tiers.push(Arc::new(SerpApiClient::new(key))),
        None if primary_required => {
            require_env("SERP_API_KEY")?;
        }
        None => {}
    }
    tiers.push(Arc::new(DuckDuckGoClient::new()));
    Ok(tiers)
}

fn enricher() -> Option<Arc<dyn EmailEnricher>> {
    env_var("HUNTER_API_KEY").map(|key| Arc::new(HunterClient::new(key)) as Arc<dyn EmailEnricher>)
}

fn mail_relay() -> Result<Arc<HttpMailRelay>> {
    let base_url = require_env("MAIL_RELAY_URL")?;
    let api_key = require_env("MAIL_API_KEY")?;
    let from = require_env("MAIL_FROM")?;
    Ok(Arc::new(HttpMailRelay::new(base_url, api_key, from)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let ledger = Arc::new(CsvLedger::new(&cli.data_dir));
    let profiles = match &cli.profiles {
        Some(path) => ProfileBook::from_json_file(path)
            .with_context(|| format!("could not load profile book {}", path.display()))?,
        None => ProfileBook::builtin(),
    };

    match cli.command {
        Command::Scout {
            niche,
            location,
            client_key,
            target,
        } => {
            let scout = Scout::new(
                ledger,
                search_tiers(true)?,
                ScoutConfig::default().with_target(target),
            );
            let report = scout.run(&niche, &location, &ClientKey::new(client_key)).await?;
            info!(
                accepted = report.accepted,
                pages = report.pages_queried,
                tiers = ?report.tiers_attempted,
                "scout finished"
            );
            println!(
                "Scout: {} new leads ({} pages, {} domains already known)",
                report.accepted, report.pages_queried, report.known_domains
            );
        }

        Command::Analyst { client_key } => {
            let fetcher = Arc::new(HttpFetcher::new());
            let pain = match env_var("GEMINI_API_KEY") {
                Some(key) => PainPointEngine::with_model(Arc::new(GeminiClient::new(key))),
                None => PainPointEngine::heuristic_only(),
            };
            let contacts =
                ResolutionChain::standard(fetcher.clone(), search_tiers(false)?, enricher());
            let analyst = Analyst::new(
                ledger,
                fetcher,
                pain,
                contacts,
                profiles,
                AnalystConfig::default(),
            );
            let report = analyst.run(&ClientKey::new(client_key)).await?;
            println!(
                "Analyst: {} scanned - {} analyzed, {} require DM, {} use form, {} dead ends",
                report.scanned, report.analyzed, report.requires_dm, report.use_form,
                report.dead_ends
            );
        }

        Command::Sniper { client_key } => {
            let relay = mail_relay()?;
            let guard_policy = match env_var("SEND_COOLDOWN_DAYS").and_then(|v| v.parse().ok()) {
                Some(days) => GuardPolicy::Cooldown { days },
                None => GuardPolicy::Forever,
            };
            let config = SniperConfig {
                attachment_path: env_var("AUDIT_PDF_PATH").map(PathBuf::from),
                throttle_secs: throttle_bounds(),
                guard_policy,
                sender: sender_identity(),
            };
            let enrichment = enricher().map(ResolutionChain::enrichment_only);
            let sniper = Sniper::new(ledger, relay, enrichment, profiles, config);
            let report = sniper.run(&ClientKey::new(client_key)).await?;
            println!(
                "Sniper: {} sent ({} with audit attached), {} skipped, {} no email, {} failed",
                report.sent, report.attached, report.skipped, report.no_email, report.failed
            );
        }

        Command::Closer { client_key } => {
            let relay = mail_relay()?;
            let classifier: Arc<dyn ReplyClassifier> = match env_var("GEMINI_API_KEY") {
                Some(key) => Arc::new(GeminiClient::new(key)),
                None => Arc::new(KeywordClassifier),
            };
            let config = CloserConfig {
                throttle_secs: throttle_bounds(),
                sender: sender_identity(),
                ..Default::default()
            };
            let closer = Closer::new(ledger, relay.clone(), relay, classifier, config);
            let report = closer.run(&ClientKey::new(client_key)).await?;
            println!(
                "Closer: {} follow-ups, {} hot leads, {} replied, {} not interested, {} dead",
                report.followups, report.hot_leads, report.replies, report.not_interested,
                report.dead
            );
        }
    }

    Ok(())
}
