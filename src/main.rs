use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::info;

use titlemap::{
    cli::{self, Command},
    config::{self, Config},
    consensus::ConsensusResolver,
    history::{locate::StoreLocator, sqlite_db::HistoryReader},
    logging,
    mapping::MappingBuilder,
    search::{HttpSettings, bing::BingProbe, duckduckgo::DuckDuckGoProbe},
    title::TitleCleaner,
};

fn main() -> Result<()> {
    let cli_opts = cli::parse();
    logging::init_logging(cli_opts.log_json);

    let loaded = config::load_config(cli_opts.config_path.as_deref())?;
    info!("config_hash={}", loaded.config_hash);
    let cfg = loaded.config;
    let cleaner = TitleCleaner::from_config(&cfg)?;

    match cli_opts.command {
        Command::Build { snapshot, home } => {
            let locator = locator_for(&cfg, home);
            let reader = HistoryReader::new(cfg.history.max_records);
            let snapshot_path = snapshot.unwrap_or_else(|| cfg.snapshot_path());
            MappingBuilder::new(&reader, &cleaner).run(&locator, &snapshot_path)?;
        }
        Command::Resolve { title } => {
            let Some(query) = cleaner.clean_opt(title.as_deref()) else {
                bail!("no title to resolve");
            };
            let domain = build_resolver(&cfg)
                .resolve(&query)
                .with_context(|| format!("resolving {query:?}"))?;
            println!("{domain}");
        }
        Command::Locate { home } => {
            let stores: Vec<_> = locator_for(&cfg, home).locate().into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&stores)?);
        }
        Command::Clean { title } => {
            let Some(cleaned) = cleaner.clean_opt(title.as_deref()) else {
                bail!("title is empty after cleaning");
            };
            println!("{cleaned}");
        }
    }

    Ok(())
}

fn locator_for(cfg: &Config, home: Option<PathBuf>) -> StoreLocator {
    match home {
        Some(home) => StoreLocator::new(&cfg.history, &home),
        None => StoreLocator::for_current_user(&cfg.history),
    }
}

fn build_resolver(cfg: &Config) -> ConsensusResolver {
    let http = HttpSettings::from_config(&cfg.search);
    let ddg = DuckDuckGoProbe::new(cfg.search.duckduckgo_endpoint.clone(), http.clone());
    let bing = BingProbe::new(
        cfg.search.bing_endpoint.clone(),
        &cfg.search.bing_excluded_domains,
        http,
    );
    ConsensusResolver::new(Arc::new(ddg), Arc::new(bing), cfg.search.deadline())
}
