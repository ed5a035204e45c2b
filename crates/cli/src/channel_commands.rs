use std::path::PathBuf;

use {
    anyhow::{Context, Result},
    clap::Subcommand,
    pager_channels::{
        ChannelRegistry, JsonChannelStore, MemoryHost, RawResourceResolver, StartupReport,
        configure_channels, resolve_table,
    },
    pager_config::PagerConfig,
    tracing::debug,
};

#[derive(Subcommand)]
pub enum ChannelAction {
    /// Print the validated channel table.
    List,
    /// Declare the channel table on the host, as done at app startup.
    Reconcile {
        /// Use an in-memory host instead of the channel store.
        #[arg(long)]
        dry_run: bool,
        /// Behave as a host without per-channel configuration.
        #[arg(long)]
        no_channel_support: bool,
    },
    /// List channels registered in the channel store.
    Status,
}

pub fn handle_channels(action: ChannelAction) -> Result<()> {
    let config = pager_config::discover_and_load()?;
    match action {
        ChannelAction::List => list(&config),
        ChannelAction::Reconcile {
            dry_run,
            no_channel_support,
        } => {
            let report = reconcile(&config, dry_run, no_channel_support)?;
            print_report(&report);
            Ok(())
        },
        ChannelAction::Status => status(&config),
    }
}

fn list(config: &PagerConfig) -> Result<()> {
    let table = resolve_table(config).context("invalid channel table")?;
    println!(
        "{:<24} {:<8} {:<6} {:<16} {:<8} NAME",
        "ID", "URGENCY", "BADGE", "SOUND", "LIGHT"
    );
    for p in &table {
        println!(
            "{:<24} {:<8} {:<6} {:<16} {:<8} {}",
            p.id(),
            p.urgency(),
            p.show_badge(),
            p.sound().map_or("-", |s| s.asset.as_str()),
            p.light_color().map_or_else(|| "-".to_string(), |c| c.to_string()),
            p.display_name(),
        );
    }
    Ok(())
}

/// Run startup channel configuration against the configured host.
fn reconcile(config: &PagerConfig, dry_run: bool, no_channel_support: bool) -> Result<StartupReport> {
    let table = resolve_table(config).context("invalid channel table")?;
    let supported = config.host.supports_channels && !no_channel_support;

    let report = if dry_run {
        let mut registry =
            ChannelRegistry::new(MemoryHost::new().with_channel_support(supported));
        configure_channels(&mut registry, &table)?
    } else {
        let store = channel_store(config).with_channel_support(supported);
        debug!(path = %store.path().display(), "using channel store");
        let mut registry = ChannelRegistry::new(store);
        configure_channels(&mut registry, &table)?
    };
    Ok(report)
}

fn print_report(report: &StartupReport) {
    match report {
        StartupReport::Configured(n) => println!("Configured {n} channel(s)."),
        StartupReport::Unsupported => {
            println!("Host has no channel support; platform defaults apply.")
        },
        StartupReport::Degraded {
            registered,
            failed_ids,
        } => println!(
            "Configured {registered} channel(s); failed: {}",
            failed_ids.join(", ")
        ),
    }
}

fn status(config: &PagerConfig) -> Result<()> {
    let store = channel_store(config);
    let channels = store.list()?;
    if channels.is_empty() {
        println!("No channels registered in {}.", store.path().display());
        return Ok(());
    }
    println!("{:<24} {:<10} {:<6} SOUND", "ID", "IMPORTANCE", "LEVEL");
    for c in &channels {
        println!(
            "{:<24} {:<10} {:<6} {}",
            c.definition.id,
            c.definition.importance.as_str(),
            c.definition.importance.level(),
            c.sound_uri.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn store_path(config: &PagerConfig) -> PathBuf {
    config
        .host
        .store_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| pager_config::data_dir().join("channels.json"))
}

fn channel_store(config: &PagerConfig) -> JsonChannelStore<RawResourceResolver> {
    let mut resolver = RawResourceResolver::new(&config.host.package);
    if let Some(assets) = &config.host.known_assets {
        resolver = resolver.with_known_assets(assets.iter().cloned());
    }
    JsonChannelStore::new(store_path(config), resolver)
}

#[cfg(test)]
mod tests {
    use {super::*, pager_channels::RegisteredCount, pager_config::ChannelEntry};

    fn config_in(dir: &tempfile::TempDir) -> PagerConfig {
        let mut config = PagerConfig::default();
        config.host.store_path = Some(dir.path().join("channels.json").display().to_string());
        config
    }

    #[test]
    fn reconcile_writes_store_and_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let first = reconcile(&config, false, false).unwrap();
        let second = reconcile(&config, false, false).unwrap();
        assert_eq!(first, StartupReport::Configured(RegisteredCount(2)));
        assert_eq!(first, second);
        assert_eq!(channel_store(&config).list().unwrap().len(), 2);
    }

    #[test]
    fn no_channel_support_flag_skips_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let report = reconcile(&config, false, true).unwrap();
        assert_eq!(report, StartupReport::Unsupported);
        assert!(!dir.path().join("channels.json").exists());
    }

    #[test]
    fn unknown_asset_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        config.host.known_assets = Some(vec!["other_tone".into()]);
        let report = reconcile(&config, false, false).unwrap();
        assert_eq!(report, StartupReport::Degraded {
            registered: RegisteredCount(1),
            failed_ids: vec!["pager_call_channel".into()],
        });
    }

    #[test]
    fn duplicate_config_ids_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        let entry = ChannelEntry {
            id: "dup".into(),
            ..Default::default()
        };
        config.channels = vec![entry.clone(), entry];
        assert!(reconcile(&config, true, false).is_err());
    }

    #[test]
    fn store_path_defaults_to_data_dir() {
        assert!(store_path(&PagerConfig::default()).ends_with("channels.json"));
    }
}
