use {anyhow::Result, clap::Subcommand};

use {pager_channels::defaults, pager_config::PagerConfig};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective config as TOML.
    Show,
    /// Write a config file with the built-in channel table, unless one exists.
    Init,
    /// Print the path of the active (or default) config file.
    Path,
}

pub fn handle_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show(),
        ConfigAction::Init => init(),
        ConfigAction::Path => {
            println!("{}", pager_config::find_or_default_config_path().display());
            Ok(())
        },
    }
}

fn show() -> Result<()> {
    let config = pager_config::discover_and_load()?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn init() -> Result<()> {
    match pager_config::write_config_if_absent(&starter_config()?)? {
        Some(path) => println!("Wrote {}", path.display()),
        None => println!(
            "Config already exists at {}",
            pager_config::find_or_default_config_path().display()
        ),
    }
    Ok(())
}

/// Default config with the built-in channel table written out so it can be
/// edited.
fn starter_config() -> Result<PagerConfig> {
    let channels = defaults::pager_channels()?.iter().map(|p| p.to_entry()).collect();
    Ok(PagerConfig {
        channels,
        ..Default::default()
    })
}
