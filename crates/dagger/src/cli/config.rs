//! The `dagger config` command for configuration management.

use clap::{Args, Subcommand};
use dagger_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Show config file path
    Path,

    /// Write a config file with the default settings
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command against the configuration resolved at startup.
pub async fn execute(args: ConfigArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            print!("{}", render(&config)?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let defaults = Config::default();
            std::fs::write(&path, defaults.to_toml()?)?;

            println!("Configuration initialized at: {}", path.display());
            println!(
                "Model files will be stored in: {}",
                defaults.model_dir().display()
            );
            println!("Run `dagger models download` to fetch the default tagger.");
        }
    }

    Ok(())
}

/// Render the config as TOML, annotated with the resolved model directory
/// since `general.model_dir` may contain an unexpanded `~`.
fn render(config: &Config) -> anyhow::Result<String> {
    let mut out = config.to_toml()?;
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!(
        "# resolved model directory: {}\n",
        config.model_dir().display()
    ));
    Ok(out)
}
