use super::app::CommandContext;
use super::counter_cmd::format_minutes;
use super::*;

pub(super) fn handle_config(args: ConfigArgs, ctx: CommandContext) -> anyhow::Result<()> {
    let CommandContext {
        config_path,
        mut config,
        counter,
        retained_dir,
    } = ctx;
    match args.command {
        ConfigCommands::Init(args) => {
            if config_path.exists() && !args.force {
                anyhow::bail!(
                    "config already exists at {}; pass --force to overwrite",
                    config_path.display()
                );
            }
            let config = BackoffConfig {
                retained_dir,
                ..BackoffConfig::default()
            };
            config.save(&config_path)?;
            info!(path = %config_path.display(), "Config initialized");
            println!("Config written to {}", config_path.display());
        }
        ConfigCommands::Show => {
            let data = serde_json::to_string_pretty(&config).context("serialize config")?;
            println!("{data}");
        }
        ConfigCommands::SetTable(args) => {
            let label = format_minutes(&args.minutes);
            config.set_table(counter.as_deref(), args.minutes)?;
            config.save(&config_path)?;
            info!(counter = ?counter, table = %label, "Backoff table updated");
            println!("Backoff table set to {label} minutes");
        }
        ConfigCommands::ResetTable => {
            if config.reset_table(counter.as_deref()) {
                config.save(&config_path)?;
                println!("Backoff table reset to default");
            } else {
                warn!(counter = ?counter, "no custom backoff table configured");
                println!("No custom backoff table configured");
            }
        }
    }
    Ok(())
}
