use crate::cli_args::ConfigArgs;
use crate::load_settings;
use anyhow::{Context, Result};
use colored::*;
use dialoguer::Confirm;
use fcollect_core::Settings;
use fcollect_core::config::{DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME};
use std::fs;

pub fn handle_config_command(args: ConfigArgs, quiet: bool) -> Result<()> {
    let roots = Settings::determine_workspace_roots(&args.workspace.roots)
        .context("Failed to determine workspace roots")?;
    let first_root = roots
        .first()
        .context("No workspace root available")?;

    if !args.save {
        let settings = load_settings(first_root, &args.workspace)?;
        let content = settings
            .to_toml()
            .context("Failed to serialize settings to TOML")?;
        println!("{}", content);
        return Ok(());
    }

    let config_dir = first_root.join(DEFAULT_CONFIG_DIR);
    let save_path = config_dir.join(DEFAULT_CONFIG_FILENAME);

    if save_path.exists() {
        if quiet {
            anyhow::bail!(
                "Target file '{}' exists. Overwrite prevented in quiet mode.",
                save_path.display()
            );
        }
        let overwrite = Confirm::new()
            .with_prompt(format!(
                "Settings file already exists at '{}'. Overwrite?",
                save_path.display()
            ))
            .default(false)
            .interact()
            .context("Failed to read user input")?;
        if !overwrite {
            println!("Save cancelled.");
            return Ok(());
        }
    }

    let content = Settings::default()
        .to_toml()
        .context("Failed to serialize default settings")?;
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;
    fs::write(&save_path, content)
        .with_context(|| format!("Failed to write file {}", save_path.display()))?;

    if !quiet {
        println!(
            "{} Default settings saved to: {}",
            "✅".green(),
            save_path.display().to_string().blue()
        );
    }
    Ok(())
}
