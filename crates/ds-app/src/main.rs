use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ds_core::params::HalftoneParams;

pub mod cli;
pub mod run;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider la source
    cli.validate_source()?;

    // 4. Charger les paramètres
    let mut params = resolve_params(&cli)?;

    // 4b. Appliquer les overrides CLI
    cli.apply_overrides(&mut params)?;
    params.validate()?;
    params.clamp_all();

    // 5. Exécuter
    if let Some(ref folder) = cli.batch {
        log::info!("Lancement du traitement par lots...");
        return run::run_batch(folder, cli.out_dir.as_deref(), &params);
    }
    if let Some(ref input) = cli.input {
        return run::run_single(input, cli.output.as_deref(), &params);
    }
    anyhow::bail!("Aucune source spécifiée. Utilisez --input ou --batch.")
}

/// Resolve params: preset takes priority over --config.
fn resolve_params(cli: &cli::Cli) -> Result<HalftoneParams> {
    if let Some(ref name) = cli.preset {
        let path = PathBuf::from(format!("config/presets/{name}.toml"));
        if path.exists() {
            ds_core::config::load_params(&path)
        } else {
            anyhow::bail!("Preset inconnu : {name}. Voir config/presets/ (ex: newsprint, poster)");
        }
    } else if cli.config.exists() {
        ds_core::config::load_params(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(HalftoneParams::default())
    }
}
