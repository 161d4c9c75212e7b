use std::path::PathBuf;

use clap::Parser;
use ds_core::params::{ink_from_hex, Background, DitherMode, HalftoneParams};

/// dotscreen — Halftone dot-screen engine.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Dossier d'images à traiter par lots (récursif).
    #[arg(long)]
    pub batch: Option<PathBuf>,

    /// Fichier PNG de sortie. Défaut : <source>_halftone.png.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Dossier de sortie pour --batch. Défaut : à côté de chaque source.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Côté des cellules de trame, en pixels.
    #[arg(long)]
    pub grid_size: Option<u32>,

    /// Luminosité [0, 100]. 50 = neutre.
    #[arg(long)]
    pub brightness: Option<f32>,

    /// Contraste [-100, 100]. 0 = neutre.
    #[arg(long)]
    pub contrast: Option<f32>,

    /// Gamma [0.1, 5.0]. 1.0 = neutre.
    #[arg(long)]
    pub gamma: Option<f32>,

    /// Tramage : none, floyd-steinberg, ordered, noise.
    #[arg(long)]
    pub dithering: Option<DitherMode>,

    /// Graine du tramage noise.
    #[arg(long)]
    pub noise_seed: Option<u64>,

    /// Couleur d'encre au format hex #RRGGBB.
    #[arg(long)]
    pub ink: Option<String>,

    /// Fond : transparent ou white.
    #[arg(long)]
    pub background: Option<Background>,

    /// Désactiver l'anticrénelage du bord des disques.
    #[arg(long, default_value_t = false)]
    pub no_antialias: bool,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Charger un preset nommé (ignore --config).
    #[arg(long)]
    pub preset: Option<String>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Validate that exactly one source is provided.
    ///
    /// # Errors
    /// Returns an error if zero or both sources are specified.
    pub fn validate_source(&self) -> anyhow::Result<()> {
        match (self.input.is_some(), self.batch.is_some()) {
            (false, false) => {
                anyhow::bail!("Aucune source spécifiée. Utilisez --input ou --batch.")
            }
            (true, true) => {
                anyhow::bail!("Une seule source à la fois. Spécifiez --input OU --batch.")
            }
            _ => Ok(()),
        }
    }

    /// Applique les overrides CLI par-dessus les paramètres chargés.
    ///
    /// # Errors
    /// Returns an error if `--ink` is not a valid hex color.
    pub fn apply_overrides(&self, params: &mut HalftoneParams) -> anyhow::Result<()> {
        if let Some(v) = self.grid_size {
            params.grid_size = v;
        }
        if let Some(v) = self.brightness {
            params.brightness = v;
        }
        if let Some(v) = self.contrast {
            params.contrast = v;
        }
        if let Some(v) = self.gamma {
            params.gamma = v;
        }
        if let Some(v) = self.dithering {
            params.dithering = v;
        }
        if let Some(v) = self.noise_seed {
            params.noise_seed = v;
        }
        if let Some(ref v) = self.ink {
            params.ink = ink_from_hex(v)?;
        }
        if let Some(v) = self.background {
            params.background = v;
        }
        if self.no_antialias {
            params.antialias = false;
        }
        Ok(())
    }
}
