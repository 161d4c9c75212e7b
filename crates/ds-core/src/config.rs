use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::params::{ink_from_hex, Background, DitherMode, HalftoneParams};

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    halftone: HalftoneSection,
}

/// Halftone section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct HalftoneSection {
    grid_size: Option<u32>,
    brightness: Option<f32>,
    contrast: Option<f32>,
    gamma: Option<f32>,
    dithering: Option<DitherMode>,
    noise_seed: Option<u64>,
    ink: Option<String>,
    background: Option<Background>,
    antialias: Option<bool>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// Les champs absents gardent leur défaut ; les plages douces sont clampées
/// après fusion, les violations structurelles (grid_size 0, gamma ≤ 0) sont
/// des erreurs.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or holds a
/// structurally invalid parameter.
///
/// # Example
/// ```no_run
/// use ds_core::config::load_params;
/// use std::path::Path;
/// let params = load_params(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_params(path: &Path) -> Result<HalftoneParams> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let mut params = HalftoneParams::default();

    let h = file.halftone;
    if let Some(v) = h.grid_size {
        params.grid_size = v;
    }
    if let Some(v) = h.brightness {
        params.brightness = v;
    }
    if let Some(v) = h.contrast {
        params.contrast = v;
    }
    if let Some(v) = h.gamma {
        params.gamma = v;
    }
    if let Some(v) = h.dithering {
        params.dithering = v;
    }
    if let Some(v) = h.noise_seed {
        params.noise_seed = v;
    }
    if let Some(v) = h.ink {
        params.ink = ink_from_hex(&v)?;
    }
    if let Some(v) = h.background {
        params.background = v;
    }
    if let Some(v) = h.antialias {
        params.antialias = v;
    }

    params.validate()?;
    params.clamp_all();
    log::debug!("Paramètres chargés depuis {}", path.display());
    Ok(params)
}
