use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HalftoneError;

/// Mode de tramage appliqué aux échantillons de luminance, avant le calcul
/// des rayons.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMode {
    /// Aucun tramage, échantillons inchangés.
    #[default]
    None,
    /// Diffusion d'erreur de Floyd-Steinberg sur la grille de cellules.
    FloydSteinberg,
    /// Matrice de Bayer 4×4 tuilée sur les coordonnées de cellule.
    Ordered,
    /// Décalage pseudo-aléatoire déterministe par cellule.
    Noise,
}

impl FromStr for DitherMode {
    type Err = HalftoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "floyd-steinberg" => Ok(Self::FloydSteinberg),
            "ordered" => Ok(Self::Ordered),
            "noise" => Ok(Self::Noise),
            other => Err(HalftoneError::invalid(
                "dithering",
                other,
                "modes : none, floyd-steinberg, ordered, noise",
            )),
        }
    }
}

/// Fond sur lequel les disques sont posés.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Background {
    /// Alpha zéro partout hors des disques.
    #[default]
    Transparent,
    /// Blanc opaque, rendu papier.
    White,
}

impl FromStr for Background {
    type Err = HalftoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transparent" => Ok(Self::Transparent),
            "white" => Ok(Self::White),
            other => Err(HalftoneError::invalid(
                "background",
                other,
                "valeurs : transparent, white",
            )),
        }
    }
}

/// Couleur d'encre depuis une chaîne hex `#RRGGBB` (le `#` est optionnel).
///
/// # Errors
///
/// `InvalidParameter` si la chaîne n'est pas six chiffres hexadécimaux.
///
/// # Example
/// ```
/// use ds_core::params::ink_from_hex;
/// assert_eq!(ink_from_hex("#1A2B3C").unwrap(), (0x1A, 0x2B, 0x3C));
/// assert!(ink_from_hex("rouge").is_err());
/// ```
pub fn ink_from_hex(hex: &str) -> Result<(u8, u8, u8), HalftoneError> {
    let raw = hex.trim_start_matches('#');
    if raw.len() != 6 || !raw.is_ascii() {
        return Err(HalftoneError::invalid("ink", hex, "format attendu #RRGGBB"));
    }
    let parse = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&raw[range], 16)
            .map_err(|_| HalftoneError::invalid("ink", hex, "format attendu #RRGGBB"))
    };
    Ok((parse(0..2)?, parse(2..4)?, parse(4..6)?))
}

/// Jeu complet de paramètres d'une passe de trame.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ds_core::params::HalftoneParams;
/// let params = HalftoneParams::default();
/// assert_eq!(params.grid_size, 50);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HalftoneParams {
    // === Géométrie ===
    /// Côté des cellules carrées, en pixels. Doit être ≥ 1.
    pub grid_size: u32,

    // === Tonalité ===
    /// Luminosité [0, 100]. 50 = neutre.
    pub brightness: f32,
    /// Contraste [-100, 100]. 0 = neutre.
    pub contrast: f32,
    /// Gamma [0.1, 5.0]. 1.0 = neutre. Doit être strictement positif.
    pub gamma: f32,

    // === Trame ===
    /// Mode de tramage des échantillons.
    pub dithering: DitherMode,
    /// Graine du mode `noise`. Même graine, même sortie.
    pub noise_seed: u64,

    // === Rendu ===
    /// Couleur d'encre des disques (RGB).
    pub ink: (u8, u8, u8),
    /// Fond derrière les disques.
    pub background: Background,
    /// Lisser le bord des disques (rampe d'un demi-pixel).
    pub antialias: bool,
}

impl Default for HalftoneParams {
    fn default() -> Self {
        Self {
            grid_size: 50,
            brightness: 50.0,
            contrast: 0.0,
            gamma: 1.0,
            dithering: DitherMode::None,
            noise_seed: 0,
            ink: (0, 0, 0),
            background: Background::Transparent,
            antialias: true,
        }
    }
}

impl HalftoneParams {
    /// Facteur multiplicatif du contraste : `1 + contrast / 100`.
    #[inline(always)]
    #[must_use]
    pub fn contrast_factor(&self) -> f32 {
        1.0 + self.contrast / 100.0
    }

    /// Offset additif de luminosité : `(brightness - 50) × 2.55`.
    #[inline(always)]
    #[must_use]
    pub fn brightness_offset(&self) -> f32 {
        (self.brightness - 50.0) * 2.55
    }

    /// Rejette les valeurs structurellement invalides.
    ///
    /// Les dépassements de plage doux (luminosité, contraste) ne sont pas
    /// des erreurs ; voir [`clamp_all`](Self::clamp_all).
    ///
    /// # Errors
    ///
    /// `InvalidParameter` si `grid_size == 0`, ou si `gamma` est ≤ 0 ou
    /// non fini.
    pub fn validate(&self) -> Result<(), HalftoneError> {
        if self.grid_size == 0 {
            return Err(HalftoneError::invalid("grid_size", 0, "doit être ≥ 1"));
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(HalftoneError::invalid(
                "gamma",
                self.gamma,
                "doit être strictement positif et fini",
            ));
        }
        Ok(())
    }

    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.brightness = self.brightness.clamp(0.0, 100.0);
        self.contrast = self.contrast.clamp(-100.0, 100.0);
        self.gamma = self.gamma.clamp(0.1, 5.0);
    }
}
