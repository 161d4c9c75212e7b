//! Tramage des échantillons de luminance, par cellule.
//! Trois stratégies : matrice de Bayer tuilée, bruit déterministe par graine,
//! et diffusion d'erreur de Floyd-Steinberg pondérée par le ton affichable.

use ds_core::grid::Cell;

use crate::renderer::radius_for;

/// Matrice de Bayer 4x4. Normalisée sur 16 niveaux (0-15).
pub const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Amplitude du tramage ordonné, en unités de luminance.
pub const ORDERED_STRENGTH: f32 = 32.0;

/// Amplitude maximale du décalage du mode noise, en unités de luminance.
pub const NOISE_AMPLITUDE: f32 = 16.0;

/// Poids de diffusion : droite, bas-gauche, bas, bas-droite.
const FS_WEIGHTS: [f32; 4] = [7.0 / 16.0, 3.0 / 16.0, 5.0 / 16.0, 1.0 / 16.0];

// Si la luminance est extrêmement proche des bornes, on évite le dither :
// les aplats purs restent purs.
#[inline(always)]
fn near_extreme(lum: f32) -> bool {
    !(2.0..=253.0).contains(&lum)
}

/// Applique le tramage ordonné (Bayer 4x4) à un échantillon de cellule.
///
/// Le seuil est centré : la somme des décalages sur une tuile 4×4 est nulle,
/// le ton moyen d'un aplat est préservé.
///
/// # Example
/// ```
/// use ds_engine::dither::apply_ordered;
/// assert_eq!(apply_ordered(255.0, 0, 0), 255.0);
/// assert_ne!(apply_ordered(128.0, 0, 0), apply_ordered(128.0, 1, 0));
/// ```
#[must_use]
#[inline(always)]
pub fn apply_ordered(lum: f32, col: u32, row: u32) -> f32 {
    if near_extreme(lum) {
        return lum;
    }
    let bayer_val = f32::from(BAYER_4X4[(row % 4) as usize][(col % 4) as usize]);
    // La matrice va de 0 à 15 ; +0.5 centre chaque palier sur sa case.
    let threshold = (bayer_val + 0.5) / 16.0 - 0.5;
    (lum + threshold * ORDERED_STRENGTH).clamp(0.0, 255.0)
}

/// Décale un échantillon d'une quantité pseudo-aléatoire bornée.
///
/// Le générateur est un petit LCG ensemencé par (col, row, graine) : même
/// graine, même décalage, sans dépendance à l'ordre de parcours.
#[must_use]
#[inline(always)]
pub fn apply_noise(lum: f32, col: u32, row: u32, seed: u64) -> f32 {
    if near_extreme(lum) {
        return lum;
    }
    let h = cell_hash(col, row, seed);
    // 24 bits hauts → [0, 1), recentrés sur [-1, 1).
    let unit = (h >> 8) as f32 / 16_777_216.0;
    (lum + (unit * 2.0 - 1.0) * NOISE_AMPLITUDE).clamp(0.0, 255.0)
}

#[inline(always)]
fn cell_hash(col: u32, row: u32, seed: u64) -> u32 {
    let mut s = (seed ^ (seed >> 32)) as u32;
    s = s
        .wrapping_add(row.wrapping_mul(1337))
        .wrapping_add(col.wrapping_mul(7919));
    s = s.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    s.wrapping_mul(1_664_525).wrapping_add(1_013_904_223)
}

/// Diffusion d'erreur de Floyd-Steinberg sur la grille de cellules.
///
/// Parcours row-major strict. Le ton affiché d'une cellule est celui que
/// son disque rendra réellement (couverture d'encre sur la surface de la
/// cellule) ; le résidu est réparti sur les voisines non encore visitées :
/// droite 7/16, bas-gauche 3/16, bas 5/16, bas-droite 1/16. Les échantillons
/// sont clampés à [0, 255] au moment de leur visite.
pub fn diffuse_floyd_steinberg(samples: &mut [f32], cells: &[Cell], cols: usize, grid_size: u32) {
    debug_assert_eq!(samples.len(), cells.len());
    if cols == 0 {
        return;
    }
    for idx in 0..samples.len() {
        let lum = samples[idx].clamp(0.0, 255.0);
        samples[idx] = lum;
        let err = lum - displayed_tone(lum, &cells[idx], grid_size);
        if err.abs() <= f32::EPSILON {
            continue;
        }
        let col = idx % cols;
        let has_right = col + 1 < cols;
        let has_below = idx + cols < samples.len();
        if has_right {
            samples[idx + 1] += err * FS_WEIGHTS[0];
        }
        if has_below {
            if col > 0 {
                samples[idx + cols - 1] += err * FS_WEIGHTS[1];
            }
            samples[idx + cols] += err * FS_WEIGHTS[2];
            if has_right {
                samples[idx + cols + 1] += err * FS_WEIGHTS[3];
            }
        }
    }
}

/// Ton que le rendu produira pour cet échantillon : le blanc du fond moins
/// la couverture du disque d'encre.
#[must_use]
fn displayed_tone(lum: f32, cell: &Cell, grid_size: u32) -> f32 {
    let r = radius_for(lum, cell, grid_size);
    let coverage = (std::f32::consts::PI * r * r) / cell.area() as f32;
    255.0 * (1.0 - coverage.min(1.0))
}
