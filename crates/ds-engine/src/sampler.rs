use ds_core::buffer::{PixelBuffer, LUMA_B, LUMA_G, LUMA_R};
use ds_core::grid::Cell;
use ds_core::params::HalftoneParams;
use rayon::prelude::*;

/// Table d'ajustement tonal à 256 entrées, une par valeur de canal.
///
/// Combine luminosité, contraste puis gamma en une seule consultation :
/// `v' = clamp((v - 128)·cf + 128 + bo, 0, 255)` puis
/// `v'' = 255·(v'/255)^(1/γ)`, avec `cf = 1 + contrast/100` et
/// `bo = (brightness - 50)·2.55`.
///
/// # Example
/// ```
/// use ds_core::params::HalftoneParams;
/// use ds_engine::sampler::AdjustLut;
/// let lut = AdjustLut::new(&HalftoneParams::default());
/// assert_eq!(lut.map(0), 0.0);
/// assert_eq!(lut.map(255), 255.0);
/// ```
pub struct AdjustLut {
    table: [f32; 256],
}

impl AdjustLut {
    /// Construit la table pour un jeu de paramètres donné.
    #[must_use]
    pub fn new(params: &HalftoneParams) -> Self {
        let cf = params.contrast_factor();
        let bo = params.brightness_offset();
        let inv_gamma = 1.0 / params.gamma;
        let mut table = [0.0f32; 256];
        for (v, slot) in table.iter_mut().enumerate() {
            let adjusted = ((v as f32 - 128.0) * cf + 128.0 + bo).clamp(0.0, 255.0);
            *slot = 255.0 * (adjusted / 255.0).powf(inv_gamma);
        }
        Self { table }
    }

    /// Valeur ajustée du canal, dans [0, 255].
    #[inline(always)]
    #[must_use]
    pub fn map(&self, v: u8) -> f32 {
        self.table[v as usize]
    }
}

/// Luminance moyenne ajustée d'une cellule, dans [0, 255].
///
/// Chaque canal passe par la table avant pondération BT.709 ; la moyenne
/// est accumulée en f64 pour rester stable sur les grandes cellules.
#[must_use]
pub fn cell_luminance(src: &PixelBuffer, cell: &Cell, lut: &AdjustLut) -> f32 {
    debug_assert!(cell.area() > 0, "empty cell");
    debug_assert!(cell.x0 + cell.width <= src.width && cell.y0 + cell.height <= src.height);
    let stride = (src.width * 4) as usize;
    let mut sum = 0.0f64;
    for y in cell.y0..cell.y0 + cell.height {
        let row_start = y as usize * stride + (cell.x0 * 4) as usize;
        let row = &src.data[row_start..row_start + (cell.width * 4) as usize];
        for px in row.chunks_exact(4) {
            let lum = LUMA_R * lut.map(px[0]) + LUMA_G * lut.map(px[1]) + LUMA_B * lut.map(px[2]);
            sum += f64::from(lum);
        }
    }
    ((sum / f64::from(cell.area())) as f32).clamp(0.0, 255.0)
}

/// Échantillonne toutes les cellules en parallèle.
///
/// Le vecteur retourné suit l'ordre de `cells` ; chaque échantillon ne
/// dépend que de sa propre cellule, le découpage en tâches n'influe pas
/// sur le résultat.
#[must_use]
pub fn aggregate(src: &PixelBuffer, cells: &[Cell], params: &HalftoneParams) -> Vec<f32> {
    let lut = AdjustLut::new(params);
    cells
        .par_iter()
        .map(|cell| cell_luminance(src, cell, &lut))
        .collect()
}
