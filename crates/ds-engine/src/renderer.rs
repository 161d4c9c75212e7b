use ds_core::buffer::PixelBuffer;
use ds_core::grid::Cell;
use ds_core::params::{Background, HalftoneParams};
use rayon::prelude::*;

/// Sous ce rayon, aucun pixel n'atteint une couverture visible.
const RADIUS_EPSILON: f32 = 1e-4;

/// Rayon du disque d'une cellule pour un échantillon de luminance donné.
///
/// `r = (grid_size / 2) · (1 − L / 255)`, borné à `[0, grid_size / 2]` puis
/// au demi-côté court de la cellule (les cellules de bord sont tronquées).
///
/// # Example
/// ```
/// use ds_core::grid::Cell;
/// use ds_engine::renderer::radius_for;
/// let cell = Cell { x0: 0, y0: 0, width: 50, height: 50 };
/// assert_eq!(radius_for(0.0, &cell, 50), 25.0);
/// assert_eq!(radius_for(255.0, &cell, 50), 0.0);
/// ```
#[must_use]
#[inline(always)]
pub fn radius_for(lum: f32, cell: &Cell, grid_size: u32) -> f32 {
    let half = grid_size as f32 / 2.0;
    let base = half * (1.0 - lum / 255.0);
    let side = cell.width.min(cell.height) as f32 / 2.0;
    base.clamp(0.0, half).min(side)
}

/// Rend tous les disques sur un buffer neuf, fond compris.
///
/// Chaque disque est rastérisé strictement à l'intérieur du rectangle de sa
/// cellule. Les bandes de lignes de cellules sont rendues en parallèle et
/// n'écrivent jamais les mêmes octets.
#[must_use]
pub fn render_dots(
    width: u32,
    height: u32,
    cells: &[Cell],
    samples: &[f32],
    params: &HalftoneParams,
) -> PixelBuffer {
    debug_assert_eq!(cells.len(), samples.len());
    let mut out = PixelBuffer::new(width, height);
    if params.background == Background::White {
        out.fill([255, 255, 255, 255]);
    }
    if cells.is_empty() {
        return out;
    }

    let grid_size = params.grid_size;
    let cols = width.div_ceil(grid_size) as usize;
    let stride = (width * 4) as usize;
    let band_size = stride * grid_size as usize;

    out.data
        .par_chunks_mut(band_size)
        .enumerate()
        .for_each(|(band_idx, band)| {
            let band_y0 = band_idx as u32 * grid_size;
            let start = band_idx * cols;
            let end = (start + cols).min(cells.len());
            for (cell, &lum) in cells[start..end].iter().zip(&samples[start..end]) {
                draw_disc(band, stride, band_y0, cell, lum, params);
            }
        });
    out
}

/// Rastérise le disque d'une cellule dans sa bande de lignes.
///
/// Avec anticrénelage, le bord reçoit une rampe d'un demi-pixel :
/// `alpha = clamp(r − dist + 0.5, 0, 1)`. Sans, un pixel est encré si et
/// seulement si son centre est à distance strictement inférieure à `r`.
fn draw_disc(
    band: &mut [u8],
    stride: usize,
    band_y0: u32,
    cell: &Cell,
    lum: f32,
    params: &HalftoneParams,
) {
    let r = radius_for(lum, cell, params.grid_size);
    if r <= RADIUS_EPSILON {
        return;
    }
    let (cx, cy) = cell.center();
    let (ink_r, ink_g, ink_b) = params.ink;

    for y in cell.y0..cell.y0 + cell.height {
        let row_off = (y - band_y0) as usize * stride;
        for x in cell.x0..cell.x0 + cell.width {
            let dx = (x as f32 + 0.5) - cx;
            let dy = (y as f32 + 0.5) - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let alpha = if params.antialias {
                (r - dist + 0.5).clamp(0.0, 1.0)
            } else if dist < r {
                1.0
            } else {
                0.0
            };
            if alpha <= 0.0 {
                continue;
            }
            let idx = row_off + x as usize * 4;
            match params.background {
                Background::White => {
                    band[idx] = (f32::from(ink_r) * alpha + 255.0 * (1.0 - alpha)) as u8;
                    band[idx + 1] = (f32::from(ink_g) * alpha + 255.0 * (1.0 - alpha)) as u8;
                    band[idx + 2] = (f32::from(ink_b) * alpha + 255.0 * (1.0 - alpha)) as u8;
                    band[idx + 3] = 255;
                }
                Background::Transparent => {
                    band[idx] = ink_r;
                    band[idx + 1] = ink_g;
                    band[idx + 2] = ink_b;
                    band[idx + 3] = (alpha * 255.0).round() as u8;
                }
            }
        }
    }
}
