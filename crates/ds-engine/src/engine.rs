use ds_core::buffer::PixelBuffer;
use ds_core::error::HalftoneError;
use ds_core::grid::{Cell, CellGrid};
use ds_core::params::{DitherMode, HalftoneParams};
use rayon::prelude::*;

use crate::{dither, renderer, sampler};

/// Transforme un bitmap en trame de disques d'encre.
///
/// Pipeline : validation, partition en cellules, luminance moyenne ajustée
/// par cellule, tramage éventuel, rendu des disques sur le fond choisi. La
/// sortie a toujours les dimensions de l'entrée.
///
/// # Errors
///
/// `InvalidParameter` si un paramètre est structurellement invalide,
/// `BufferShapeMismatch` si `src` ment sur ses dimensions. Aucun travail
/// pixel n'est entamé dans ces cas.
///
/// # Example
/// ```
/// use ds_core::buffer::PixelBuffer;
/// use ds_core::params::HalftoneParams;
/// use ds_engine::engine::render_halftone;
///
/// let mut src = PixelBuffer::new(64, 64);
/// src.fill([255, 255, 255, 255]);
/// let params = HalftoneParams { grid_size: 16, ..HalftoneParams::default() };
/// let out = render_halftone(&src, &params).unwrap();
/// assert_eq!((out.width, out.height), (64, 64));
/// ```
pub fn render_halftone(
    src: &PixelBuffer,
    params: &HalftoneParams,
) -> Result<PixelBuffer, HalftoneError> {
    params.validate()?;
    src.validate_shape()?;

    let grid = CellGrid::new(src.width, src.height, params.grid_size)?;
    let cols = grid.cols();
    let rows = grid.rows();
    let cells: Vec<Cell> = grid.collect();
    log::debug!(
        "Trame {}×{} : {cols}×{rows} cellules (pas {})",
        src.width,
        src.height,
        params.grid_size
    );

    let mut samples = sampler::aggregate(src, &cells, params);
    if !cells.is_empty() {
        modulate(&mut samples, cols, &cells, params);
    }

    Ok(renderer::render_dots(
        src.width, src.height, &cells, &samples, params,
    ))
}

/// Applique le mode de tramage choisi aux échantillons, en place.
///
/// Les modes par position (ordered, noise) sont parallèles ; la diffusion
/// d'erreur est séquentielle par construction.
fn modulate(samples: &mut [f32], cols: usize, cells: &[Cell], params: &HalftoneParams) {
    match params.dithering {
        DitherMode::None => {}
        DitherMode::Ordered => {
            samples.par_iter_mut().enumerate().for_each(|(idx, s)| {
                *s = dither::apply_ordered(*s, (idx % cols) as u32, (idx / cols) as u32);
            });
        }
        DitherMode::Noise => {
            let seed = params.noise_seed;
            samples.par_iter_mut().enumerate().for_each(|(idx, s)| {
                *s = dither::apply_noise(*s, (idx % cols) as u32, (idx / cols) as u32, seed);
            });
        }
        DitherMode::FloydSteinberg => {
            dither::diffuse_floyd_steinberg(samples, cells, cols, params.grid_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ds_core::params::Background;

    const ALL_MODES: [DitherMode; 4] = [
        DitherMode::None,
        DitherMode::FloydSteinberg,
        DitherMode::Ordered,
        DitherMode::Noise,
    ];

    fn uniform(width: u32, height: u32, rgb: (u8, u8, u8)) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height);
        buf.fill([rgb.0, rgb.1, rgb.2, 255]);
        buf
    }

    fn inked_count(out: &PixelBuffer) -> usize {
        out.data.chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    #[test]
    fn white_input_renders_nothing() {
        let src = uniform(40, 40, (255, 255, 255));
        for mode in ALL_MODES {
            for grid_size in [7, 16] {
                let params = HalftoneParams {
                    grid_size,
                    dithering: mode,
                    ..HalftoneParams::default()
                };
                let out = render_halftone(&src, &params).unwrap();
                assert!(
                    out.data.iter().all(|&b| b == 0),
                    "sortie non vide ({mode:?}, pas {grid_size})"
                );
            }
        }
    }

    #[test]
    fn white_input_on_paper_stays_paper() {
        let src = uniform(30, 30, (255, 255, 255));
        for mode in ALL_MODES {
            let params = HalftoneParams {
                grid_size: 10,
                dithering: mode,
                background: Background::White,
                ..HalftoneParams::default()
            };
            let out = render_halftone(&src, &params).unwrap();
            assert!(
                out.data
                    .chunks_exact(4)
                    .all(|px| px == [255, 255, 255, 255]),
                "papier marqué ({mode:?})"
            );
        }
    }

    #[test]
    fn black_input_fills_tangent_discs() {
        let src = uniform(8, 8, (0, 0, 0));
        for mode in ALL_MODES {
            let params = HalftoneParams {
                grid_size: 4,
                dithering: mode,
                antialias: false,
                ..HalftoneParams::default()
            };
            let out = render_halftone(&src, &params).unwrap();
            // r = 2 dans chaque cellule 4×4 : 12 pixels encrés par disque.
            assert_eq!(inked_count(&out), 4 * 12, "mode {mode:?}");
            // Les disques restent tangents : chaque pixel encré est à
            // moins de r de son propre centre de cellule.
            for (i, px) in out.data.chunks_exact(4).enumerate() {
                if px[3] == 0 {
                    continue;
                }
                let (x, y) = ((i % 8) as f32, (i / 8) as f32);
                let cx = if x < 4.0 { 2.0 } else { 6.0 };
                let cy = if y < 4.0 { 2.0 } else { 6.0 };
                let d = ((x + 0.5 - cx).powi(2) + (y + 0.5 - cy).powi(2)).sqrt();
                assert!(d < 2.0, "pixel hors disque en ({x},{y})");
            }
        }
    }

    #[test]
    fn checkerboard_grid_two() {
        // Damier 2×2 cellules : disques pleins de rayon 1 sur les cases
        // noires, rien sur les blanches.
        let mut src = PixelBuffer::new(4, 4);
        for y in 0..4u32 {
            for x in 0..4u32 {
                let dark = (x / 2 + y / 2) % 2 == 0;
                let v = if dark { 0 } else { 255 };
                let idx = ((y * 4 + x) * 4) as usize;
                src.data[idx..idx + 4].copy_from_slice(&[v, v, v, 255]);
            }
        }
        let params = HalftoneParams {
            grid_size: 2,
            antialias: false,
            background: Background::White,
            ..HalftoneParams::default()
        };
        let out = render_halftone(&src, &params).unwrap();
        for y in 0..4u32 {
            for x in 0..4u32 {
                let dark = (x / 2 + y / 2) % 2 == 0;
                let expected = if dark { (0, 0, 0, 255) } else { (255, 255, 255, 255) };
                assert_eq!(out.pixel(x, y), expected, "case ({x},{y})");
            }
        }
    }

    #[test]
    fn zero_grid_size_fails_before_any_work() {
        let src = uniform(4, 4, (128, 128, 128));
        let params = HalftoneParams {
            grid_size: 0,
            ..HalftoneParams::default()
        };
        assert!(matches!(
            render_halftone(&src, &params),
            Err(HalftoneError::InvalidParameter {
                name: "grid_size",
                ..
            })
        ));
    }

    #[test]
    fn non_positive_gamma_fails() {
        let src = uniform(4, 4, (128, 128, 128));
        let params = HalftoneParams {
            gamma: 0.0,
            ..HalftoneParams::default()
        };
        assert!(matches!(
            render_halftone(&src, &params),
            Err(HalftoneError::InvalidParameter { name: "gamma", .. })
        ));
    }

    #[test]
    fn lying_buffer_shape_fails() {
        let src = PixelBuffer {
            data: vec![0u8; 10],
            width: 4,
            height: 4,
        };
        assert!(matches!(
            render_halftone(&src, &HalftoneParams::default()),
            Err(HalftoneError::BufferShapeMismatch { len: 10, .. })
        ));
    }

    #[test]
    fn empty_image_yields_empty_output() {
        let src = PixelBuffer::new(0, 0);
        let out = render_halftone(&src, &HalftoneParams::default()).unwrap();
        assert_eq!((out.width, out.height), (0, 0));
        assert!(out.data.is_empty());
    }

    #[test]
    fn boundary_cells_truncate_cleanly() {
        let src = uniform(105, 105, (60, 60, 60));
        let params = HalftoneParams {
            grid_size: 50,
            ..HalftoneParams::default()
        };
        let out = render_halftone(&src, &params).unwrap();
        assert_eq!((out.width, out.height), (105, 105));
        assert!(inked_count(&out) > 0);
    }

    #[test]
    fn brightness_shrinks_the_dots() {
        let src = uniform(64, 64, (128, 128, 128));
        let neutral = HalftoneParams {
            grid_size: 8,
            antialias: false,
            ..HalftoneParams::default()
        };
        let brighter = HalftoneParams {
            brightness: 80.0,
            ..neutral.clone()
        };
        let n = inked_count(&render_halftone(&src, &neutral).unwrap());
        let b = inked_count(&render_halftone(&src, &brighter).unwrap());
        assert!(b < n, "{b} >= {n}");
    }

    #[test]
    fn gamma_above_one_lightens_midtones() {
        let src = uniform(64, 64, (100, 100, 100));
        let neutral = HalftoneParams {
            grid_size: 8,
            antialias: false,
            ..HalftoneParams::default()
        };
        let lifted = HalftoneParams {
            gamma: 2.2,
            ..neutral.clone()
        };
        let n = inked_count(&render_halftone(&src, &neutral).unwrap());
        let l = inked_count(&render_halftone(&src, &lifted).unwrap());
        assert!(l < n, "{l} >= {n}");
    }

    #[test]
    fn noise_mode_is_seeded() {
        let src = uniform(64, 64, (128, 128, 128));
        let base = HalftoneParams {
            grid_size: 8,
            dithering: DitherMode::Noise,
            ..HalftoneParams::default()
        };
        let reseeded = HalftoneParams {
            noise_seed: 1,
            ..base.clone()
        };
        let a = render_halftone(&src, &base).unwrap();
        let b = render_halftone(&src, &base).unwrap();
        let c = render_halftone(&src, &reseeded).unwrap();
        assert_eq!(a.data, b.data);
        assert_ne!(a.data, c.data);
    }

    #[test]
    fn ordered_and_diffusion_are_deterministic() {
        let mut src = PixelBuffer::new(48, 48);
        for (i, px) in src.data.chunks_exact_mut(4).enumerate() {
            let v = (i % 251) as u8;
            px.copy_from_slice(&[v, v, v, 255]);
        }
        for mode in [DitherMode::Ordered, DitherMode::FloydSteinberg] {
            let params = HalftoneParams {
                grid_size: 6,
                dithering: mode,
                ..HalftoneParams::default()
            };
            let a = render_halftone(&src, &params).unwrap();
            let b = render_halftone(&src, &params).unwrap();
            assert_eq!(a.data, b.data, "mode {mode:?}");
        }
    }

    #[test]
    fn ordered_mode_varies_dot_sizes_on_flat_gray() {
        let src = uniform(64, 64, (128, 128, 128));
        let flat = HalftoneParams {
            grid_size: 8,
            antialias: false,
            ..HalftoneParams::default()
        };
        let dithered = HalftoneParams {
            dithering: DitherMode::Ordered,
            ..flat.clone()
        };
        let a = render_halftone(&src, &flat).unwrap();
        let b = render_halftone(&src, &dithered).unwrap();
        assert_ne!(a.data, b.data);
    }

    #[test]
    fn ink_color_lands_on_paper() {
        let src = uniform(12, 12, (0, 0, 0));
        let params = HalftoneParams {
            grid_size: 6,
            ink: (180, 20, 60),
            background: Background::White,
            antialias: false,
            ..HalftoneParams::default()
        };
        let out = render_halftone(&src, &params).unwrap();
        assert_eq!(out.pixel(3, 3), (180, 20, 60, 255));
        assert_eq!(out.pixel(0, 5), (255, 255, 255, 255));
    }
}
