use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ds_core::params::HalftoneParams;
use ds_engine::engine::render_halftone;
use ds_io::codec::{load_image, save_png};

/// Extensions image reconnues.
const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Trame une seule image et écrit le PNG résultant.
///
/// # Errors
/// Retourne une erreur si le chargement, le rendu ou l'écriture échoue.
pub fn run_single(input: &Path, output: Option<&Path>, params: &HalftoneParams) -> Result<()> {
    let source = load_image(input)?;
    log::info!(
        "Image chargée : {} ({}×{})",
        input.display(),
        source.width,
        source.height
    );

    let rendered = render_halftone(&source, params)?;

    let dest = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
    save_png(&rendered, &dest)
}

/// Trame récursivement toutes les images d'un dossier.
///
/// # Errors
/// Retourne une erreur si le dossier ne contient aucune image reconnue,
/// ou si le traitement d'un fichier échoue.
pub fn run_batch(folder: &Path, out_dir: Option<&Path>, params: &HalftoneParams) -> Result<()> {
    let mut files = Vec::new();
    scan_dir(folder, &mut files)?;
    files.sort();

    if files.is_empty() {
        anyhow::bail!("Aucune image reconnue dans {}", folder.display());
    }

    if let Some(dir) = out_dir {
        fs::create_dir_all(dir).with_context(|| format!("Impossible de créer {}", dir.display()))?;
    }

    let total = files.len();
    for (idx, path) in files.iter().enumerate() {
        log::info!("[{}/{total}] {}", idx + 1, path.display());
        let source = load_image(path)?;
        let rendered = render_halftone(&source, params)?;
        let dest = match out_dir {
            Some(dir) => dir.join(output_file_name(path)),
            None => default_output_path(path),
        };
        save_png(&rendered, &dest)?;
    }

    log::info!("Lot terminé : {total} images traitées.");
    Ok(())
}

/// Extrait récursivement les images reconnues.
fn scan_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                scan_dir(&path, files)?;
            } else if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                if IMAGE_EXTS.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }
    Ok(())
}

/// Chemin de sortie par défaut, à côté de la source.
fn default_output_path(input: &Path) -> PathBuf {
    input.with_file_name(output_file_name(input))
}

fn output_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sortie");
    format!("{stem}_halftone.png")
}
