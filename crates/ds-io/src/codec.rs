use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use ds_core::buffer::PixelBuffer;

/// Décode un conteneur d'image (PNG, JPEG, BMP, GIF) depuis la mémoire.
///
/// Tout format est normalisé en RGBA 8 bits.
///
/// # Errors
/// Returns an error if the bytes are not a decodable image.
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(bytes).context("Décodage de l'image impossible")?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Image décodée : {width}×{height}");
    Ok(PixelBuffer {
        data: rgba.into_raw(),
        width,
        height,
    })
}

/// Charge une image depuis le disque, normalisée en RGBA 8 bits.
///
/// # Errors
/// Returns an error if the image cannot be loaded.
///
/// # Example
/// ```no_run
/// use ds_io::codec::load_image;
/// use std::path::Path;
/// let buf = load_image(Path::new("test.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer {
        data: rgba.into_raw(),
        width,
        height,
    })
}

/// Encode un buffer en PNG, en mémoire.
///
/// # Errors
/// Returns an error if the buffer shape is inconsistent or encoding fails.
pub fn encode_png(buf: &PixelBuffer) -> Result<Vec<u8>> {
    buf.validate_shape()?;
    let img: image::RgbaImage =
        image::ImageBuffer::from_raw(buf.width, buf.height, buf.data.clone())
            .context("Buffer RGBA incohérent")?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .context("Encodage PNG impossible")?;
    Ok(out.into_inner())
}

/// Écrit un buffer en PNG sur le disque.
///
/// # Errors
/// Returns an error if encoding fails or the file cannot be written.
pub fn save_png(buf: &PixelBuffer, path: &Path) -> Result<()> {
    let bytes = encode_png(buf)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::info!("PNG écrit vers {}", path.display());
    Ok(())
}
