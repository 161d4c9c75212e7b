use crate::error::HalftoneError;

/// Poids de luminance perceptuelle BT.709, canal rouge.
pub const LUMA_R: f32 = 0.2126;
/// Poids de luminance perceptuelle BT.709, canal vert.
pub const LUMA_G: f32 = 0.7152;
/// Poids de luminance perceptuelle BT.709, canal bleu.
pub const LUMA_B: f32 = 0.0722;

/// Buffer de pixels en entrée/sortie du moteur de trame.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel.
///
/// # Example
/// ```
/// use ds_core::buffer::PixelBuffer;
/// let buf = PixelBuffer::new(10, 10);
/// assert_eq!(buf.data.len(), 400);
/// ```
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelBuffer {
    /// Crée un buffer transparent (tous octets à zéro) aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use ds_core::buffer::PixelBuffer;
    /// let buf = PixelBuffer::new(100, 50);
    /// assert_eq!(buf.width, 100);
    /// assert_eq!(buf.height, 50);
    /// assert_eq!(buf.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; (width * height * 4) as usize],
            width,
            height,
        }
    }

    /// Adopte un buffer RGBA existant après contrôle de cohérence.
    ///
    /// # Errors
    ///
    /// `BufferShapeMismatch` si `data.len() != width * height * 4`.
    ///
    /// # Example
    /// ```
    /// use ds_core::buffer::PixelBuffer;
    /// let buf = PixelBuffer::from_raw(vec![0; 16], 2, 2).unwrap();
    /// assert_eq!(buf.height, 2);
    /// assert!(PixelBuffer::from_raw(vec![0; 15], 2, 2).is_err());
    /// ```
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32) -> Result<Self, HalftoneError> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return Err(HalftoneError::BufferShapeMismatch {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Revérifie l'invariant de forme (utile après mutation externe de `data`).
    ///
    /// # Errors
    ///
    /// `BufferShapeMismatch` si la longueur ne correspond plus aux dimensions.
    pub fn validate_shape(&self) -> Result<(), HalftoneError> {
        if self.data.len() != (self.width as usize) * (self.height as usize) * 4 {
            return Err(HalftoneError::BufferShapeMismatch {
                width: self.width,
                height: self.height,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use ds_core::buffer::PixelBuffer;
    /// let buf = PixelBuffer::new(10, 10);
    /// assert_eq!(buf.pixel(0, 0), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = ((y * self.width + x) * 4) as usize;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Luminance perceptuelle BT.709 du pixel, dans [0, 255].
    ///
    /// # Example
    /// ```
    /// use ds_core::buffer::PixelBuffer;
    /// let mut buf = PixelBuffer::new(1, 1);
    /// buf.data[0] = 255; buf.data[1] = 255; buf.data[2] = 255; buf.data[3] = 255;
    /// assert_eq!(buf.luminance(0, 0), 255.0);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> f32 {
        let (r, g, b, _) = self.pixel(x, y);
        LUMA_R * f32::from(r) + LUMA_G * f32::from(g) + LUMA_B * f32::from(b)
    }

    /// Remplit tout le buffer avec la même valeur RGBA.
    ///
    /// # Example
    /// ```
    /// use ds_core::buffer::PixelBuffer;
    /// let mut buf = PixelBuffer::new(2, 2);
    /// buf.fill([255, 255, 255, 255]);
    /// assert_eq!(buf.pixel(1, 1), (255, 255, 255, 255));
    /// ```
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }
}
