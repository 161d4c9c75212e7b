use thiserror::Error;

/// Errors originating from the halftone core.
#[derive(Error, Debug)]
pub enum HalftoneError {
    /// Parameter outside its accepted domain. Raised before any pixel work.
    #[error("Paramètre invalide : {name} = {value} ({reason})")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Rejected value, rendered for display.
        value: String,
        /// Accepted domain, in plain words.
        reason: &'static str,
    },

    /// Declared dimensions do not match the byte length of the buffer.
    #[error("Dimensions incohérentes : {width}×{height} pour {len} octets")]
    BufferShapeMismatch {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
        /// Actual byte length of the RGBA buffer.
        len: usize,
    },
}

impl HalftoneError {
    /// Raccourci pour un rejet de paramètre.
    #[must_use]
    pub fn invalid(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
