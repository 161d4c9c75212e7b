use crate::error::HalftoneError;

/// Cellule rectangulaire de la grille de trame.
///
/// Les cellules intérieures sont carrées (`grid_size` de côté) ; celles des
/// bords droit et bas sont tronquées aux dimensions restantes de l'image.
///
/// # Example
/// ```
/// use ds_core::grid::Cell;
/// let cell = Cell { x0: 100, y0: 0, width: 5, height: 50 };
/// assert_eq!(cell.x0 + cell.width, 105);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Colonne du coin supérieur gauche, en pixels.
    pub x0: u32,
    /// Ligne du coin supérieur gauche, en pixels.
    pub y0: u32,
    /// Largeur en pixels (≤ `grid_size`).
    pub width: u32,
    /// Hauteur en pixels (≤ `grid_size`).
    pub height: u32,
}

impl Cell {
    /// Nombre de pixels couverts par la cellule.
    #[inline(always)]
    #[must_use]
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Centre géométrique de la cellule, en coordonnées image.
    #[inline(always)]
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (
            self.x0 as f32 + self.width as f32 / 2.0,
            self.y0 as f32 + self.height as f32 / 2.0,
        )
    }
}

/// Itérateur paresseux sur les cellules d'une image, en ordre row-major.
///
/// Aucune cellule n'est matérialisée avant d'être demandée. Une image vide
/// (largeur ou hauteur nulle) produit zéro cellule.
///
/// # Example
/// ```
/// use ds_core::grid::CellGrid;
/// let grid = CellGrid::new(105, 105, 50).unwrap();
/// assert_eq!(grid.cols(), 3);
/// assert_eq!(grid.rows(), 3);
/// assert_eq!(grid.count(), 9);
/// ```
#[derive(Clone, Debug)]
pub struct CellGrid {
    width: u32,
    height: u32,
    grid_size: u32,
    cx: u32,
    cy: u32,
}

impl CellGrid {
    /// Construit la grille pour une image `width`×`height` et un pas donné.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` si `grid_size == 0`, avant toute allocation.
    pub fn new(width: u32, height: u32, grid_size: u32) -> Result<Self, HalftoneError> {
        if grid_size == 0 {
            return Err(HalftoneError::invalid("grid_size", 0, "doit être ≥ 1"));
        }
        Ok(Self {
            width,
            height,
            grid_size,
            cx: 0,
            cy: 0,
        })
    }

    /// Nombre de colonnes de cellules (plafond de `width / grid_size`).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.width.div_ceil(self.grid_size) as usize
    }

    /// Nombre de lignes de cellules (plafond de `height / grid_size`).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.height.div_ceil(self.grid_size) as usize
    }

    fn remaining(&self) -> usize {
        if self.width == 0 || self.cy >= self.height {
            return 0;
        }
        let cols = self.cols();
        let col = (self.cx / self.grid_size) as usize;
        let row = (self.cy / self.grid_size) as usize;
        (cols - col) + (self.rows() - row - 1) * cols
    }
}

impl Iterator for CellGrid {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.width == 0 || self.cy >= self.height {
            return None;
        }
        let cell = Cell {
            x0: self.cx,
            y0: self.cy,
            width: self.grid_size.min(self.width - self.cx),
            height: self.grid_size.min(self.height - self.cy),
        };
        self.cx += self.grid_size;
        if self.cx >= self.width {
            self.cx = 0;
            self.cy += self.grid_size;
        }
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for CellGrid {}
