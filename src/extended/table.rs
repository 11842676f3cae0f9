use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Row-major dense 2D table with fixed dimensions.
///
/// # Examples
///
/// ```
/// use u_energysched::extended::DenseTable;
///
/// let mut table: DenseTable<Option<i64>> = DenseTable::new(3, 3, None);
/// table[(1, 2)] = Some(7);
/// assert_eq!(table.get(1, 2), Some(&Some(7)));
/// assert_eq!(table.row(1), Some(&[None, None, Some(7)][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenseTable<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> DenseTable<T> {
    /// Creates a table filled with `value`.
    pub fn new(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T> DenseTable<T> {
    /// Builds a table from equally long rows.
    ///
    /// Returns `None` if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(Self {
            rows: count,
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell `(row, col)`, `None` when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// One row as a slice, `None` when out of bounds.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row < self.rows {
            self.data.get(row * self.cols..(row + 1) * self.cols)
        } else {
            None
        }
    }

    /// Whether the data length matches the declared dimensions.
    ///
    /// Always true for tables built through this API; used to vet
    /// deserialized tables.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.rows * self.cols
    }
}

impl<T: Copy> DenseTable<Option<T>> {
    /// Value of an optional cell, flattening out-of-bounds to `None`.
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> Option<T> {
        self.get(row, col).copied().flatten()
    }
}

impl<T> Index<(usize, usize)> for DenseTable<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.rows && col < self.cols);
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for DenseTable<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.rows && col < self.cols);
        &mut self.data[row * self.cols + col]
    }
}
