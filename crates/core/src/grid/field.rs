//! Row-major 2D field storage
//!
//! Every per-cell quantity in the simulation (density, velocity, obstacle flags)
//! lives in a `FieldData<T>`: a flat `Vec<T>` indexed as `y * width + x`.

/// Field data container
///
/// Stores 2D field data as a flat `Vec<T>` in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy + Default> FieldData<T> {
    /// Create a new field with given dimensions, filled with `T::default()`
    ///
    /// # Arguments
    ///
    /// * `width` - Grid width in cells
    /// * `height` - Grid height in cells
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_value(width, height, T::default())
    }
}

impl<T: Copy> FieldData<T> {
    /// Create a new field with given dimensions, initialized to a value
    ///
    /// # Arguments
    ///
    /// * `width` - Grid width in cells
    /// * `height` - Grid height in cells
    /// * `value` - Initial value for all cells
    #[must_use]
    pub fn with_value(width: usize, height: usize, value: T) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Build a field by evaluating `f(x, y)` for every cell
    #[must_use]
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Grid width in cells
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)` in cells
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> T {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        self.data[y * self.width + x]
    }

    /// Get value at signed grid position, `None` outside the grid
    #[must_use]
    pub fn get_checked(&self, x: i64, y: i64) -> Option<T> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        self.data[y * self.width + x] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field: FieldData<f32> = FieldData::new(10, 20);
        assert_eq!(field.width(), 10);
        assert_eq!(field.height(), 20);
        assert_eq!(field.as_slice().len(), 200);
        assert!(field.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_field_get_set() {
        let mut field = FieldData::with_value(10, 10, 0.0_f32);
        field.set(3, 4, 123.45);
        assert_eq!(field.get(3, 4), 123.45);

        // Verify row-major indexing
        let index = 4 * 10 + 3;
        assert_eq!(field.as_slice()[index], 123.45);
    }

    #[test]
    fn test_field_from_fn() {
        let field = FieldData::from_fn(4, 3, |x, y| x + 10 * y);
        assert_eq!(field.get(3, 2), 23);
        assert_eq!(field.as_slice()[5], 11);
    }

    #[test]
    fn test_get_checked() {
        let field = FieldData::with_value(5, 5, true);
        assert_eq!(field.get_checked(4, 4), Some(true));
        assert_eq!(field.get_checked(-1, 0), None);
        assert_eq!(field.get_checked(0, 5), None);
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_field_bounds_check() {
        let field: FieldData<bool> = FieldData::new(10, 10);
        let _ = field.get(10, 5);
    }
}
