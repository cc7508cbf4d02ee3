//! Construction parameters: initial capacity and load factor.

use crate::error::{ArgumentError, TableError};

/// Capacity used by `new()` constructors.
pub const DEFAULT_CAPACITY: usize = 16;
/// Load factor used when none is given.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.70;
/// Smallest number of slots a single growth step adds. Keeps small tables
/// making progress when `capacity * load_factor` rounds down to nothing.
pub const MIN_GROWTH: usize = 10;

/// Validated table configuration.
///
/// The load factor is the fill fraction at which the table grows before
/// accepting a new entry. It must lie in the open interval `(0, 1)`: a table
/// may never become completely full, since the probe relies on finding an
/// empty or tombstoned slot.
///
/// Growth adds the pending count plus `capacity * load_factor` slots per
/// step, never fewer than [`MIN_GROWTH`]. A load factor far below `0.05`
/// makes the table allocate roughly `len / load_factor` slots and grow in
/// many small steps; keep it within `[0.05, 0.95]` for practical tables.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    capacity: usize,
    load_factor: f64,
}

impl TableConfig {
    pub fn new(capacity: usize, load_factor: f64) -> Result<Self, TableError> {
        check_load_factor(load_factor)?;
        Ok(Self {
            capacity,
            load_factor,
        })
    }

    pub fn with_capacity(self, capacity: usize) -> Self {
        Self { capacity, ..self }
    }

    pub fn with_load_factor(self, load_factor: f64) -> Result<Self, TableError> {
        Self::new(self.capacity, load_factor)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

fn check_load_factor(load_factor: f64) -> Result<(), ArgumentError> {
    // Comparisons with NaN are false, so NaN lands in the error branch.
    if load_factor > 0.0 && load_factor < 1.0 {
        Ok(())
    } else {
        Err(ArgumentError::LoadFactorOutOfRange(load_factor))
    }
}
