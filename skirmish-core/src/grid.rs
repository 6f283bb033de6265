use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::GridError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridIndex {
    pub x: i32,
    pub y: i32,
}

impl GridIndex {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn chebyshev_distance(&self, other: &GridIndex) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn neighbours(self) -> impl Iterator<Item = GridIndex> {
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| GridIndex::new(self.x + dx, self.y + dy))
    }
}

impl fmt::Display for GridIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub const fn empty() -> Self {
        Self::new(0, 0, -1, -1)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn width(&self) -> i64 {
        i64::from(self.max_x) - i64::from(self.min_x) + 1
    }

    pub fn height(&self) -> i64 {
        i64::from(self.max_y) - i64::from(self.min_y) + 1
    }

    pub fn contains(&self, index: GridIndex) -> bool {
        (self.min_x..=self.max_x).contains(&index.x) && (self.min_y..=self.max_y).contains(&index.y)
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let overlap = BoundingBox::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        );
        (!overlap.is_empty()).then_some(overlap)
    }

    pub fn cells(&self) -> impl Iterator<Item = GridIndex> {
        let BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        } = *self;
        (min_y..=max_y).flat_map(move |y| (min_x..=max_x).map(move |x| GridIndex::new(x, y)))
    }

    fn offset_of(&self, index: GridIndex) -> Result<usize, GridError> {
        if !self.contains(index) {
            return Err(GridError::OutOfBounds(index, *self));
        }
        let row = i64::from(index.y) - i64::from(self.min_y);
        let column = i64::from(index.x) - i64::from(self.min_x);
        Ok((row * self.width() + column) as usize)
    }

    /// Number of cells, or `None` when that does not fit in memory.
    pub fn area(&self) -> Option<usize> {
        if self.is_empty() {
            return Some(0);
        }
        self.width()
            .checked_mul(self.height())
            .and_then(|area| usize::try_from(area).ok())
    }

    fn checked_area(&self) -> Result<usize, GridError> {
        self.area().ok_or(GridError::TooLarge(*self))
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {})..=({}, {})]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[derive(Debug, Clone)]
pub struct Grid<T> {
    inner: BoundedGrid<T>,
}

impl<T> Grid<T> {
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            });
        }
        Ok(Self {
            inner: BoundedGrid::new(BoundingBox::new(0, 0, width - 1, height - 1))?,
        })
    }

    pub fn width(&self) -> i64 {
        self.inner.bounds().width()
    }

    pub fn height(&self) -> i64 {
        self.inner.bounds().height()
    }

    pub fn bounds(&self) -> BoundingBox {
        self.inner.bounds()
    }

    pub fn contains(&self, index: GridIndex) -> bool {
        self.inner.contains(index)
    }

    pub fn get(&self, index: GridIndex) -> Result<Option<&T>, GridError> {
        self.inner.get(index)
    }

    pub fn set(&mut self, index: GridIndex, value: T) -> Result<Option<T>, GridError> {
        self.inner.set(index, value)
    }

    pub fn remove(&mut self, index: GridIndex) -> Result<Option<T>, GridError> {
        self.inner.remove(index)
    }

    pub fn is_empty(&self, index: GridIndex) -> Result<bool, GridError> {
        self.inner.is_empty(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridIndex, &T)> {
        self.inner.iter()
    }
}

#[derive(Debug, Clone)]
pub struct BoundedGrid<T> {
    bounds: BoundingBox,
    cells: Vec<Option<T>>,
}

impl<T> BoundedGrid<T> {
    pub fn new(bounds: BoundingBox) -> Result<Self, GridError> {
        if bounds.is_empty() {
            return Err(GridError::InvalidDimensions {
                width: bounds.width(),
                height: bounds.height(),
            });
        }
        Ok(Self {
            bounds,
            cells: (0..bounds.checked_area()?).map(|_| None).collect(),
        })
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn contains(&self, index: GridIndex) -> bool {
        self.bounds.contains(index)
    }

    pub fn get(&self, index: GridIndex) -> Result<Option<&T>, GridError> {
        let offset = self.bounds.offset_of(index)?;
        Ok(self.cells[offset].as_ref())
    }

    pub fn set(&mut self, index: GridIndex, value: T) -> Result<Option<T>, GridError> {
        let offset = self.bounds.offset_of(index)?;
        Ok(self.cells[offset].replace(value))
    }

    pub fn remove(&mut self, index: GridIndex) -> Result<Option<T>, GridError> {
        let offset = self.bounds.offset_of(index)?;
        Ok(self.cells[offset].take())
    }

    pub fn is_empty(&self, index: GridIndex) -> Result<bool, GridError> {
        Ok(self.get(index)?.is_none())
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridIndex, &T)> {
        self.bounds
            .cells()
            .zip(self.cells.iter())
            .filter_map(|(index, cell)| cell.as_ref().map(|value| (index, value)))
    }
}

#[derive(Debug, Clone)]
pub struct UnboundedGrid<T> {
    cells: HashMap<GridIndex, T>,
}

impl<T> Default for UnboundedGrid<T> {
    fn default() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }
}

impl<T> UnboundedGrid<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: GridIndex) -> Option<&T> {
        self.cells.get(&index)
    }

    pub fn set(&mut self, index: GridIndex, value: T) -> Option<T> {
        self.cells.insert(index, value)
    }

    pub fn remove(&mut self, index: GridIndex) -> Option<T> {
        self.cells.remove(&index)
    }

    pub fn is_empty(&self, index: GridIndex) -> bool {
        !self.cells.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut keys = self.cells.keys();
        let Some(first) = keys.next() else {
            return BoundingBox::empty();
        };
        keys.fold(
            BoundingBox::new(first.x, first.y, first.x, first.y),
            |bounds, index| {
                BoundingBox::new(
                    bounds.min_x.min(index.x),
                    bounds.min_y.min(index.y),
                    bounds.max_x.max(index.x),
                    bounds.max_y.max(index.y),
                )
            },
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridIndex, &T)> {
        self.cells.iter().map(|(index, value)| (*index, value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanGrid {
    bounds: BoundingBox,
    bits: Vec<bool>,
}

impl BooleanGrid {
    pub fn new(bounds: BoundingBox) -> Result<Self, GridError> {
        Ok(Self {
            bounds,
            bits: vec![false; bounds.checked_area()?],
        })
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn get(&self, index: GridIndex) -> Result<bool, GridError> {
        Ok(self.bits[self.bounds.offset_of(index)?])
    }

    pub fn set(&mut self, index: GridIndex, value: bool) -> Result<(), GridError> {
        let offset = self.bounds.offset_of(index)?;
        self.bits[offset] = value;
        Ok(())
    }

    pub fn is_set(&self, index: GridIndex) -> bool {
        self.get(index).unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    pub fn iter_set(&self) -> impl Iterator<Item = GridIndex> + '_ {
        self.bounds
            .cells()
            .zip(self.bits.iter())
            .filter_map(|(index, bit)| bit.then_some(index))
    }

    pub fn union(&self, other: &BooleanGrid) -> Result<BooleanGrid, GridError> {
        self.combine(self.bounds.union(&other.bounds), |a, b| a || b, other)
    }

    pub fn intersect(&self, other: &BooleanGrid) -> Result<BooleanGrid, GridError> {
        let bounds = self
            .bounds
            .intersection(&other.bounds)
            .unwrap_or_else(BoundingBox::empty);
        self.combine(bounds, |a, b| a && b, other)
    }

    fn combine(
        &self,
        bounds: BoundingBox,
        op: impl Fn(bool, bool) -> bool,
        other: &BooleanGrid,
    ) -> Result<BooleanGrid, GridError> {
        let mut bits = Vec::with_capacity(bounds.checked_area()?);
        bits.extend(
            bounds
                .cells()
                .map(|index| op(self.is_set(index), other.is_set(index))),
        );
        Ok(BooleanGrid { bounds, bits })
    }
}
