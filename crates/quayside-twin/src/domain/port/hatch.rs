//! Hatch profiles: per-compartment load/discharge manifests

use crate::domain::yard::{ContainerSize, ContainerType};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Hatch profile construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HatchError {
    /// `min_count > max_count`
    #[error("hatch {hatch}: row range {min}..={max} is empty")]
    InvalidRange {
        /// Hatch profile name
        hatch: String,
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },
}

/// Direction of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Yard to vessel
    Load,
    /// Vessel to yard
    Discharge,
}

/// One manifest line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HatchRow {
    /// Load or discharge
    pub operation: Operation,
    /// Laden or empty
    pub container_type: ContainerType,
    /// 20ft or 40ft
    pub container_size: ContainerSize,
    /// Fewest containers
    pub min_count: u32,
    /// Most containers
    pub max_count: u32,
}

impl HatchRow {
    /// Build a row
    pub const fn new(
        operation: Operation,
        container_type: ContainerType,
        container_size: ContainerSize,
        min_count: u32,
        max_count: u32,
    ) -> Self {
        Self {
            operation,
            container_type,
            container_size,
            min_count,
            max_count,
        }
    }

    /// Uniform draw in `min_count..=max_count`
    pub fn draw_count<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.min_count >= self.max_count {
            return self.min_count;
        }
        rng.random_range(self.min_count..=self.max_count)
    }
}

/// Named, immutable list of rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HatchProfile {
    name: String,
    rows: Vec<HatchRow>,
}

impl HatchProfile {
    /// Validate and build a profile
    ///
    /// # Errors
    /// [`HatchError::InvalidRange`] for a row with `min_count > max_count`.
    pub fn new(name: impl Into<String>, rows: Vec<HatchRow>) -> Result<Self, HatchError> {
        let name = name.into();
        if let Some(bad) = rows.iter().find(|r| r.min_count > r.max_count) {
            return Err(HatchError::InvalidRange {
                hatch: name,
                min: bad.min_count,
                max: bad.max_count,
            });
        }
        Ok(Self { name, rows })
    }

    /// Profile name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rows in manifest order
    pub fn rows(&self) -> &[HatchRow] {
        &self.rows
    }

    /// Summed `(min, max)` container counts for one operation
    pub fn range(&self, operation: Operation) -> (u32, u32) {
        self.rows
            .iter()
            .filter(|r| r.operation == operation)
            .fold((0, 0), |(lo, hi), r| (lo + r.min_count, hi + r.max_count))
    }
}

impl fmt::Display for HatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hatch Profile: {}", self.name)?;
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(
                f,
                "Row {}: {:?} {} {} {}..={}",
                i + 1,
                row.operation,
                row.container_type,
                row.container_size,
                row.min_count,
                row.max_count
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> HatchProfile {
        HatchProfile::new(
            "Hatch_1",
            vec![
                HatchRow::new(Operation::Discharge, ContainerType::Laden, ContainerSize::TwentyFt, 100, 120),
                HatchRow::new(Operation::Load, ContainerType::Laden, ContainerSize::FortyFt, 200, 220),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = HatchProfile::new(
            "H",
            vec![HatchRow::new(Operation::Load, ContainerType::Empty, ContainerSize::TwentyFt, 5, 2)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            HatchError::InvalidRange {
                hatch: "H".into(),
                min: 5,
                max: 2
            }
        );
    }

    #[test]
    fn test_ranges_per_operation() {
        let hatch = sample();
        assert_eq!(hatch.range(Operation::Discharge), (100, 120));
        assert_eq!(hatch.range(Operation::Load), (200, 220));
    }

    #[test]
    fn test_draw_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let row = sample().rows()[0].clone();
        for _ in 0..200 {
            let n = row.draw_count(&mut rng);
            assert!((100..=120).contains(&n));
        }
        let fixed = HatchRow::new(Operation::Load, ContainerType::Laden, ContainerSize::FortyFt, 3, 3);
        assert_eq!(fixed.draw_count(&mut rng), 3);
    }
}
