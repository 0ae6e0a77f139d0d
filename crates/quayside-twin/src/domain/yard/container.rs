//! Containers and their metadata

use serde::{Deserialize, Serialize};
use std::fmt;

/// TEU footprint class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContainerSize {
    /// One TEU, stored in odd bays
    #[serde(rename = "20FT")]
    TwentyFt,
    /// Two TEU, stored in even bays straddling both odd neighbours
    #[serde(rename = "40FT")]
    FortyFt,
}

impl ContainerSize {
    /// First bay a container of this size may use
    pub const fn first_bay(self) -> usize {
        match self {
            Self::TwentyFt => 1,
            Self::FortyFt => 2,
        }
    }

    /// Whether `bay` has the parity reserved for this size
    pub const fn fits_bay(self, bay: usize) -> bool {
        match self {
            Self::TwentyFt => bay % 2 == 1,
            Self::FortyFt => bay % 2 == 0,
        }
    }
}

impl fmt::Display for ContainerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwentyFt => f.write_str("20FT"),
            Self::FortyFt => f.write_str("40FT"),
        }
    }
}

/// Cargo state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    /// Full
    Laden,
    /// Empty
    Empty,
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Laden => f.write_str("Full"),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// Terminal interface a container moves between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CtInterface {
    /// Quay side
    Vessel,
    /// Truck gate
    Gate,
    /// Storage yard
    Yard,
    /// Rail head
    Rail,
}

/// Container identity: size class plus a per-run serial number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId {
    size: ContainerSize,
    serial: u64,
}

impl ContainerId {
    /// Build an id (normally done by [`ContainerFactory`])
    pub const fn new(size: ContainerSize, serial: u64) -> Self {
        Self { size, serial }
    }

    /// Size encoded in the id
    pub const fn size(&self) -> ContainerSize {
        self.size
    }

    /// Serial number
    pub const fn serial(&self) -> u64 {
        self.serial
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.size, self.serial)
    }
}

/// Physical yard coordinates; bays, cells and tiers are numbered from 1
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Block name
    pub block: String,
    /// Bay (odd: 20ft, even: 40ft)
    pub bay: usize,
    /// Cell (row)
    pub cell: usize,
    /// Tier, 1 at the ground
    pub tier: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.block, self.bay, self.cell, self.tier)
    }
}

/// A container moving through the terminal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    id: ContainerId,
    kind: ContainerType,
    dwell_time: f64,
    location: Option<Location>,
    from_interface: Option<CtInterface>,
    to_interface: Option<CtInterface>,
}

impl Container {
    /// Default yard dwell time
    pub const DEFAULT_DWELL_TIME: f64 = 10.0;

    /// Create an unplaced container
    pub fn new(id: ContainerId, kind: ContainerType) -> Self {
        Self {
            id,
            kind,
            dwell_time: Self::DEFAULT_DWELL_TIME,
            location: None,
            from_interface: None,
            to_interface: None,
        }
    }

    /// Identity
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// Size class
    pub fn size(&self) -> ContainerSize {
        self.id.size()
    }

    /// Laden or empty
    pub fn kind(&self) -> ContainerType {
        self.kind
    }

    /// Expected yard dwell time
    pub fn dwell_time(&self) -> f64 {
        self.dwell_time
    }

    /// Current yard position, `None` while not stacked
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub(crate) fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    /// Interface the container comes from
    pub fn from_interface(&self) -> Option<CtInterface> {
        self.from_interface
    }

    /// Interface the container goes to
    pub fn to_interface(&self) -> Option<CtInterface> {
        self.to_interface
    }

    /// Set the interface pair of the current move
    pub fn with_route(mut self, from: CtInterface, to: CtInterface) -> Self {
        self.from_interface = Some(from);
        self.to_interface = Some(to);
        self
    }

    /// Override the dwell time
    pub fn with_dwell_time(mut self, dwell_time: f64) -> Self {
        self.dwell_time = dwell_time;
        self
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Container ID: {}, Type: {}, Size: {}", self.id, self.kind, self.size())
    }
}

/// Issues container ids for one simulation run
#[derive(Debug, Default)]
pub struct ContainerFactory {
    issued: u64,
}

impl ContainerFactory {
    /// Start counting from 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new unplaced container
    pub fn create(&mut self, kind: ContainerType, size: ContainerSize) -> Container {
        self.issued += 1;
        Container::new(ContainerId::new(size, self.issued), kind)
    }

    /// Number of containers created so far
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_encode_size_and_counter() {
        let mut factory = ContainerFactory::new();
        let a = factory.create(ContainerType::Laden, ContainerSize::TwentyFt);
        let b = factory.create(ContainerType::Empty, ContainerSize::FortyFt);

        assert_eq!(a.id().to_string(), "20FT-1");
        assert_eq!(b.id().to_string(), "40FT-2");
        assert_eq!(factory.issued(), 2);
        assert!(a.location().is_none());
    }

    #[test]
    fn test_bay_parity() {
        assert!(ContainerSize::TwentyFt.fits_bay(1));
        assert!(!ContainerSize::TwentyFt.fits_bay(2));
        assert!(ContainerSize::FortyFt.fits_bay(4));
        assert!(!ContainerSize::FortyFt.fits_bay(5));
    }

    #[test]
    fn test_route_and_display() {
        let container = Container::new(ContainerId::new(ContainerSize::TwentyFt, 9), ContainerType::Laden)
            .with_route(CtInterface::Vessel, CtInterface::Yard);
        assert_eq!(container.from_interface(), Some(CtInterface::Vessel));
        assert_eq!(container.to_interface(), Some(CtInterface::Yard));
        assert_eq!(container.to_string(), "Container ID: 20FT-9, Type: Full, Size: 20FT");
    }
}
