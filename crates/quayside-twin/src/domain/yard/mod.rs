//! Storage yard
//!
//! ```text
//! YardPlanner
//!   ├── blocks: [YardBlock]      bay × cell × tier stacks
//!   ├── registry                 id → last known Location
//!   └── strategy                 where the next container goes
//! ```
//!
//! The planner owns the one location registry of a run and lends it to
//! blocks on every store and retrieval.

pub mod block;
pub mod container;
pub mod placement;
pub mod registry;
pub mod stack;

pub use block::{BlockSnapshot, Rejected, RetrievalPolicy, YardBlock, YardError};
pub use container::{
    Container, ContainerFactory, ContainerId, ContainerSize, ContainerType, CtInterface, Location,
};
pub use placement::{BayScanPlacement, Placement, PlacementStrategy};
pub use registry::ContainerLocationRegistry;
pub use stack::Stack;

use serde::Serialize;

/// Stack heights of every block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YardSnapshot {
    /// One entry per block, registration order
    pub blocks: Vec<BlockSnapshot>,
}

/// The terminal's blocks plus the shared registry
#[derive(Debug)]
pub struct YardPlanner {
    blocks: Vec<YardBlock>,
    registry: ContainerLocationRegistry,
    strategy: Box<dyn PlacementStrategy>,
}

impl Default for YardPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl YardPlanner {
    /// Empty yard with first-fit placement
    pub fn new() -> Self {
        Self::with_strategy(Box::new(BayScanPlacement))
    }

    /// Empty yard with a custom strategy
    pub fn with_strategy(strategy: Box<dyn PlacementStrategy>) -> Self {
        Self {
            blocks: Vec::new(),
            registry: ContainerLocationRegistry::new(),
            strategy,
        }
    }

    /// Register a block; scan order is registration order
    pub fn add_block(&mut self, block: YardBlock) {
        self.blocks.push(block);
    }

    /// Blocks in registration order
    pub fn blocks(&self) -> &[YardBlock] {
        &self.blocks
    }

    /// Block by name
    pub fn block(&self, name: &str) -> Option<&YardBlock> {
        self.blocks.iter().find(|b| b.name() == name)
    }

    /// Location registry
    pub fn registry(&self) -> &ContainerLocationRegistry {
        &self.registry
    }

    /// Containers stored across all blocks
    pub fn stored(&self) -> usize {
        self.blocks.iter().map(YardBlock::stored).sum()
    }

    /// Ask the strategy where `container` would go
    pub fn find_placement(&self, container: &Container) -> Option<Placement> {
        self.strategy.find_placement(&self.blocks, container)
    }

    /// Find a slot and store `container` there
    ///
    /// # Errors
    ///
    /// [`YardError::CapacityExhausted`] (container handed back) when no
    /// block has a legal slot.
    pub fn place(&mut self, container: Container) -> Result<Location, Rejected> {
        let Some(placement) = self.find_placement(&container) else {
            return Err(Rejected {
                error: YardError::CapacityExhausted {
                    scope: "yard".into(),
                },
                container,
            });
        };
        match self.blocks.get_mut(placement.block_index) {
            Some(block) => block.store_container(container, placement.bay, placement.cell, &self.registry),
            None => Err(Rejected {
                error: YardError::CapacityExhausted {
                    scope: format!("block #{}", placement.block_index),
                },
                container,
            }),
        }
    }

    /// Look `id` up in the registry and dig it out
    ///
    /// `Ok(None)` when the registry does not know the id or the dig misses.
    ///
    /// # Errors
    ///
    /// Propagates [`YardBlock::retrieve_container`] errors.
    pub fn retrieve(&mut self, id: ContainerId) -> Result<Option<Container>, YardError> {
        let Some(location) = self.registry.location(id) else {
            return Ok(None);
        };
        let Some(block) = self.blocks.iter_mut().find(|b| b.name() == location.block) else {
            return Ok(None);
        };
        block.retrieve_container(id, location.bay, location.cell, &self.registry)
    }

    /// Read-only stack heights
    pub fn snapshot(&self) -> YardSnapshot {
        YardSnapshot {
            blocks: self.blocks.iter().map(YardBlock::snapshot).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_then_retrieve_through_registry() {
        let mut yard = YardPlanner::new();
        yard.add_block(YardBlock::new("Block1", 10, 2, 2, 2).unwrap());
        let mut factory = ContainerFactory::new();

        let first = factory.create(ContainerType::Laden, ContainerSize::TwentyFt);
        let first_id = first.id();
        let at = yard.place(first).unwrap();
        assert_eq!((at.block.as_str(), at.bay, at.cell, at.tier), ("Block1", 1, 1, 1));
        yard.place(factory.create(ContainerType::Laden, ContainerSize::TwentyFt)).unwrap();
        assert_eq!(yard.stored(), 2);

        let got = yard.retrieve(first_id).unwrap().unwrap();
        assert_eq!(got.id(), first_id);
        assert_eq!(yard.stored(), 1);
        assert_eq!(yard.retrieve(first_id), Ok(None));
    }

    #[test]
    fn test_exhausted_yard_hands_container_back() {
        let mut yard = YardPlanner::new();
        yard.add_block(YardBlock::new("Tiny", 1, 1, 1, 1).unwrap());
        let mut factory = ContainerFactory::new();
        yard.place(factory.create(ContainerType::Empty, ContainerSize::TwentyFt)).unwrap();

        let rejected = yard
            .place(factory.create(ContainerType::Empty, ContainerSize::TwentyFt))
            .unwrap_err();
        assert!(matches!(rejected.error, YardError::CapacityExhausted { .. }));
        assert_eq!(rejected.container.id().to_string(), "20FT-2");
    }

    #[test]
    fn test_snapshot_is_read_only_view() {
        let mut yard = YardPlanner::new();
        yard.add_block(YardBlock::new("Block1", 10, 2, 2, 3).unwrap());
        let mut factory = ContainerFactory::new();
        yard.place(factory.create(ContainerType::Laden, ContainerSize::FortyFt)).unwrap();

        let snap = yard.snapshot();
        assert_eq!(snap.blocks[0].heights, vec![vec![0, 0], vec![1, 0], vec![0, 0]]);
        assert_eq!(yard.snapshot(), snap);
    }
}
