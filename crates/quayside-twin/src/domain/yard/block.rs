//! Yard block: a bay × cell × tier matrix of stacks
//!
//! # Bay numbering
//!
//! A block declared with `num_bays = n` has `2n - 1` physical bays numbered
//! from 1. Odd bays hold 20ft containers, even bays hold 40ft containers
//! that straddle both odd neighbours:
//!
//! ```text
//!   bay:   1     2     3     4     5
//!        [20ft][====40ft====][20ft]
//!              [  lies over 1..3  ]
//! ```
//!
//! A slot is free for either size only while both neighbouring stacks at the
//! same cell are empty, so a 40ft box and a 20ft box never share ground.
//!
//! # Blind retrieval
//!
//! [`YardBlock::retrieve_container`] pops the target stack until the wanted
//! id surfaces. Every container lifted off the target is parked on the
//! least-occupied sibling cell of the same bay; that one push may exceed
//! `num_tiers` (overstack window), and the window is closed again before
//! the next container is touched.

use super::container::{Container, ContainerId, ContainerSize, Location};
use super::registry::ContainerLocationRegistry;
use super::stack::Stack;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Yard operation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YardError {
    /// No room left (full stack, full block or full yard)
    #[error("capacity exhausted: {scope}")]
    CapacityExhausted {
        /// Where capacity ran out
        scope: String,
    },

    /// A neighbouring stack is occupied
    #[error("slot {block} bay {bay} cell {cell} blocked by a neighbouring stack")]
    SlotBlocked {
        /// Block name
        block: String,
        /// Requested bay
        bay: usize,
        /// Requested cell
        cell: usize,
    },

    /// Container size does not match the bay parity
    #[error("{size} container cannot use bay {bay}")]
    BayParity {
        /// Container size
        size: ContainerSize,
        /// Requested bay
        bay: usize,
    },

    /// Coordinates outside the block
    #[error("bay {bay} cell {cell} is outside block {block}")]
    OutOfBounds {
        /// Block name
        block: String,
        /// Requested bay
        bay: usize,
        /// Requested cell
        cell: usize,
    },

    /// Digging needs a second cell in the bay
    #[error("block {block} has no scratch cell to dig into")]
    NoScratchCell {
        /// Block name
        block: String,
    },

    /// Zero-sized block
    #[error("block {block} must have non-zero capacity, bays, cells and tiers")]
    InvalidDimensions {
        /// Block name
        block: String,
    },
}

/// A store that did not happen; the container is handed back
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    /// Why the store failed
    pub error: YardError,
    /// The container, unchanged
    pub container: Container,
}

/// What to do with disturbed containers when a retrieval misses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalPolicy {
    /// Leave them in their scratch cells
    #[default]
    LeaveReshuffled,
    /// Put them back on the original stack in original order
    Restore,
}

/// Read-only view of one block's stack heights
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSnapshot {
    /// Block name
    pub name: String,
    /// Physical bay count (`2 * num_bays - 1`)
    pub physical_bays: usize,
    /// Cells per bay
    pub cells: usize,
    /// Tier bound
    pub tiers: usize,
    /// `heights[bay - 1][cell - 1]`
    pub heights: Vec<Vec<usize>>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Block
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One physical yard block
#[derive(Debug)]
pub struct YardBlock {
    name: String,
    capacity: usize,
    num_bays: usize,
    num_cells: usize,
    num_tiers: usize,
    retrieval_policy: RetrievalPolicy,
    /// Row-major by physical bay, then cell
    stacks: Vec<Stack>,
    stored: usize,
}

impl YardBlock {
    /// Create an empty block
    ///
    /// # Errors
    ///
    /// [`YardError::InvalidDimensions`] if any dimension is zero.
    pub fn new(
        name: impl Into<String>,
        capacity: usize,
        num_bays: usize,
        num_cells: usize,
        num_tiers: usize,
    ) -> Result<Self, YardError> {
        let name = name.into();
        if capacity == 0 || num_bays == 0 || num_cells == 0 || num_tiers == 0 {
            return Err(YardError::InvalidDimensions { block: name });
        }
        let physical = num_bays * 2 - 1;
        Ok(Self {
            name,
            capacity,
            num_bays,
            num_cells,
            num_tiers,
            retrieval_policy: RetrievalPolicy::default(),
            stacks: (0..physical * num_cells).map(|_| Stack::new(num_tiers)).collect(),
            stored: 0,
        })
    }

    /// Builder-style policy override
    pub fn with_retrieval_policy(mut self, policy: RetrievalPolicy) -> Self {
        self.retrieval_policy = policy;
        self
    }

    /// Block name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total container capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Declared bay count
    pub fn num_bays(&self) -> usize {
        self.num_bays
    }

    /// Highest physical bay number
    pub fn physical_bays(&self) -> usize {
        self.num_bays * 2 - 1
    }

    /// Cells per bay
    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// Tier bound per stack
    pub fn num_tiers(&self) -> usize {
        self.num_tiers
    }

    /// Policy applied when a retrieval misses
    pub fn retrieval_policy(&self) -> RetrievalPolicy {
        self.retrieval_policy
    }

    /// Containers currently stored
    pub fn stored(&self) -> usize {
        self.stored
    }

    /// Whether the block-level capacity is used up
    pub fn is_full(&self) -> bool {
        self.stored >= self.capacity
    }

    fn in_bounds(&self, bay: usize, cell: usize) -> bool {
        (1..=self.physical_bays()).contains(&bay) && (1..=self.num_cells).contains(&cell)
    }

    fn index(&self, bay: usize, cell: usize) -> usize {
        (bay - 1) * self.num_cells + (cell - 1)
    }

    fn stack(&self, bay: usize, cell: usize) -> Option<&Stack> {
        self.in_bounds(bay, cell).then(|| &self.stacks[self.index(bay, cell)])
    }

    fn out_of_bounds(&self, bay: usize, cell: usize) -> YardError {
        YardError::OutOfBounds {
            block: self.name.clone(),
            bay,
            cell,
        }
    }

    /// Height of the stack at `(bay, cell)`; 0 outside the block
    pub fn height(&self, bay: usize, cell: usize) -> usize {
        self.stack(bay, cell).map_or(0, Stack::len)
    }

    /// Whether ground at `(bay, cell)` is covered, counting the footprint
    /// of 40ft containers held on an adjacent even bay
    pub fn is_occupied(&self, bay: usize, cell: usize) -> bool {
        if self.height(bay, cell) > 0 {
            return true;
        }
        bay % 2 == 1 && (self.height(bay - 1, cell) > 0 || self.height(bay + 1, cell) > 0)
    }

    fn neighbours_empty(&self, bay: usize, cell: usize) -> bool {
        self.height(bay - 1, cell) == 0 && self.height(bay + 1, cell) == 0
    }

    /// Whether a 20ft container may go on `(bay, cell)` right now
    pub fn is_20ft_slot_available(&self, bay: usize, cell: usize) -> bool {
        self.slot_available(ContainerSize::TwentyFt, bay, cell)
    }

    /// Whether a 40ft container may go on `(bay, cell)` right now
    pub fn is_40ft_slot_available(&self, bay: usize, cell: usize) -> bool {
        self.slot_available(ContainerSize::FortyFt, bay, cell)
    }

    /// Full availability test used by placement: bounds, parity, stack
    /// room, neighbour rule and block capacity
    pub fn slot_available(&self, size: ContainerSize, bay: usize, cell: usize) -> bool {
        self.check_slot(size, bay, cell).is_ok()
    }

    fn check_slot(&self, size: ContainerSize, bay: usize, cell: usize) -> Result<(), YardError> {
        let Some(stack) = self.stack(bay, cell) else {
            return Err(self.out_of_bounds(bay, cell));
        };
        if !size.fits_bay(bay) {
            return Err(YardError::BayParity { size, bay });
        }
        if !stack.has_room() {
            return Err(YardError::CapacityExhausted {
                scope: format!("{} bay {bay} cell {cell}", self.name),
            });
        }
        if !self.neighbours_empty(bay, cell) {
            return Err(YardError::SlotBlocked {
                block: self.name.clone(),
                bay,
                cell,
            });
        }
        if self.is_full() {
            return Err(YardError::CapacityExhausted {
                scope: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Push `container` on top of `(bay, cell)`
    ///
    /// On success the container's location is stamped, it is registered in
    /// `registry` and its new location is returned.
    ///
    /// # Errors
    ///
    /// The container is handed back inside [`Rejected`] when the slot is
    /// out of bounds, has the wrong parity, is full, is blocked by a
    /// neighbour or the block is at capacity.
    pub fn store_container(
        &mut self,
        mut container: Container,
        bay: usize,
        cell: usize,
        registry: &ContainerLocationRegistry,
    ) -> Result<Location, Rejected> {
        if let Err(error) = self.check_slot(container.size(), bay, cell) {
            return Err(Rejected { error, container });
        }
        let location = Location {
            block: self.name.clone(),
            bay,
            cell,
            tier: self.height(bay, cell) + 1,
        };
        container.set_location(Some(location.clone()));
        let id = container.id();
        let idx = self.index(bay, cell);
        if let Err(container) = self.stacks[idx].push(container) {
            let scope = format!("{} bay {bay} cell {cell}", self.name);
            return Err(Rejected {
                error: YardError::CapacityExhausted { scope },
                container: unplaced(container),
            });
        }
        self.stored += 1;
        registry.register(id, location.clone());
        Ok(location)
    }

    /// Dig `id` out of `(bay, cell)`
    ///
    /// Returns `Ok(None)` when the stack empties without surfacing the
    /// target. Containers lifted off the target are parked on the
    /// least-occupied sibling cell and re-registered there; on a miss the
    /// block's [`RetrievalPolicy`] decides whether they are put back.
    ///
    /// # Errors
    ///
    /// [`YardError::OutOfBounds`] for bad coordinates and
    /// [`YardError::NoScratchCell`] when digging is needed but the bay has
    /// a single cell. Neither touches any stack. A scratch stack refusing a
    /// parked container yields [`YardError::CapacityExhausted`].
    pub fn retrieve_container(
        &mut self,
        id: ContainerId,
        bay: usize,
        cell: usize,
        registry: &ContainerLocationRegistry,
    ) -> Result<Option<Container>, YardError> {
        let Some(target) = self.stack(bay, cell) else {
            return Err(self.out_of_bounds(bay, cell));
        };
        let must_dig = target.top().is_some_and(|top| top.id() != id);
        if must_dig && self.num_cells < 2 {
            return Err(YardError::NoScratchCell {
                block: self.name.clone(),
            });
        }

        let target_idx = self.index(bay, cell);
        let mut moved: Vec<usize> = Vec::new();
        while let Some(mut current) = self.stacks[target_idx].pop() {
            if current.id() == id {
                self.stored -= 1;
                current.set_location(None);
                registry.remove(id);
                return Ok(Some(current));
            }
            let scratch = self.scratch_cell(bay, cell);
            self.park(current, bay, scratch, registry)?;
            moved.push(scratch);
        }

        if self.retrieval_policy == RetrievalPolicy::Restore {
            self.restore(&moved, bay, cell, registry)?;
        }
        Ok(None)
    }

    /// Sibling cell with the fewest containers, lowest number on ties
    fn scratch_cell(&self, bay: usize, cell: usize) -> usize {
        (1..=self.num_cells)
            .filter(|&c| c != cell)
            .min_by_key(|&c| (self.height(bay, c), c))
            .unwrap_or(cell)
    }

    /// Push onto `(bay, cell)` inside an overstack window
    ///
    /// The registry is only updated once the push has landed.
    fn park(
        &mut self,
        mut container: Container,
        bay: usize,
        cell: usize,
        registry: &ContainerLocationRegistry,
    ) -> Result<(), YardError> {
        let idx = self.index(bay, cell);
        let location = Location {
            block: self.name.clone(),
            bay,
            cell,
            tier: self.stacks[idx].len() + 1,
        };
        let id = container.id();
        container.set_location(Some(location.clone()));

        let stack = &mut self.stacks[idx];
        stack.allow_overstack();
        let pushed = stack.push(container);
        stack.disallow_overstack();

        match pushed {
            Ok(_) => {
                registry.register(id, location);
                Ok(())
            }
            Err(lost) => {
                tracing::error!(container = %lost.id(), block = %self.name, bay, cell, "scratch push refused");
                self.stored -= 1;
                registry.remove(id);
                Err(YardError::CapacityExhausted {
                    scope: format!("{} bay {bay} cell {cell}", self.name),
                })
            }
        }
    }

    /// Undo a missed dig: `moved[i]` is the scratch cell of the i-th lifted
    /// container, so walking it backwards pops them in reverse lift order
    fn restore(
        &mut self,
        moved: &[usize],
        bay: usize,
        cell: usize,
        registry: &ContainerLocationRegistry,
    ) -> Result<(), YardError> {
        for &scratch in moved.iter().rev() {
            let idx = self.index(bay, scratch);
            if let Some(container) = self.stacks[idx].pop() {
                self.park(container, bay, cell, registry)?;
            }
        }
        Ok(())
    }

    /// Stack heights, `[bay - 1][cell - 1]`
    pub fn stack_heights(&self) -> Vec<Vec<usize>> {
        (1..=self.physical_bays())
            .map(|bay| (1..=self.num_cells).map(|cell| self.height(bay, cell)).collect())
            .collect()
    }

    /// Serializable view for visualisation
    pub fn snapshot(&self) -> BlockSnapshot {
        BlockSnapshot {
            name: self.name.clone(),
            physical_bays: self.physical_bays(),
            cells: self.num_cells,
            tiers: self.num_tiers,
            heights: self.stack_heights(),
        }
    }

    /// Containers in `(bay, cell)`, bottom first
    pub fn containers_at(&self, bay: usize, cell: usize) -> Vec<ContainerId> {
        self.stack(bay, cell)
            .map(|s| s.iter().map(Container::id).collect())
            .unwrap_or_default()
    }
}

fn unplaced(mut container: Container) -> Container {
    container.set_location(None);
    container
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::yard::container::{ContainerFactory, ContainerType};

    fn twenty(factory: &mut ContainerFactory) -> Container {
        factory.create(ContainerType::Laden, ContainerSize::TwentyFt)
    }

    fn forty(factory: &mut ContainerFactory) -> Container {
        factory.create(ContainerType::Laden, ContainerSize::FortyFt)
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            YardBlock::new("B", 10, 0, 1, 1),
            Err(YardError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            YardBlock::new("B", 0, 1, 1, 1),
            Err(YardError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_full_stack_rejects_third_container() {
        let registry = ContainerLocationRegistry::new();
        let mut factory = ContainerFactory::new();
        let mut block = YardBlock::new("B", 100, 2, 1, 2).unwrap();

        let first = block.store_container(twenty(&mut factory), 1, 1, &registry).unwrap();
        let second = block.store_container(twenty(&mut factory), 1, 1, &registry).unwrap();
        assert_eq!((first.tier, second.tier), (1, 2));

        let rejected = block
            .store_container(twenty(&mut factory), 1, 1, &registry)
            .unwrap_err();
        assert!(matches!(rejected.error, YardError::CapacityExhausted { .. }));
        assert_eq!(rejected.container.id().serial(), 3);
        assert!(rejected.container.location().is_none());
        assert_eq!(block.height(1, 1), 2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_parity_and_bounds() {
        let registry = ContainerLocationRegistry::new();
        let mut factory = ContainerFactory::new();
        let mut block = YardBlock::new("B", 100, 2, 2, 2).unwrap();

        let err = block.store_container(forty(&mut factory), 1, 1, &registry).unwrap_err();
        assert!(matches!(err.error, YardError::BayParity { bay: 1, .. }));

        let err = block.store_container(twenty(&mut factory), 5, 1, &registry).unwrap_err();
        assert!(matches!(err.error, YardError::OutOfBounds { bay: 5, .. }));
    }

    #[test]
    fn test_forty_footprint_blocks_neighbours() {
        let registry = ContainerLocationRegistry::new();
        let mut factory = ContainerFactory::new();
        let mut block = YardBlock::new("B", 100, 2, 1, 2).unwrap();

        let big = forty(&mut factory);
        let big_id = big.id();
        block.store_container(big, 2, 1, &registry).unwrap();
        assert!(block.is_occupied(1, 1));
        assert!(block.is_occupied(2, 1));
        assert!(block.is_occupied(3, 1));
        assert!(!block.is_20ft_slot_available(1, 1));

        let err = block.store_container(twenty(&mut factory), 3, 1, &registry).unwrap_err();
        assert!(matches!(err.error, YardError::SlotBlocked { bay: 3, .. }));

        let back = block.retrieve_container(big_id, 2, 1, &registry).unwrap();
        assert_eq!(back.map(|c| c.id()), Some(big_id));
        assert!(!block.is_occupied(1, 1));
        assert!(!block.is_occupied(3, 1));
        assert!(block.is_20ft_slot_available(1, 1));
    }

    #[test]
    fn test_block_capacity() {
        let registry = ContainerLocationRegistry::new();
        let mut factory = ContainerFactory::new();
        let mut block = YardBlock::new("B", 1, 2, 2, 3).unwrap();

        block.store_container(twenty(&mut factory), 1, 1, &registry).unwrap();
        assert!(block.is_full());
        let err = block.store_container(twenty(&mut factory), 1, 2, &registry).unwrap_err();
        assert_eq!(
            err.error,
            YardError::CapacityExhausted {
                scope: "B".into()
            }
        );
    }

    #[test]
    fn test_dig_relocates_to_least_occupied_cell() {
        let registry = ContainerLocationRegistry::new();
        let mut factory = ContainerFactory::new();
        let mut block = YardBlock::new("B", 100, 1, 3, 2).unwrap();

        let buried = twenty(&mut factory);
        let buried_id = buried.id();
        block.store_container(buried, 1, 1, &registry).unwrap();
        let upper = twenty(&mut factory);
        let upper_id = upper.id();
        block.store_container(upper, 1, 1, &registry).unwrap();
        block.store_container(twenty(&mut factory), 1, 2, &registry).unwrap();

        let found = block.retrieve_container(buried_id, 1, 1, &registry).unwrap();
        assert_eq!(found.map(|c| c.id()), Some(buried_id));
        assert_eq!(block.stack_heights(), vec![vec![0, 1, 1]]);
        assert_eq!(registry.location(upper_id).map(|l| (l.cell, l.tier)), Some((3, 1)));
        assert!(registry.location(buried_id).is_none());
        assert_eq!(block.stored(), 2);
    }

    #[test]
    fn test_overstack_window_is_closed_after_dig() {
        let registry = ContainerLocationRegistry::new();
        let mut factory = ContainerFactory::new();
        let mut block = YardBlock::new("B", 100, 1, 2, 2).unwrap();

        let buried = twenty(&mut factory);
        let buried_id = buried.id();
        block.store_container(buried, 1, 1, &registry).unwrap();
        block.store_container(twenty(&mut factory), 1, 1, &registry).unwrap();
        block.store_container(twenty(&mut factory), 1, 2, &registry).unwrap();
        block.store_container(twenty(&mut factory), 1, 2, &registry).unwrap();

        block.retrieve_container(buried_id, 1, 1, &registry).unwrap();
        assert_eq!(block.height(1, 2), 3);
        assert!(block.stacks.iter().all(|s| !s.is_overstack_allowed()));
        let err = block.store_container(twenty(&mut factory), 1, 2, &registry).unwrap_err();
        assert!(matches!(err.error, YardError::CapacityExhausted { .. }));
    }

    #[test]
    fn test_dig_parks_past_tier_bound_on_full_siblings() {
        let registry = ContainerLocationRegistry::new();
        let mut factory = ContainerFactory::new();
        let mut block = YardBlock::new("B", 100, 1, 3, 2).unwrap();
        let buried = twenty(&mut factory);
        let buried_id = buried.id();
        block.store_container(buried, 1, 1, &registry).unwrap();
        let upper = twenty(&mut factory);
        let upper_id = upper.id();
        block.store_container(upper, 1, 1, &registry).unwrap();
        for cell in [2, 3] {
            for _ in 0..2 {
                block.store_container(twenty(&mut factory), 1, cell, &registry).unwrap();
            }
        }

        let found = block.retrieve_container(buried_id, 1, 1, &registry).unwrap();
        assert_eq!(found.map(|c| c.id()), Some(buried_id));
        assert_eq!(block.stack_heights(), vec![vec![0, 3, 2]]);
        let parked = registry.location(upper_id).unwrap();
        assert_eq!((parked.cell, parked.tier), (2, 3));
        assert_eq!(block.containers_at(1, 2).last(), Some(&upper_id));
        assert_eq!(block.stored(), 5);
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_miss_leaves_reshuffled_by_default() {
        let registry = ContainerLocationRegistry::new();
        let mut factory = ContainerFactory::new();
        let mut block = YardBlock::new("B", 100, 1, 2, 3).unwrap();
        block.store_container(twenty(&mut factory), 1, 1, &registry).unwrap();
        block.store_container(twenty(&mut factory), 1, 1, &registry).unwrap();

        let ghost = ContainerId::new(ContainerSize::TwentyFt, 99);
        assert_eq!(block.retrieve_container(ghost, 1, 1, &registry), Ok(None));
        assert_eq!(block.stack_heights(), vec![vec![0, 2]]);
        assert_eq!(block.stored(), 2);
    }

    #[test]
    fn test_miss_restores_when_configured() {
        let registry = ContainerLocationRegistry::new();
        let mut factory = ContainerFactory::new();
        let mut block = YardBlock::new("B", 100, 1, 3, 3)
            .unwrap()
            .with_retrieval_policy(RetrievalPolicy::Restore);
        for _ in 0..3 {
            block.store_container(twenty(&mut factory), 1, 1, &registry).unwrap();
        }
        block.store_container(twenty(&mut factory), 1, 2, &registry).unwrap();
        let before = block.containers_at(1, 1);

        let ghost = ContainerId::new(ContainerSize::TwentyFt, 99);
        assert_eq!(block.retrieve_container(ghost, 1, 1, &registry), Ok(None));
        assert_eq!(block.containers_at(1, 1), before);
        assert_eq!(block.stack_heights(), vec![vec![3, 1, 0]]);
        for (tier, id) in before.iter().enumerate() {
            assert_eq!(registry.location(*id).map(|l| (l.cell, l.tier)), Some((1, tier + 1)));
        }
    }

    #[test]
    fn test_single_cell_block_cannot_dig() {
        let registry = ContainerLocationRegistry::new();
        let mut factory = ContainerFactory::new();
        let mut block = YardBlock::new("B", 100, 1, 1, 2).unwrap();
        let bottom = twenty(&mut factory);
        let bottom_id = bottom.id();
        block.store_container(bottom, 1, 1, &registry).unwrap();
        let top = twenty(&mut factory);
        let top_id = top.id();
        block.store_container(top, 1, 1, &registry).unwrap();

        assert!(matches!(
            block.retrieve_container(bottom_id, 1, 1, &registry),
            Err(YardError::NoScratchCell { .. })
        ));
        assert_eq!(block.height(1, 1), 2);

        let got = block.retrieve_container(top_id, 1, 1, &registry).unwrap();
        assert_eq!(got.map(|c| c.id()), Some(top_id));
    }
}
