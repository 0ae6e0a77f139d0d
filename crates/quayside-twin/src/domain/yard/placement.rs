//! Choosing where an incoming container goes

use super::block::YardBlock;
use super::container::Container;

/// A chosen slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index of the block in registration order
    pub block_index: usize,
    /// Physical bay
    pub bay: usize,
    /// Cell
    pub cell: usize,
}

/// Placement policy seam
pub trait PlacementStrategy: Send + std::fmt::Debug {
    /// Pick a slot for `container`, or `None` when the yard has no legal slot
    fn find_placement(&self, blocks: &[YardBlock], container: &Container) -> Option<Placement>;
}

/// First-fit scan: blocks in order, bays of the container's parity
/// ascending, cells ascending
#[derive(Debug, Clone, Copy, Default)]
pub struct BayScanPlacement;

impl PlacementStrategy for BayScanPlacement {
    fn find_placement(&self, blocks: &[YardBlock], container: &Container) -> Option<Placement> {
        let size = container.size();
        blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| !block.is_full())
            .find_map(|(block_index, block)| {
                (size.first_bay()..=block.physical_bays())
                    .step_by(2)
                    .flat_map(|bay| (1..=block.num_cells()).map(move |cell| (bay, cell)))
                    .find(|&(bay, cell)| block.slot_available(size, bay, cell))
                    .map(|(bay, cell)| Placement {
                        block_index,
                        bay,
                        cell,
                    })
            })
    }
}
