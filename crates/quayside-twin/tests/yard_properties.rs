//! Property tests for yard stacking and retrieval

use proptest::prelude::*;
use quayside_twin::domain::yard::{
    ContainerFactory, ContainerId, ContainerSize, ContainerType, RetrievalPolicy, YardBlock, YardError, YardPlanner,
};

fn size_strategy() -> impl Strategy<Value = ContainerSize> {
    prop_oneof![Just(ContainerSize::TwentyFt), Just(ContainerSize::FortyFt)]
}

fn planner(bays: usize, cells: usize, tiers: usize, capacity: usize) -> YardPlanner {
    let mut yard = YardPlanner::new();
    yard.add_block(YardBlock::new("A", capacity, bays, cells, tiers).unwrap());
    yard.add_block(YardBlock::new("B", capacity, bays, cells, tiers).unwrap());
    yard
}

/// Place every container the yard accepts, returning the stored ids
fn fill(yard: &mut YardPlanner, sizes: &[ContainerSize]) -> Vec<ContainerId> {
    let mut factory = ContainerFactory::new();
    let mut stored = Vec::new();
    for &size in sizes {
        let container = factory.create(ContainerType::Laden, size);
        let id = container.id();
        match yard.place(container) {
            Ok(_) => stored.push(id),
            Err(rejected) => {
                assert!(matches!(rejected.error, YardError::CapacityExhausted { .. }));
                assert_eq!(rejected.container.id(), id);
                assert!(rejected.container.location().is_none());
            }
        }
    }
    stored
}

proptest! {
    #[test]
    fn prop_placement_respects_block_rules(
        sizes in prop::collection::vec(size_strategy(), 0..120),
        bays in 1usize..5,
        cells in 1usize..4,
        tiers in 1usize..4,
        capacity in 1usize..40,
    ) {
        let mut yard = planner(bays, cells, tiers, capacity);
        let stored = fill(&mut yard, &sizes);

        prop_assert_eq!(yard.stored(), stored.len());
        prop_assert_eq!(yard.registry().len(), stored.len());
        for block in yard.blocks() {
            prop_assert!(block.stored() <= block.capacity());
            for bay in 1..=block.physical_bays() {
                for cell in 1..=block.num_cells() {
                    prop_assert!(block.height(bay, cell) <= tiers);
                    if bay % 2 == 0 && block.height(bay, cell) > 0 {
                        // A 40ft stack covers both neighbouring 20ft bays.
                        prop_assert_eq!(block.height(bay - 1, cell), 0);
                        prop_assert_eq!(block.height(bay + 1, cell), 0);
                    }
                    for id in block.containers_at(bay, cell) {
                        let parity = if bay % 2 == 1 { ContainerSize::TwentyFt } else { ContainerSize::FortyFt };
                        prop_assert_eq!(id.size(), parity);
                    }
                }
            }
        }
    }

    #[test]
    fn prop_registry_matches_stack_positions(
        sizes in prop::collection::vec(size_strategy(), 1..60),
    ) {
        let mut yard = planner(3, 3, 3, 50);
        let stored = fill(&mut yard, &sizes);

        for id in stored {
            let location = yard.registry().location(id).unwrap();
            let block = yard.block(&location.block).unwrap();
            let stack = block.containers_at(location.bay, location.cell);
            prop_assert_eq!(stack.get(location.tier - 1), Some(&id));
        }
    }

    #[test]
    fn prop_every_stored_container_can_be_dug_out(
        sizes in prop::collection::vec(size_strategy(), 1..60),
        order in any::<prop::sample::Index>(),
        restore in any::<bool>(),
    ) {
        let policy = if restore { RetrievalPolicy::Restore } else { RetrievalPolicy::LeaveReshuffled };
        let mut yard = YardPlanner::new();
        yard.add_block(YardBlock::new("A", 60, 3, 3, 3).unwrap().with_retrieval_policy(policy));
        let mut stored = fill(&mut yard, &sizes);
        let start = order.index(stored.len().max(1));
        let stored_len = stored.len();
        stored.rotate_left(start.min(stored_len));

        let total = stored.len();
        for (taken, id) in stored.into_iter().enumerate() {
            let container = yard.retrieve(id).unwrap();
            prop_assert_eq!(container.as_ref().map(|c| c.id()), Some(id));
            prop_assert!(container.unwrap().location().is_none());
            prop_assert_eq!(yard.stored(), total - taken - 1);
            prop_assert!(yard.registry().location(id).is_none());
        }
        prop_assert!(yard.registry().is_empty());
    }
}

#[test]
fn test_two_by_one_block_takes_two_per_stack() {
    let mut yard = YardPlanner::new();
    yard.add_block(YardBlock::new("Block1", 10, 2, 1, 2).unwrap());
    let mut factory = ContainerFactory::new();

    let bays: Vec<usize> = (0..4)
        .map(|_| {
            yard.place(factory.create(ContainerType::Laden, ContainerSize::TwentyFt))
                .unwrap()
                .bay
        })
        .collect();
    assert_eq!(bays, vec![1, 1, 3, 3]);

    let rejected = yard
        .place(factory.create(ContainerType::Laden, ContainerSize::TwentyFt))
        .unwrap_err();
    assert_eq!(
        rejected.error,
        YardError::CapacityExhausted {
            scope: "yard".into()
        }
    );

    // Both 20ft bays are in use, so the 40ft bay between them is blocked.
    assert!(yard
        .place(factory.create(ContainerType::Empty, ContainerSize::FortyFt))
        .is_err());
}
