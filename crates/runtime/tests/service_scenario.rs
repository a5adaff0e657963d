//! End-to-end storage scenario through the host-facing service.
mod common;

use std::rc::Rc;

use common::{Harness, RELIC, container, near};
use storage_core::{
    InvalidationEpoch, ItemStack, ItemType, ItemValue, SourceId, StorageConfig, UniqueItemTypes,
};
use storage_runtime::{DroneSource, VehicleSource, WorkstationSource};

const WOOD: i32 = 5;
const STONE: i32 = 6;

/// Crafting session: count, pull across containers, then restock.
///
/// 1. Two containers hold 10 and 5 wood
/// 2. Crafting consumes 12 wood; the first container empties, the second keeps 3
/// 3. A relic chest (non-stackable) appears; the host invalidates storage
/// 4. Crafting consumes two relics, leaving the third
#[test]
fn crafting_session_pulls_across_sources() {
    static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
    let harness = Harness::new(&EPOCH, StorageConfig::default());

    // ================================================================
    // PHASE 1: Count what is reachable
    // ================================================================
    let first = container(1, &[ItemStack::new(WOOD, 10)]);
    let second = container(2, &[ItemStack::new(WOOD, 5), ItemStack::new(STONE, 4)]);
    harness.place(first.clone(), near(2));
    harness.place(second.clone(), near(4));

    let mut service = harness.service();
    assert_eq!(service.item_count(WOOD), 15);
    assert!(service.has_item(STONE));
    assert!(!service.has_item(42));

    // ================================================================
    // PHASE 2: Pull 12 wood
    // ================================================================
    let mut removed = Vec::new();
    let taken = service.remove_remaining(WOOD, 12, false, Some(&mut removed));

    assert_eq!(taken, 12);
    assert!(!first.slots()[0].is_present());
    assert_eq!(second.slots()[0].count(), 3);
    assert_eq!(removed.iter().map(|stack| stack.count).sum::<i32>(), 12);
    assert_eq!(first.dirty().pending(), 1);
    assert_eq!(second.dirty().pending(), 1);
    assert_eq!(service.item_count(WOOD), 3);

    // ================================================================
    // PHASE 3: A new chest appears mid-session
    // ================================================================
    let relics = container(3, &[ItemStack::new(RELIC, 1); 3]);
    harness.place(relics.clone(), near(1));
    assert_eq!(service.item_count(RELIC), 0, "discovery is still cached");

    service.invalidate();
    assert_eq!(service.item_count(RELIC), 3);

    // ================================================================
    // PHASE 4: Non-stackable removal
    // ================================================================
    assert_eq!(service.remove_remaining(RELIC, 2, false, None), 2);
    assert!(!relics.slots()[0].is_present());
    assert!(!relics.slots()[1].is_present());
    assert_eq!(relics.slots()[2].get(), ItemStack::new(RELIC, 1));
    assert_eq!(relics.dirty().take(), 1);

    let summary = service.source_summary();
    assert!(summary.contains("3 sources"), "{summary}");
    assert!(summary.contains("container: 3 sources"), "{summary}");
}

#[test]
fn removal_visits_kinds_in_priority_order() {
    static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
    let harness = Harness::new(&EPOCH, StorageConfig::default());

    let vehicle = Rc::new(VehicleSource::new(SourceId(1), [ItemStack::new(WOOD, 4)]));
    let chest = container(2, &[ItemStack::new(WOOD, 4)]);
    let station = Rc::new(WorkstationSource::with_output(
        SourceId(3),
        2,
        [ItemStack::new(WOOD, 4)],
    ));
    let drone = Rc::new(DroneSource::new(SourceId(4), [ItemStack::new(WOOD, 4)]));
    harness.place(vehicle.clone(), near(1));
    harness.place(chest.clone(), near(1));
    harness.place(station.clone(), near(1));
    harness.place(drone.clone(), near(1));

    let mut service = harness.service();
    let order: Vec<i32> = service
        .all_available_item_stacks(&UniqueItemTypes::single(WOOD).unwrap())
        .iter()
        .map(|stack| stack.count)
        .collect();
    assert_eq!(order, vec![4, 4, 4, 4]);

    assert_eq!(service.remove_remaining(WOOD, 10, false, None), 10);
    assert!(!drone.slots()[0].is_present());
    assert!(!station.output().as_slice()[0].is_present());
    assert_eq!(chest.slots()[0].count(), 2);
    assert_eq!(vehicle.slots()[0].count(), 4);
    assert_eq!(vehicle.dirty().pending(), 0);
}

#[test]
fn modded_variants_survive_when_ignored() {
    static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
    let harness = Harness::new(&EPOCH, StorageConfig::default());

    let modded = ItemStack::from_value(ItemValue::new(RELIC).with_mods(1), 1);
    let chest = container(1, &[modded, ItemStack::new(RELIC, 1)]);
    harness.place(chest.clone(), near(0));

    let mut service = harness.service();
    assert_eq!(service.remove_remaining(RELIC, 2, true, None), 1);
    assert_eq!(chest.slots()[0].get(), modded);
    assert_eq!(service.item_count(RELIC), 1);
}

#[test]
fn wildcard_and_multi_type_filters() {
    static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
    let harness = Harness::new(&EPOCH, StorageConfig::default());
    harness.place(
        container(1, &[ItemStack::new(WOOD, 3), ItemStack::new(STONE, 2), ItemStack::new(7, 1)]),
        near(0),
    );

    let mut service = harness.service();
    let building = UniqueItemTypes::from_types([STONE, WOOD]).unwrap();
    assert_eq!(service.item_count(&building), 5);
    assert_eq!(service.item_count(UniqueItemTypes::wildcard()), 6);
    assert_eq!(service.item_count(ItemType::WILDCARD), 6);
}

#[test]
fn invalid_item_types_match_nothing() {
    static EPOCH: InvalidationEpoch = InvalidationEpoch::new();
    let harness = Harness::new(&EPOCH, StorageConfig::default());
    let chest = container(1, &[ItemStack::new(WOOD, 3)]);
    harness.place(chest.clone(), near(0));

    let mut service = harness.service();
    assert_eq!(service.item_count(0), 0);
    assert!(!service.has_item(-7));
    assert_eq!(service.remove_remaining(ItemType::EMPTY, 3, false, None), 0);
    assert_eq!(service.remove_remaining(WOOD, 0, false, None), 0);
    assert_eq!(chest.slots()[0].count(), 3);
    assert_eq!(chest.dirty().pending(), 0);
}
