use arclune_core::{CellCoord, GridLayout, Side, Slot, ZoneCode};
use arclune_system_zone_index::ZoneIndex;
use proptest::prelude::*;

fn in_zone_cell(side: Side) -> impl Strategy<Value = CellCoord> {
    let layout = GridLayout::default();
    let columns = match side {
        Side::Ally => 0..layout.ally_cols,
        Side::Enemy => layout.enemy_start()..layout.grid_cols,
    };
    (columns, 0..3u32).prop_map(|(column, row)| CellCoord::new(column, row))
}

fn any_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Ally), Just(Side::Enemy)]
}

proptest! {
    #[test]
    fn slot_to_cell_inverts_slot_index(
        (side, cell) in any_side().prop_flat_map(|side| (Just(side), in_zone_cell(side)))
    ) {
        let index = ZoneIndex::default();
        let slot = index.slot_index(side, cell);
        prop_assert_eq!(index.slot_to_cell(side, slot), cell);
    }

    #[test]
    fn in_zone_slots_stay_within_range(
        (side, cell) in any_side().prop_flat_map(|side| (Just(side), in_zone_cell(side)))
    ) {
        let slot = ZoneIndex::default().slot_index(side, cell);
        prop_assert!((1..=9).contains(&slot));
    }

    #[test]
    fn any_slot_decodes_to_a_cell_in_its_own_zone(side in any_side(), slot in -20i32..40) {
        let index = ZoneIndex::default();
        let cell = index.slot_to_cell(side, slot);
        prop_assert_eq!(index.side_of(cell), Some(side));
    }

    #[test]
    fn zone_code_text_parses_back(
        (side, cell) in any_side().prop_flat_map(|side| (Just(side), in_zone_cell(side)))
    ) {
        let code = ZoneIndex::default().zone_code(side, cell);
        let parsed: ZoneCode = code.to_string().parse().expect("generated codes parse");
        prop_assert_eq!(parsed, code);
        prop_assert_eq!(ZoneCode::from_packed(code.packed()).expect("packed decodes"), code);
    }
}

#[test]
fn every_zone_cell_receives_a_distinct_slot() {
    let index = ZoneIndex::default();
    for side in Side::ALL {
        let mut slots: Vec<u8> = index
            .cells_in_slot_order(side)
            .map(|(slot, cell)| {
                assert_eq!(index.slot_of(side, cell), Some(slot));
                slot.get()
            })
            .collect();
        slots.dedup();
        assert_eq!(slots, (1..=9).collect::<Vec<_>>());
    }
}

#[test]
fn slot_one_cells_face_each_other_across_the_midline() {
    let index = ZoneIndex::default();
    let ally = index.slot_to_cell(Side::Ally, 1);
    let enemy = index.slot_to_cell(Side::Enemy, 1);
    assert_eq!(ally, CellCoord::new(2, 0));
    assert_eq!(enemy, CellCoord::new(4, 2));
    assert_eq!(enemy.column() - ally.column(), 2);
}

#[test]
fn interleaved_order_alternates_sides() {
    let order: Vec<String> = ZoneIndex::default()
        .interleaved_turn_order()
        .take(6)
        .map(|(side, slot)| ZoneCode::new(side, i32::from(slot.get())).to_string())
        .collect();
    assert_eq!(order, ["A1", "E1", "A2", "E2", "A3", "E3"]);
    assert_eq!(ZoneIndex::default().interleaved_turn_order().count(), 18);
}

#[test]
fn summon_resolution_skips_occupied_slots() {
    let index = ZoneIndex::default();
    let pattern = [Slot::FIRST, Slot::new(2).expect("slot"), Slot::new(5).expect("slot")];
    let taken = [CellCoord::new(2, 0), CellCoord::new(2, 1)];

    let cell = index.resolve_summon_cell(Side::Ally, &pattern, |cell| taken.contains(&cell));

    assert_eq!(cell, Some(CellCoord::new(1, 1)));
}

#[test]
fn summon_resolution_reports_full_pattern() {
    let index = ZoneIndex::default();
    let pattern = [Slot::FIRST];

    assert_eq!(index.resolve_summon_cell(Side::Enemy, &pattern, |_| true), None);
}

#[test]
fn summon_resolution_ignores_slots_beyond_narrow_zone() {
    let index = ZoneIndex::new(GridLayout::new(1, 3, 7));
    let pattern = [Slot::new(7).expect("slot"), Slot::new(2).expect("slot")];

    let cell = index.resolve_summon_cell(Side::Ally, &pattern, |_| false);

    assert_eq!(cell, Some(CellCoord::new(0, 1)));
}
