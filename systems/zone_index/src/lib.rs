#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure coordinate system mapping board cells to side-relative slots.
//!
//! Slots number each zone from the midline outward: the column nearest the
//! neutral band holds slots 1-3, the next column 4-6 and the back column 7-9.
//! Within a column the ally side counts rows top to bottom while the enemy
//! side counts bottom to top, so the two slot-1 cells face each other across
//! the board.

use arclune_core::{CellCoord, GridLayout, Side, Slot, ZoneCode, GRID_ROWS};

const ROWS: i64 = GRID_ROWS as i64;

/// Bidirectional mapping between board cells and turn slots.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZoneIndex {
    layout: GridLayout,
}

impl ZoneIndex {
    /// Creates an index over the provided board layout.
    #[must_use]
    pub const fn new(layout: GridLayout) -> Self {
        Self { layout }
    }

    /// Board layout backing the index.
    #[must_use]
    pub const fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Converts a cell into its side-relative slot.
    ///
    /// Cells inside `side`'s zone yield `1..=9`. Cells outside it are not
    /// rejected; they produce the raw arithmetic result, which carries no
    /// gameplay meaning.
    #[must_use]
    pub fn slot_index(&self, side: Side, cell: CellCoord) -> i32 {
        let cx = i64::from(cell.column());
        let cy = i64::from(cell.row());
        let slot = match side {
            Side::Ally => (i64::from(self.layout.ally_cols) - 1 - cx) * ROWS + (cy + 1),
            Side::Enemy => {
                let col_index = cx - i64::from(self.layout.enemy_start());
                col_index * ROWS + (ROWS - cy)
            }
        };
        saturate(slot)
    }

    /// Converts a slot back into the cell it names on `side`.
    ///
    /// The slot is clamped into the side's valid range before decoding, so
    /// out-of-range input silently lands on the nearest valid slot.
    #[must_use]
    pub fn slot_to_cell(&self, side: Side, slot: i32) -> CellCoord {
        let slot = Slot::clamped(slot.min(i32::from(self.capacity(side))));
        let col_index = slot.column_index();
        let row_index = slot.row_index();
        match side {
            Side::Ally => CellCoord::new(
                self.layout.ally_cols.saturating_sub(1 + col_index),
                row_index,
            ),
            Side::Enemy => CellCoord::new(
                self.layout.enemy_start() + col_index,
                GRID_ROWS - 1 - row_index,
            ),
        }
    }

    /// Formats the slot of `cell` as a zone code such as `A5`.
    #[must_use]
    pub fn zone_code(&self, side: Side, cell: CellCoord) -> ZoneCode {
        ZoneCode::new(side, self.slot_index(side, cell))
    }

    /// Checked variant of [`Self::slot_index`] returning `None` for cells
    /// outside `side`'s zone.
    #[must_use]
    pub fn slot_of(&self, side: Side, cell: CellCoord) -> Option<Slot> {
        if self.side_of(cell) != Some(side) {
            return None;
        }
        u8::try_from(self.slot_index(side, cell))
            .ok()
            .and_then(Slot::new)
    }

    /// Reports which zone owns `cell`, if any. Neutral columns and rows
    /// beyond the board belong to neither side.
    #[must_use]
    pub fn side_of(&self, cell: CellCoord) -> Option<Side> {
        if cell.row() >= GRID_ROWS || cell.column() >= self.layout.grid_cols {
            return None;
        }
        if cell.column() < self.layout.ally_cols {
            Some(Side::Ally)
        } else if cell.column() >= self.layout.enemy_start() {
            Some(Side::Enemy)
        } else {
            None
        }
    }

    /// Number of slots available to `side`.
    #[must_use]
    pub fn capacity(&self, side: Side) -> u8 {
        let slots = self.layout.columns(side).min(GRID_ROWS) * GRID_ROWS;
        u8::try_from(slots).unwrap_or(u8::MAX)
    }

    /// Cells of `side`'s zone in ascending slot order.
    pub fn cells_in_slot_order(
        &self,
        side: Side,
    ) -> impl Iterator<Item = (Slot, CellCoord)> + '_ {
        let capacity = self.capacity(side);
        Slot::all()
            .take_while(move |slot| slot.get() <= capacity)
            .map(move |slot| (slot, self.slot_to_cell(side, i32::from(slot.get()))))
    }

    /// Turn order alternating sides slot by slot: ally 1, enemy 1, ally 2, ...
    pub fn interleaved_turn_order(&self) -> impl Iterator<Item = (Side, Slot)> + '_ {
        Slot::all().flat_map(move |slot| {
            Side::ALL
                .into_iter()
                .filter(move |side| slot.get() <= self.capacity(*side))
                .map(move |side| (side, slot))
        })
    }

    /// Walks `pattern` and returns the first cell that is not occupied.
    ///
    /// Slots beyond the side's capacity are skipped. Returns `None` when every
    /// listed slot is taken.
    pub fn resolve_summon_cell(
        &self,
        side: Side,
        pattern: &[Slot],
        mut is_occupied: impl FnMut(CellCoord) -> bool,
    ) -> Option<CellCoord> {
        let capacity = self.capacity(side);
        pattern
            .iter()
            .filter(|slot| slot.get() <= capacity)
            .map(|slot| self.slot_to_cell(side, i32::from(slot.get())))
            .find(|cell| !is_occupied(*cell))
    }
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ZoneIndex {
        ZoneIndex::default()
    }

    #[test]
    fn ally_front_top_cell_is_slot_one() {
        assert_eq!(index().slot_index(Side::Ally, CellCoord::new(2, 0)), 1);
        assert_eq!(index().slot_index(Side::Ally, CellCoord::new(0, 2)), 9);
    }

    #[test]
    fn enemy_front_bottom_cell_is_slot_one() {
        assert_eq!(index().slot_index(Side::Enemy, CellCoord::new(4, 2)), 1);
        assert_eq!(index().slot_index(Side::Enemy, CellCoord::new(4, 0)), 3);
        assert_eq!(index().slot_index(Side::Enemy, CellCoord::new(6, 0)), 9);
    }

    #[test]
    fn out_of_zone_cells_produce_raw_values() {
        assert_eq!(index().slot_index(Side::Ally, CellCoord::new(5, 0)), -8);
        assert!(index().slot_of(Side::Ally, CellCoord::new(5, 0)).is_none());
        assert!(index().slot_of(Side::Enemy, CellCoord::new(3, 1)).is_none());
    }

    #[test]
    fn extreme_coordinates_saturate_instead_of_overflowing() {
        assert_eq!(
            index().slot_index(Side::Ally, CellCoord::new(u32::MAX, 0)),
            i32::MIN
        );
        assert_eq!(
            index().slot_index(Side::Enemy, CellCoord::new(u32::MAX, 0)),
            i32::MAX
        );
        assert_eq!(
            index().slot_index(Side::Ally, CellCoord::new(0, u32::MAX)),
            i32::MAX
        );

        let code = index().zone_code(Side::Enemy, CellCoord::new(u32::MAX, u32::MAX));
        assert_eq!(code.side(), Side::Enemy);
        assert_eq!(code.packed(), i32::MAX);
    }

    #[test]
    fn slot_to_cell_clamps_invalid_slots() {
        assert_eq!(index().slot_to_cell(Side::Ally, 0), CellCoord::new(2, 0));
        assert_eq!(index().slot_to_cell(Side::Ally, 99), CellCoord::new(0, 2));
        assert_eq!(index().slot_to_cell(Side::Enemy, -3), CellCoord::new(4, 2));
    }

    #[test]
    fn zone_codes_render_both_forms() {
        let code = index().zone_code(Side::Ally, CellCoord::new(1, 1));
        assert_eq!(code.to_string(), "A5");
        assert_eq!(code.packed(), 5);

        let enemy = index().zone_code(Side::Enemy, CellCoord::new(5, 1));
        assert_eq!(enemy.to_string(), "E5");
        assert_eq!(enemy.packed(), 21);
    }

    #[test]
    fn neutral_column_belongs_to_no_side() {
        assert_eq!(index().side_of(CellCoord::new(3, 1)), None);
        assert_eq!(index().side_of(CellCoord::new(0, 1)), Some(Side::Ally));
        assert_eq!(index().side_of(CellCoord::new(6, 2)), Some(Side::Enemy));
        assert_eq!(index().side_of(CellCoord::new(6, 3)), None);
        assert_eq!(index().side_of(CellCoord::new(7, 0)), None);
    }

    #[test]
    fn narrow_zone_limits_capacity() {
        let narrow = ZoneIndex::new(GridLayout::new(2, 3, 7));
        assert_eq!(narrow.capacity(Side::Ally), 6);
        assert_eq!(narrow.slot_to_cell(Side::Ally, 9), CellCoord::new(0, 2));
        assert_eq!(narrow.cells_in_slot_order(Side::Ally).count(), 6);
    }
}
