//! Plain-text reports printed by the CLI.

use arclune_core::{CellCoord, FuryConfig, GRID_ROWS};
use arclune_system_fury::{FuryEngine, FuryState};
use arclune_system_zone_index::ZoneIndex;

const NEUTRAL_CELL: &str = "--";

/// Renders the board one row per line, each cell showing its zone code.
pub(crate) fn render_zones(index: &ZoneIndex, numeric: bool) -> String {
    (0..GRID_ROWS)
        .map(|row| {
            let cells: Vec<String> = (0..index.layout().grid_cols)
                .map(|column| render_cell(index, CellCoord::new(column, row), numeric))
                .collect();
            format!("{}\n", cells.join(" "))
        })
        .collect()
}

fn render_cell(index: &ZoneIndex, cell: CellCoord, numeric: bool) -> String {
    match index.side_of(cell) {
        Some(side) => {
            let code = index.zone_code(side, cell);
            if numeric {
                format!("{:>2}", code.packed())
            } else {
                code.to_string()
            }
        }
        None => NEUTRAL_CELL.to_owned(),
    }
}

/// Renders the fury tuning a unit would receive.
pub(crate) fn render_fury(engine: &FuryEngine, unit_id: &str) -> String {
    let config: &FuryConfig = engine.config();
    let fury_max = engine.resolve_max_fury(unit_id);
    let unit = FuryState::new(fury_max, 0);
    let lines = [
        format!("unit:      {unit_id}"),
        format!("fury max:  {fury_max}"),
        format!("turn cap:  {}", config.turn_cap()),
        format!("skill cap: {}", config.skill_cap()),
        format!("hit cap:   {}", config.hit_cap()),
        format!("ult cost:  {}", engine.resolve_ult_cost(Some(&unit), unit_id)),
    ];
    lines.map(|line| line + "\n").concat()
}
