//! Slot Extractor (spec §4.2): turns a grid size and block set into the ordered
//! list of across/down slots, their clue numbering, and a cell-to-slot index.

use std::collections::{HashMap, HashSet};

use crate::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub slot_id: usize,
    pub direction: Direction,
    pub number: u32,
    pub cells: Vec<Cell>,
}

impl Slot {
    pub fn len(&self) -> usize {
        self.cells.len()
    }
}

/// `(slot_id, offset_within_slot)` — offset is the cell's index into `Slot::cells`.
pub type SlotRef = (usize, usize);

pub type CellToSlots = HashMap<Cell, Vec<SlotRef>>;

/// Scans cells in row-major order and extracts every maximal across/down run of
/// non-blocked cells with length >= 2, per spec §4.2.
pub fn extract_slots(width: usize, height: usize, black_cells: &[Cell]) -> (Vec<Slot>, CellToSlots) {
    let black_set: HashSet<Cell> = black_cells.iter().copied().collect();
    let mut slots = Vec::new();
    let mut next_number: u32 = 1;
    let mut slot_id = 0usize;

    for row in 0..height {
        for col in 0..width {
            let cell = Cell::new(row, col);
            if black_set.contains(&cell) {
                continue;
            }

            let starts_across = (col == 0 || black_set.contains(&Cell::new(row, col - 1)))
                && (col + 1 < width && !black_set.contains(&Cell::new(row, col + 1)));
            let starts_down = (row == 0 || black_set.contains(&Cell::new(row - 1, col)))
                && (row + 1 < height && !black_set.contains(&Cell::new(row + 1, col)));

            if !starts_across && !starts_down {
                continue;
            }
            let number = next_number;
            next_number += 1;

            if starts_across {
                let mut cells = Vec::new();
                let mut c = col;
                while c < width && !black_set.contains(&Cell::new(row, c)) {
                    cells.push(Cell::new(row, c));
                    c += 1;
                }
                slots.push(Slot {
                    slot_id,
                    direction: Direction::Across,
                    number,
                    cells,
                });
                slot_id += 1;
            }

            if starts_down {
                let mut cells = Vec::new();
                let mut r = row;
                while r < height && !black_set.contains(&Cell::new(r, col)) {
                    cells.push(Cell::new(r, col));
                    r += 1;
                }
                slots.push(Slot {
                    slot_id,
                    direction: Direction::Down,
                    number,
                    cells,
                });
                slot_id += 1;
            }
        }
    }

    let mut cell_to_slots: CellToSlots = HashMap::new();
    for slot in &slots {
        for (offset, &cell) in slot.cells.iter().enumerate() {
            cell_to_slots
                .entry(cell)
                .or_insert_with(Vec::new)
                .push((slot.slot_id, offset));
        }
    }

    (slots, cell_to_slots)
}

/// Derives `neighbors[slot_id]`: the set of other slot ids sharing at least one
/// cell with this slot (spec §4.5 precomputation, §9).
pub fn neighbor_map(cell_to_slots: &CellToSlots) -> HashMap<usize, HashSet<usize>> {
    let mut neighbors: HashMap<usize, HashSet<usize>> = HashMap::new();
    for slot_entries in cell_to_slots.values() {
        let slot_ids: Vec<usize> = slot_entries.iter().map(|&(id, _)| id).collect();
        for &slot_id in &slot_ids {
            let entry = neighbors.entry(slot_id).or_insert_with(HashSet::new);
            entry.extend(slot_ids.iter().copied().filter(|&other| other != slot_id));
        }
    }
    neighbors
}
