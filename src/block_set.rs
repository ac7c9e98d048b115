//! BlockSet Validator and BlockSet Enumerator (spec §4.1, §4.3).

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::cell::{border_cells, corners, Cell};
use crate::slots::extract_slots;

pub const MAX_BLOCK_CELLS: usize = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("block set has {0} cells, more than the allowed {MAX_BLOCK_CELLS}")]
    TooManyBlocks(usize),
    #[error("cell {0:?} is not on the border of the grid")]
    NotOnBorder(Cell),
    #[error("blocked component containing {0:?} cannot reach a grid corner")]
    UnreachableComponent(Cell),
    #[error("cell {0:?} is not covered by any slot")]
    SingletonCell(Cell),
}

/// Tests whether `cells` is a structurally legal block set for a `width x height`
/// grid, per spec §4.1. Returns `Ok(())` when legal, the first violated rule
/// otherwise.
pub fn validate_block_set(width: usize, height: usize, cells: &[Cell]) -> Result<(), GridError> {
    if cells.len() > MAX_BLOCK_CELLS {
        return Err(GridError::TooManyBlocks(cells.len()));
    }

    let black_set: HashSet<Cell> = cells.iter().copied().collect();
    for &cell in &black_set {
        if !cell.is_border(width, height) {
            return Err(GridError::NotOnBorder(cell));
        }
    }

    if black_set.is_empty() {
        return Ok(());
    }

    let corner_set = corners(width, height);
    let mut visited: HashSet<Cell> = HashSet::new();

    for &start in &black_set {
        if visited.contains(&start) {
            continue;
        }
        let mut stack = vec![start];
        let mut component: HashSet<Cell> = HashSet::new();
        while let Some(cell) = stack.pop() {
            if visited.contains(&cell) {
                continue;
            }
            visited.insert(cell);
            component.insert(cell);
            for neighbor in cell.border_neighbors(width, height) {
                if black_set.contains(&neighbor) && !visited.contains(&neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        let component_corners: HashSet<Cell> =
            component.intersection(&corner_set).copied().collect();
        for &cell in &component {
            let valid = cell.valid_corners(width, height);
            if valid.is_disjoint(&component_corners) {
                return Err(GridError::UnreachableComponent(cell));
            }
        }
    }

    validate_no_singletons(width, height, &black_set)?;
    Ok(())
}

fn validate_no_singletons(
    width: usize,
    height: usize,
    black_set: &HashSet<Cell>,
) -> Result<(), GridError> {
    let cells: Vec<Cell> = black_set.iter().copied().collect();
    let (_slots, cell_to_slots) = extract_slots(width, height, &cells);
    for row in 0..height {
        for col in 0..width {
            let cell = Cell::new(row, col);
            if black_set.contains(&cell) {
                continue;
            }
            if !cell_to_slots.contains_key(&cell) {
                return Err(GridError::SingletonCell(cell));
            }
        }
    }
    Ok(())
}

/// Enumerates (and caches per process lifetime) all legal block sets of size
/// `0..=4` for a given grid size, per spec §4.3.
#[derive(Default)]
pub struct BlockSetEnumerator {
    cache: HashMap<(usize, usize), Vec<Vec<Cell>>>,
}

impl BlockSetEnumerator {
    pub fn new() -> Self {
        BlockSetEnumerator {
            cache: HashMap::new(),
        }
    }

    /// Legal block sets for `(width, height)`, computing and caching on first use.
    pub fn legal_block_sets(&mut self, width: usize, height: usize) -> &[Vec<Cell>] {
        self.cache
            .entry((width, height))
            .or_insert_with(|| enumerate_legal_block_sets(width, height))
    }
}

fn enumerate_legal_block_sets(width: usize, height: usize) -> Vec<Vec<Cell>> {
    let border = border_cells(width, height);
    let mut valid = Vec::new();
    for count in 0..=MAX_BLOCK_CELLS {
        for combo in combinations(&border, count) {
            if validate_block_set(width, height, &combo).is_ok() {
                valid.push(combo);
            }
        }
    }
    valid
}

/// All `k`-element subsets of `items`, as owned `Vec<Cell>`s, in lexicographic
/// index order.
fn combinations(items: &[Cell], k: usize) -> Vec<Vec<Cell>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if k > items.len() {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i]).collect());

        let mut i = k;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            if indices[i] != i + items.len() - k {
                break;
            }
            if i == 0 {
                return result;
            }
        }
        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_legal() {
        assert_eq!(validate_block_set(6, 6, &[]), Ok(()));
    }

    #[test]
    fn single_corner_adjacent_cell_is_legal() {
        assert_eq!(validate_block_set(6, 6, &[Cell::new(0, 0)]), Ok(()));
    }

    #[test]
    fn unreachable_chain_is_illegal() {
        // S4: {(0,0),(0,2)} is illegal: (0,2) is not border-adjacent to (0,0), so
        // it forms its own singleton component that can't reach a corner.
        let result = validate_block_set(6, 6, &[Cell::new(0, 0), Cell::new(0, 2)]);
        assert!(matches!(result, Err(GridError::UnreachableComponent(_))));
    }

    #[test]
    fn adjacent_chain_anchored_to_corner_is_legal() {
        // S4: {(0,0),(0,1)} is legal.
        assert_eq!(
            validate_block_set(6, 6, &[Cell::new(0, 0), Cell::new(0, 1)]),
            Ok(())
        );
    }

    #[test]
    fn too_many_blocks_is_illegal() {
        let cells = vec![
            Cell::new(0, 0),
            Cell::new(0, 1),
            Cell::new(0, 2),
            Cell::new(0, 3),
            Cell::new(0, 4),
        ];
        assert_eq!(
            validate_block_set(6, 6, &cells),
            Err(GridError::TooManyBlocks(5))
        );
    }

    #[test]
    fn interior_cell_is_rejected() {
        assert_eq!(
            validate_block_set(6, 6, &[Cell::new(2, 2)]),
            Err(GridError::NotOnBorder(Cell::new(2, 2)))
        );
    }

    #[test]
    fn enumerator_caches_and_contains_empty_set() {
        let mut enumerator = BlockSetEnumerator::new();
        let sets = enumerator.legal_block_sets(5, 5).to_vec();
        assert!(sets.iter().any(|s| s.is_empty()));
        assert!(sets.iter().all(|s| validate_block_set(5, 5, s).is_ok()));
    }

    #[test]
    fn combinations_of_three_choose_two() {
        let items = vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)];
        let combos = combinations(&items, 2);
        assert_eq!(combos.len(), 3);
    }
}
