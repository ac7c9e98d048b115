//! Puzzle Assembler (spec §4.6), Canonicalizer/Hash (spec §4.7), and the public
//! `generate`/`generate_with_retry` entry points.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::block_set::BlockSetEnumerator;
use crate::cell::Cell;
use crate::config::GeneratorConfig;
use crate::dictionary::PatternIndex;
use crate::slots::{Direction, Slot};
use crate::solver::{solve, SolverError};

/// Errors `generate`/`generate_with_retry` can surface directly. Timeouts and
/// exhausted searches are recoverable per spec §7 (they collapse into a
/// nullary "no puzzle this attempt" `Ok(None)`); this enum is reserved for the
/// defensive conditions that are never supposed to happen at all.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("no legal block sets exist for the chosen grid size")]
    NoLegalBlockSets,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub number: u32,
    pub cells: Vec<(usize, usize)>,
    pub answer: String,
    pub clue: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entries {
    pub across: Vec<Entry>,
    pub down: Vec<Entry>,
}

/// The output puzzle record (spec §3, §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub id: String,
    pub date: String,
    pub width: usize,
    pub height: usize,
    pub black_cells: Vec<(usize, usize)>,
    pub grid_solution: Vec<Vec<Option<char>>>,
    pub entries: Entries,
    pub hash_hex: String,
}

impl Puzzle {
    /// `gridPreview`: one string per row, `-` for blocked cells, the letter
    /// otherwise.
    pub fn grid_preview(&self) -> Vec<String> {
        self.grid_solution
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.unwrap_or('-'))
                    .collect::<String>()
            })
            .collect()
    }
}

/// Deterministic byte serialization of `(width, height, black_cells,
/// grid_solution)`, per spec §4.7. The exact format is load-bearing for
/// cross-implementation hash compatibility and must not change.
pub fn canonical_bytes(
    width: usize,
    height: usize,
    black_cells: &[(usize, usize)],
    grid_solution: &[Vec<Option<char>>],
) -> Vec<u8> {
    let mut sorted_black: Vec<(usize, usize)> = black_cells.to_vec();
    sorted_black.sort_unstable();

    let black_part = sorted_black
        .iter()
        .map(|(r, c)| format!("{r},{c}"))
        .collect::<Vec<_>>()
        .join(";");

    let black_set: std::collections::HashSet<(usize, usize)> = sorted_black.into_iter().collect();

    let mut rows = Vec::with_capacity(height);
    for row in 0..height {
        let mut line = String::with_capacity(width);
        for col in 0..width {
            if black_set.contains(&(row, col)) {
                line.push('#');
            } else {
                line.push(grid_solution[row][col].unwrap_or('?'));
            }
        }
        rows.push(line);
    }

    let canonical = format!("{width}x{height}|{black_part}|{}", rows.join("/"));
    canonical.into_bytes()
}

/// SHA-256 hex digest of the canonical byte serialization.
pub fn puzzle_hash(
    width: usize,
    height: usize,
    black_cells: &[(usize, usize)],
    grid_solution: &[Vec<Option<char>>],
) -> String {
    let bytes = canonical_bytes(width, height, black_cells, grid_solution);
    let digest = Sha256::digest(&bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn puzzle_id(hash_hex: &str) -> String {
    format!("mcw_v1_{}", &hash_hex[..16])
}

fn build_solution_grid(
    width: usize,
    height: usize,
    black_cells: &[Cell],
    letters: &HashMap<Cell, char>,
) -> Vec<Vec<Option<char>>> {
    let black_set: std::collections::HashSet<Cell> = black_cells.iter().copied().collect();
    (0..height)
        .map(|row| {
            (0..width)
                .map(|col| {
                    let cell = Cell::new(row, col);
                    if black_set.contains(&cell) {
                        None
                    } else {
                        letters.get(&cell).copied()
                    }
                })
                .collect()
        })
        .collect()
}

fn build_entries(slots: &[Slot], letters: &HashMap<Cell, char>) -> Entries {
    let mut across = Vec::new();
    let mut down = Vec::new();

    for slot in slots {
        let answer: String = slot.cells.iter().map(|c| letters[c]).collect();
        let entry = Entry {
            number: slot.number,
            cells: slot.cells.iter().map(|c| (c.row, c.col)).collect(),
            answer,
            clue: String::new(),
        };
        match slot.direction {
            Direction::Across => across.push(entry),
            Direction::Down => down.push(entry),
        }
    }

    // Across/down pairs sharing a number have no secondary sort key in the
    // source; break the tie with across before down to keep output stable.
    across.sort_by_key(|e| e.number);
    down.sort_by_key(|e| e.number);

    Entries { across, down }
}

/// Attempts to generate one puzzle (spec §4.6, §7). Returns `Ok(None)` for the
/// recoverable "no puzzle this attempt" outcomes (timeout, no solution, no
/// legal block sets for the chosen size) and `Err` only for a defensive,
/// should-not-happen condition.
pub fn generate(
    index: &PatternIndex,
    enumerator: &mut BlockSetEnumerator,
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> Result<Option<Puzzle>, GeneratorError> {
    let (width, height) = *config
        .grid_sizes
        .choose(rng)
        .expect("GeneratorConfig::grid_sizes must be non-empty");
    debug!(width, height, "selected grid size");

    let candidates = enumerator.legal_block_sets(width, height);
    if candidates.is_empty() {
        warn!(width, height, "no legal block sets for this size");
        return Err(GeneratorError::NoLegalBlockSets);
    }
    let black_cells = candidates
        .choose(rng)
        .expect("candidates is non-empty")
        .clone();
    debug!(?black_cells, "selected block set");

    let solved = match solve(
        width,
        height,
        &black_cells,
        index,
        rng,
        config.time_limit_s,
        config.forced_word.as_deref(),
    ) {
        Ok(solution) => solution,
        Err(SolverError::SolverTimeout) => {
            warn!("solver timed out for this attempt");
            return Ok(None);
        }
        Err(SolverError::NoSolution) => {
            debug!("solver found no solution for this attempt");
            return Ok(None);
        }
    };

    let grid_solution = build_solution_grid(width, height, &black_cells, &solved.grid_letters);
    let entries = build_entries(&solved.slots, &solved.grid_letters);

    let black_cells_pairs: Vec<(usize, usize)> =
        black_cells.iter().map(|c| (c.row, c.col)).collect();
    let hash_hex = puzzle_hash(width, height, &black_cells_pairs, &grid_solution);
    let id = puzzle_id(&hash_hex);

    info!(id = %id, width, height, "generated puzzle");

    Ok(Some(Puzzle {
        id,
        date: String::new(),
        width,
        height,
        black_cells: black_cells_pairs,
        grid_solution,
        entries,
        hash_hex,
    }))
}

/// Retries `generate` up to `config.max_attempts` times, stopping at the first
/// success. This is an ambient convenience layered over the single-attempt
/// operation mandated by spec §6; it introduces no new solving semantics.
pub fn generate_with_retry(
    index: &PatternIndex,
    enumerator: &mut BlockSetEnumerator,
    config: &GeneratorConfig,
    rng: &mut StdRng,
) -> Result<Option<Puzzle>, GeneratorError> {
    for attempt in 1..=config.max_attempts {
        if let Some(puzzle) = generate(index, enumerator, config, rng)? {
            return Ok(Some(puzzle));
        }
        debug!(attempt, max_attempts = config.max_attempts, "attempt failed, retrying");
    }
    warn!(max_attempts = config.max_attempts, "exhausted all attempts");
    Ok(None)
}
