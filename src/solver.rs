//! Fill Solver (spec §4.5): backtracking search that assigns a distinct
//! dictionary word to every slot, honoring intersection letters, with MRV
//! variable selection, forward checking, and a wall-clock deadline.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::cell::Cell;
use crate::dictionary::PatternIndex;
use crate::slots::{extract_slots, neighbor_map, Slot};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolverError {
    #[error("solver exceeded its time budget")]
    SolverTimeout,
    #[error("no complete assignment exists for this grid")]
    NoSolution,
}

/// A completed fill: every slot's assigned word plus the merged letter grid.
pub struct Solution {
    pub grid_letters: HashMap<Cell, char>,
    pub slots: Vec<Slot>,
}

fn pattern_for_slot(slot: &Slot, grid_letters: &HashMap<Cell, char>) -> String {
    slot.cells
        .iter()
        .map(|cell| grid_letters.get(cell).copied().unwrap_or('.'))
        .collect()
}

struct SolverState<'a> {
    slots: Vec<Slot>,
    slot_by_id: HashMap<usize, usize>, // slot_id -> index into `slots`
    neighbors: HashMap<usize, HashSet<usize>>,
    grid_letters: HashMap<Cell, char>,
    assigned: HashMap<usize, String>,
    used_words: HashSet<String>,
    index: &'a PatternIndex,
    rng: &'a mut StdRng,
    deadline: Instant,
}

impl<'a> SolverState<'a> {
    fn slot(&self, slot_id: usize) -> &Slot {
        &self.slots[self.slot_by_id[&slot_id]]
    }

    fn forward_check(&self, slot_id: usize) -> bool {
        let Some(ids) = self.neighbors.get(&slot_id) else {
            return true;
        };
        for &neighbor_id in ids {
            if self.assigned.contains_key(&neighbor_id) {
                continue;
            }
            let neighbor = self.slot(neighbor_id);
            let pattern = pattern_for_slot(neighbor, &self.grid_letters);
            let has_candidate = self
                .index
                .candidates(&pattern)
                .into_iter()
                .any(|word| !self.used_words.contains(&word));
            if !has_candidate {
                return false;
            }
        }
        true
    }

    fn backtrack(&mut self) -> Result<bool, SolverError> {
        if Instant::now() > self.deadline {
            return Err(SolverError::SolverTimeout);
        }
        if self.assigned.len() == self.slots.len() {
            return Ok(true);
        }

        let mut best_slot_id: Option<usize> = None;
        let mut best_candidates: Option<Vec<String>> = None;
        for slot in &self.slots {
            if self.assigned.contains_key(&slot.slot_id) {
                continue;
            }
            let pattern = pattern_for_slot(slot, &self.grid_letters);
            let candidates: Vec<String> = self
                .index
                .candidates(&pattern)
                .into_iter()
                .filter(|word| !self.used_words.contains(word))
                .collect();
            if candidates.is_empty() {
                return Ok(false);
            }
            let better = match &best_candidates {
                None => true,
                Some(current) => candidates.len() < current.len(),
            };
            if better {
                let is_singleton = candidates.len() == 1;
                best_slot_id = Some(slot.slot_id);
                best_candidates = Some(candidates);
                if is_singleton {
                    break;
                }
            }
        }

        let (slot_id, mut candidates) = match (best_slot_id, best_candidates) {
            (Some(id), Some(c)) => (id, c),
            _ => return Ok(false),
        };

        candidates.shuffle(self.rng);

        for word in candidates {
            let slot_cells = self.slot(slot_id).cells.clone();
            let mut delta: HashMap<Cell, char> = HashMap::new();
            let mut conflict = false;
            for (cell, letter) in slot_cells.iter().zip(word.chars()) {
                match self.grid_letters.get(cell) {
                    Some(&existing) if existing != letter => {
                        conflict = true;
                        break;
                    }
                    Some(_) => {}
                    None => {
                        delta.insert(*cell, letter);
                    }
                }
            }
            if conflict {
                continue;
            }

            for (&cell, &letter) in &delta {
                self.grid_letters.insert(cell, letter);
            }
            self.assigned.insert(slot_id, word.clone());
            self.used_words.insert(word.clone());

            if self.forward_check(slot_id) {
                match self.backtrack() {
                    Ok(true) => return Ok(true),
                    Ok(false) => {}
                    Err(e) => return Err(e),
                }
            }

            self.used_words.remove(&word);
            self.assigned.remove(&slot_id);
            for cell in delta.keys() {
                self.grid_letters.remove(cell);
            }
        }

        Ok(false)
    }

    fn reset(&mut self) {
        self.grid_letters.clear();
        self.assigned.clear();
        self.used_words.clear();
    }

    fn seed(&mut self, slot_id: usize, word: &str) {
        let cells = self.slot(slot_id).cells.clone();
        for (cell, letter) in cells.iter().zip(word.chars()) {
            self.grid_letters.insert(*cell, letter);
        }
        self.assigned.insert(slot_id, word.to_string());
        self.used_words.insert(word.to_string());
    }
}

/// Runs the Fill Solver over a `width x height` grid with the given block set,
/// per spec §4.5. When `forced_word` is provided, every returned solution
/// contains it as exactly one slot's answer (seed-slot order is randomized via
/// `rng`).
pub fn solve(
    width: usize,
    height: usize,
    black_cells: &[Cell],
    index: &PatternIndex,
    rng: &mut StdRng,
    time_limit_s: f64,
    forced_word: Option<&str>,
) -> Result<Solution, SolverError> {
    let (slots, cell_to_slots) = extract_slots(width, height, black_cells);
    if slots.is_empty() {
        return Err(SolverError::NoSolution);
    }

    let slot_by_id: HashMap<usize, usize> = slots
        .iter()
        .enumerate()
        .map(|(idx, slot)| (slot.slot_id, idx))
        .collect();
    let neighbors = neighbor_map(&cell_to_slots);
    let deadline = Instant::now() + std::time::Duration::from_secs_f64(time_limit_s.max(0.0));

    let mut state = SolverState {
        slots,
        slot_by_id,
        neighbors,
        grid_letters: HashMap::new(),
        assigned: HashMap::new(),
        used_words: HashSet::new(),
        index,
        rng,
        deadline,
    };

    if let Some(word) = forced_word {
        let mut seed_slot_ids: Vec<usize> = state
            .slots
            .iter()
            .filter(|slot| slot.len() == word.len())
            .map(|slot| slot.slot_id)
            .collect();
        seed_slot_ids.shuffle(state.rng);

        for slot_id in seed_slot_ids {
            state.reset();
            state.seed(slot_id, word);
            match state.backtrack() {
                Ok(true) => {
                    return Ok(Solution {
                        grid_letters: state.grid_letters,
                        slots: state.slots,
                    })
                }
                Ok(false) => continue,
                Err(e) => return Err(e),
            }
        }
        return Err(SolverError::NoSolution);
    }

    match state.backtrack()? {
        true => Ok(Solution {
            grid_letters: state.grid_letters,
            slots: state.slots,
        }),
        false => Err(SolverError::NoSolution),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Every string of length `len` over the alphabet `{A, B}`. For a grid
    /// whose slots are all this length, any letter assignment therefore forms
    /// valid words everywhere; the only remaining constraint is word
    /// distinctness, which is always satisfiable here since 2^len comfortably
    /// exceeds the handful of slots in a mini-crossword grid. This makes the
    /// solver's success provable by construction rather than by hand-picking
    /// a word list and hoping it happens to interlock.
    fn binary_words(len: usize) -> Vec<String> {
        (0u32..(1 << len))
            .map(|mask| {
                (0..len)
                    .map(|bit| if (mask >> bit) & 1 == 1 { 'B' } else { 'A' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn fills_5x5_open_grid_with_valid_words() {
        // S2: a 5x5, empty block set, every slot length 5.
        let dict = binary_words(5);
        let index = PatternIndex::new(&dict, 2, 7).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let result = solve(5, 5, &[], &index, &mut rng, 5.0, None);
        assert!(result.is_ok());
        let solution = result.unwrap();
        assert_eq!(solution.slots.len(), 10);

        // Intersection consistency (property 3) and dictionary membership (5).
        let mut used = HashSet::new();
        for slot in &solution.slots {
            let word: String = slot
                .cells
                .iter()
                .map(|c| solution.grid_letters[c])
                .collect();
            assert!(dict.contains(&word));
            assert!(used.insert(word), "word reused across slots");
        }
    }

    #[test]
    fn forced_word_appears_in_every_solution() {
        let dict = binary_words(5);
        let index = PatternIndex::new(&dict, 2, 7).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let result = solve(5, 5, &[], &index, &mut rng, 5.0, Some("AAAAA"));
        assert!(result.is_ok());
        let solution = result.unwrap();
        let contains_forced = solution.slots.iter().any(|slot| {
            let word: String = slot
                .cells
                .iter()
                .map(|c| solution.grid_letters[c])
                .collect();
            word == "AAAAA"
        });
        assert!(contains_forced);
    }

    #[test]
    fn no_solution_when_dictionary_cannot_cover_grid() {
        let dict = words(&["AB"]);
        let index = PatternIndex::new(&dict, 2, 7).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let result = solve(5, 5, &[], &index, &mut rng, 2.0, None);
        assert_eq!(result.unwrap_err(), SolverError::NoSolution);
    }

    #[test]
    fn immediate_deadline_times_out() {
        let dict = words(&["CAT", "DOG"]);
        let index = PatternIndex::new(&dict, 2, 7).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let result = solve(5, 5, &[], &index, &mut rng, 0.0, None);
        assert!(matches!(
            result,
            Err(SolverError::SolverTimeout) | Err(SolverError::NoSolution)
        ));
    }
}
