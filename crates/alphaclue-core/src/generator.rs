use crate::rng::SimpleRng;
use crate::{Clue, Difficulty, Error, Position, Result, RevealMapping, RevealMappings};
use std::collections::{BTreeMap, BTreeSet};

/// Badge numbers are drawn from `1..=MAX_MAPPING_INDEX`
pub const MAX_MAPPING_INDEX: u32 = 100;

/// Configuration for mapping generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Target difficulty (controls the share of letters linked)
    pub difficulty: Difficulty,
    /// Maximum attempts before reporting the clue set as unsolvable
    pub max_attempts: usize,
    /// Largest linkage group; 3 links triples, 2 links pairs only
    pub group_size: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::easy()
    }
}

impl GeneratorConfig {
    pub fn easy() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            max_attempts: 10,
            group_size: 3,
        }
    }

    pub fn medium() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            ..Self::easy()
        }
    }

    pub fn advanced() -> Self {
        Self {
            difficulty: Difficulty::Advanced,
            ..Self::easy()
        }
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::easy(),
            Difficulty::Medium => Self::medium(),
            Difficulty::Advanced => Self::advanced(),
        }
    }
}

/// A letter cell considered for linking
#[derive(Debug, Clone, Copy)]
struct LetterCell {
    pos: Position,
    letter: char,
}

/// Reveal mapping generator
pub struct MappingGenerator {
    config: GeneratorConfig,
    rng: SimpleRng,
}

impl Default for MappingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingGenerator {
    /// Create a new generator with default configuration
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::with_seed(seed),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GeneratorConfig {
        &mut self.config
    }

    /// Generate a covering mapping for `difficulty`
    pub fn generate(&mut self, clues: &[Clue], difficulty: Difficulty) -> Result<RevealMapping> {
        self.config.difficulty = difficulty;
        self.generate_with_config(clues)
    }

    /// Generate one mapping per difficulty
    pub fn generate_all(&mut self, clues: &[Clue]) -> Result<RevealMappings> {
        let mut mappings = RevealMappings::default();
        for &difficulty in Difficulty::all_levels() {
            mappings.set(difficulty, self.generate(clues, difficulty)?);
        }
        Ok(mappings)
    }

    /// Generate with the current configuration, retrying until every clue is covered
    pub fn generate_with_config(&mut self, clues: &[Clue]) -> Result<RevealMapping> {
        let difficulty = self.config.difficulty;
        for attempt in 1..=self.config.max_attempts {
            match self.try_generate(clues) {
                Some(mapping) if mapping.covers_all(clues) => {
                    log::debug!(
                        "{} mapping found on attempt {} ({} linked letters)",
                        difficulty,
                        attempt,
                        mapping.len()
                    );
                    return Ok(mapping);
                }
                _ => log::debug!("{} mapping attempt {} failed, retrying", difficulty, attempt),
            }
        }

        log::warn!(
            "no covering {} mapping after {} attempts",
            difficulty,
            self.config.max_attempts
        );
        Err(Error::UnsolvableConfiguration {
            difficulty,
            attempts: self.config.max_attempts,
        })
    }

    /// One generation pass. `None` when the badge numbers run out.
    fn try_generate(&mut self, clues: &[Clue]) -> Option<RevealMapping> {
        let cells: Vec<LetterCell> = clues
            .iter()
            .enumerate()
            .flat_map(|(c, clue)| {
                clue.letters()
                    .into_iter()
                    .enumerate()
                    .map(move |(l, letter)| LetterCell {
                        pos: Position::new(c, l),
                        letter,
                    })
            })
            .collect();

        let budget = cells.len() * self.config.difficulty.mapping_percentage() / 100;
        let selected = self.select_cells(clues, &cells, budget);

        // Group by letter; BTreeMap keeps seeded runs reproducible
        let mut by_letter: BTreeMap<char, Vec<Position>> = BTreeMap::new();
        for cell in selected {
            by_letter.entry(cell.letter).or_default().push(cell.pos);
        }

        let mut mapping = RevealMapping::new();
        let mut used = BTreeSet::new();
        for group in by_letter.values_mut() {
            if group.len() < 2 {
                continue;
            }
            self.rng.shuffle(group);

            let mut start = 0;
            for size in chunk_sizes(group.len(), self.config.group_size) {
                let index = self.draw_index(&mut used)?;
                mapping.link_group(&group[start..start + size], index);
                start += size;
            }
        }

        Some(mapping)
    }

    /// Pick the letters to link: one per clue first, then spread the rest of the budget
    /// over clues not yet represented, then backfill.
    fn select_cells(
        &mut self,
        clues: &[Clue],
        cells: &[LetterCell],
        budget: usize,
    ) -> Vec<LetterCell> {
        let mut selected = Vec::with_capacity(budget.max(clues.len()));
        let mut chosen = BTreeSet::new();

        for clue_index in 0..clues.len() {
            let mut own: Vec<LetterCell> = cells
                .iter()
                .filter(|cell| cell.pos.clue == clue_index)
                .copied()
                .collect();
            self.rng.shuffle(&mut own);
            if let Some(&cell) = own.first() {
                chosen.insert(cell.pos);
                selected.push(cell);
            }
        }

        let mut remaining: Vec<LetterCell> = cells
            .iter()
            .filter(|cell| !chosen.contains(&cell.pos))
            .copied()
            .collect();
        self.rng.shuffle(&mut remaining);

        let mut needed = budget.saturating_sub(selected.len());
        let mut represented = BTreeSet::new();
        let mut leftovers = Vec::new();
        for cell in remaining {
            if needed == 0 {
                break;
            }
            if represented.insert(cell.pos.clue) {
                selected.push(cell);
                needed -= 1;
            } else {
                leftovers.push(cell);
            }
        }
        selected.extend(leftovers.into_iter().take(needed));

        selected
    }

    /// Draw an unused badge number, or `None` if all are taken
    fn draw_index(&mut self, used: &mut BTreeSet<u32>) -> Option<u32> {
        if used.len() >= MAX_MAPPING_INDEX as usize {
            return None;
        }
        loop {
            let candidate = self.rng.random_int(1, MAX_MAPPING_INDEX);
            if used.insert(candidate) {
                return Some(candidate);
            }
        }
    }
}

/// Split `n` same-letter cells into linkable chunks of at most `max_size`.
///
/// With triples enabled no chunk of one is ever produced (4 becomes 2+2).
/// In pairs mode an odd cell is left unlinked.
fn chunk_sizes(n: usize, max_size: usize) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut rem = n;
    if max_size < 3 {
        while rem >= 2 {
            sizes.push(2);
            rem -= 2;
        }
        return sizes;
    }
    while rem >= 2 {
        if rem == 4 {
            sizes.extend([2, 2]);
            break;
        }
        if rem >= 3 {
            sizes.push(3);
            rem -= 3;
        } else {
            sizes.push(rem);
            rem = 0;
        }
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClueKind;

    fn clues(answers: &[&str]) -> Vec<Clue> {
        answers
            .iter()
            .enumerate()
            .map(|(i, a)| Clue::new(ClueKind::Contains, (b'A' + i as u8) as char, "", a))
            .collect()
    }

    fn daily_clues() -> Vec<Clue> {
        clues(&[
            "aero", "aback", "waivecharges", "donor", "edible", "spf", "grain",
            "hardshelltaco", "saudi", "abjection", "knockout", "lashout", "inamongst",
            "nena", "oxbowlake", "perk", "etiquette", "roman", "kansas", "sparetires",
            "upbeat", "quiver", "below", "xbox", "rivalry", "zillions",
        ])
    }

    #[test]
    fn test_generate_covers_every_clue() {
        let clues = daily_clues();
        let mut generator = MappingGenerator::with_seed(42);
        for &difficulty in Difficulty::all_levels() {
            let mapping = generator.generate(&clues, difficulty).unwrap();
            assert!(mapping.covers_all(&clues), "{} not covering", difficulty);
        }
    }

    #[test]
    fn test_groups_share_letter_and_index() {
        let clues = daily_clues();
        let mut generator = MappingGenerator::with_seed(7);
        let mapping = generator.generate(&clues, Difficulty::Easy).unwrap();

        let letter = |p: Position| clues[p.clue].letter_at(p.letter).unwrap();
        let mut seen_indices = BTreeSet::new();
        for group in mapping.groups() {
            assert!((2..=3).contains(&group.len()), "group {:?}", group);
            let first = letter(group[0]);
            let index = mapping.group_index(group[0]).unwrap();
            assert!((1..=MAX_MAPPING_INDEX).contains(&index));
            assert!(seen_indices.insert(index), "index {} reused", index);
            for &member in &group {
                assert_eq!(letter(member), first);
                assert_eq!(mapping.group_index(member), Some(index));
            }
        }
    }

    #[test]
    fn test_fewer_links_on_harder_levels() {
        let clues = daily_clues();
        let mut generator = MappingGenerator::with_seed(11);
        let easy = generator.generate(&clues, Difficulty::Easy).unwrap();
        let advanced = generator.generate(&clues, Difficulty::Advanced).unwrap();
        assert!(advanced.len() < easy.len());
    }

    #[test]
    fn test_unsolvable_after_max_attempts() {
        let clues = clues(&["ab", "cd"]);
        let mut generator = MappingGenerator::with_seed(1);
        let err = generator.generate(&clues, Difficulty::Easy).unwrap_err();
        assert_eq!(
            err,
            Error::UnsolvableConfiguration {
                difficulty: Difficulty::Easy,
                attempts: 10
            }
        );
    }

    #[test]
    fn test_pairs_mode() {
        let clues = daily_clues();
        let mut generator = MappingGenerator::with_seed(5);
        generator.config_mut().group_size = 2;
        let mapping = generator.generate(&clues, Difficulty::Easy).unwrap();
        for group in mapping.groups() {
            assert_eq!(group.len(), 2);
        }
    }

    #[test]
    fn test_chunk_sizes() {
        assert_eq!(chunk_sizes(1, 3), Vec::<usize>::new());
        assert_eq!(chunk_sizes(2, 3), vec![2]);
        assert_eq!(chunk_sizes(4, 3), vec![2, 2]);
        assert_eq!(chunk_sizes(5, 3), vec![3, 2]);
        assert_eq!(chunk_sizes(7, 3), vec![3, 2, 2]);
        assert_eq!(chunk_sizes(9, 3), vec![3, 3, 3]);
        assert_eq!(chunk_sizes(5, 2), vec![2, 2]);
    }

    #[test]
    fn test_seeded_generation_reproducible() {
        let clues = daily_clues();
        let a = MappingGenerator::with_seed(3).generate(&clues, Difficulty::Medium).unwrap();
        let b = MappingGenerator::with_seed(3).generate(&clues, Difficulty::Medium).unwrap();
        assert_eq!(a, b);
    }
}
