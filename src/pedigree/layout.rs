//! Positional addressing of flat ancestor arrays.
//!
//! Every site publishes its pedigree as a flat list of cells. Nodes are
//! addressed as `(generation, position)`: generation 1 holds the parents,
//! generation `g` holds `2^g` nodes, and the sire of `(g, p)` is
//! `(g + 1, 2p)` with the dam at `(g + 1, 2p + 1)`. A layout maps that
//! address to the cell index the site uses.

use crate::types::HorseRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedigreeLayout {
    /// Breadth-first: parents, then grandparents, top to bottom
    LevelOrder { generations: u32 },
    /// Breadth-first starting from the deepest generation
    DeepestFirst { generations: u32 },
    /// Depth-first, sire line before dam line (table rows read top to bottom)
    PreOrder { generations: u32 },
}

impl PedigreeLayout {
    pub const fn generations(&self) -> u32 {
        match *self {
            PedigreeLayout::LevelOrder { generations }
            | PedigreeLayout::DeepestFirst { generations }
            | PedigreeLayout::PreOrder { generations } => generations,
        }
    }

    /// Number of cells a complete pedigree occupies
    pub const fn cell_count(&self) -> usize {
        (1usize << (self.generations() + 1)) - 2
    }

    pub fn name(&self) -> &'static str {
        match self {
            PedigreeLayout::LevelOrder { .. } => "level-order",
            PedigreeLayout::DeepestFirst { .. } => "deepest-first",
            PedigreeLayout::PreOrder { .. } => "pre-order",
        }
    }

    /// Cell index of `(generation, position)`, `None` outside the tree
    pub fn index_of(&self, generation: u32, position: u32) -> Option<usize> {
        let depth = self.generations();
        if generation == 0 || generation > depth || position >= (1 << generation) {
            return None;
        }

        let g = generation as usize;
        let p = position as usize;

        let index = match self {
            PedigreeLayout::LevelOrder { .. } => (1 << g) - 2 + p,
            PedigreeLayout::DeepestFirst { .. } => {
                (1 << (depth as usize + 1)) - (1 << (g + 1)) + p
            }
            PedigreeLayout::PreOrder { .. } => {
                // each dam-side step skips the whole sire subtree below it
                let d = depth as usize;
                let skipped: usize = (1..=g)
                    .filter(|k| (p >> (g - k)) & 1 == 1)
                    .map(|k| (1usize << (d - k + 1)) - 1)
                    .sum();
                skipped + g - 1
            }
        };

        Some(index)
    }

    /// Cell indices of the sire and dam of `(generation, position)`
    pub fn children_of(&self, generation: u32, position: u32) -> Option<(usize, usize)> {
        let sire = self.index_of(generation + 1, position * 2)?;
        let dam = self.index_of(generation + 1, position * 2 + 1)?;
        Some((sire, dam))
    }

    /// Lay out addressed records as a flat array of this layout
    pub fn place(&self, nodes: Vec<((u32, u32), HorseRecord)>) -> Vec<Option<HorseRecord>> {
        let mut cells: Vec<Option<HorseRecord>> = vec![None; self.cell_count()];

        for ((generation, position), horse) in nodes {
            if let Some(index) = self.index_of(generation, position) {
                cells[index] = Some(horse);
            }
        }

        cells
    }
}

/// Parse a `"generation_position"` cell key with a 1-based position
pub fn parse_key(key: &str) -> Option<(u32, u32)> {
    let (generation, position) = key.trim().split_once('_')?;
    let generation: u32 = generation.parse().ok()?;
    let position: u32 = position.parse().ok()?;

    if generation == 0 || position == 0 {
        return None;
    }

    Some((generation, position - 1))
}
