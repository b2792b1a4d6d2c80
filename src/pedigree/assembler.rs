//! Ancestor tree assembly.

use tracing::{debug, warn};

use super::PedigreeLayout;
use crate::error::ScrapeError;
use crate::sites::SiteConfig;
use crate::types::{HorseRecord, Sex};

/// The assembled parents of one horse
#[derive(Debug, Default)]
pub struct Ancestors {
    pub sire: Option<HorseRecord>,
    pub dam: Option<HorseRecord>,
    /// Set when the cells did not fit the site's pedigree shape
    pub violation: Option<ScrapeError>,
}

impl Ancestors {
    /// Hang the assembled tree under `horse`
    pub fn attach_to(self, horse: &mut HorseRecord) {
        horse.sire = self.sire.map(Box::new);
        horse.dam = self.dam.map(Box::new);
    }
}

/// Builds ancestor trees for horses of one site
pub struct PedigreeAssembler<'a> {
    site: &'a SiteConfig,
    link: &'a str,
    splices: Vec<((u32, u32), Vec<HorseRecord>)>,
}

impl<'a> PedigreeAssembler<'a> {
    /// `link` identifies the subject horse in diagnostics
    pub fn new(site: &'a SiteConfig, link: &'a str) -> Self {
        Self {
            site,
            link,
            splices: Vec::new(),
        }
    }

    /// Attach a produce listing to the dam at `(generation, position)`
    pub fn splice_offspring(mut self, slot: (u32, u32), offspring: Vec<HorseRecord>) -> Self {
        self.splices.push((slot, offspring));
        self
    }

    /// Assemble the tree from a flat cell array in the site's layout.
    ///
    /// Cells without a link count as empty. A mismatching array length is
    /// logged and the cells are padded or truncated to the expected shape, so
    /// whatever fits is still assembled.
    pub fn assemble(self, cells: Vec<Option<HorseRecord>>) -> Ancestors {
        let layout: PedigreeLayout = self.site.pedigree;
        let expected = layout.cell_count();

        let violation = if cells.len() != expected {
            warn!(
                "Pedigree of {} on {} has {} cells, expected {}",
                self.link,
                self.site.id,
                cells.len(),
                expected
            );
            Some(ScrapeError::PedigreeShape {
                site: self.site.id.to_string(),
                link: self.link.to_string(),
                expected,
                found: cells.len(),
            })
        } else {
            None
        };

        let mut cells: Vec<Option<HorseRecord>> = cells
            .into_iter()
            .map(|cell| cell.filter(|horse| horse.link.is_some()))
            .collect();
        cells.resize(expected, None);

        for ((generation, position), offspring) in self.splices {
            match layout
                .index_of(generation, position)
                .and_then(|index| cells[index].as_mut())
            {
                Some(dam) => dam.offspring = offspring,
                None => debug!(
                    "No ancestor at ({}, {}) for {} offspring of {}",
                    generation,
                    position,
                    offspring.len(),
                    self.link
                ),
            }
        }

        // children are complete before their parent takes them
        for generation in (1..layout.generations()).rev() {
            for position in 0..(1u32 << generation) {
                let (Some(index), Some((sire_index, dam_index))) = (
                    layout.index_of(generation, position),
                    layout.children_of(generation, position),
                ) else {
                    continue;
                };

                if cells[index].is_none() {
                    continue;
                }

                let sire = cells[sire_index].take().map(as_sire);
                let dam = cells[dam_index].take().map(as_dam);

                if let Some(node) = cells[index].as_mut() {
                    node.sire = sire.map(Box::new);
                    node.dam = dam.map(Box::new);
                }
            }
        }

        let take = |cells: &mut Vec<Option<HorseRecord>>, position: u32| {
            layout
                .index_of(1, position)
                .and_then(|index| cells[index].take())
        };

        Ancestors {
            sire: take(&mut cells, 0).map(as_sire),
            dam: take(&mut cells, 1).map(as_dam),
            violation,
        }
    }
}

fn as_sire(mut horse: HorseRecord) -> HorseRecord {
    horse.sex = Some(Sex::Horse);
    horse
}

fn as_dam(mut horse: HorseRecord) -> HorseRecord {
    horse.sex = Some(Sex::Mare);
    horse
}
