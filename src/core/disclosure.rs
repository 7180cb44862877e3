/// Progressive disclosure: which budget-hidden sections the user revealed.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::core::style::ResolvedSection;
use crate::schema::section::SectionId;

/// A "continue reading" prompt for a hidden section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proposal {
    pub id: SectionId,
    pub teaser: String,
}

/// Session-scoped set of revealed section ids. Append-only: there is no
/// way to hide a section again.
#[derive(Debug, Clone, Default)]
pub struct DisclosureController {
    expanded: FxHashSet<SectionId>,
}

impl DisclosureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as revealed. Returns true if it was not revealed before.
    pub fn reveal(&mut self, id: &SectionId) -> bool {
        self.expanded.insert(id.clone())
    }

    pub fn is_expanded(&self, id: &SectionId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    /// Entries that are within budget or revealed, in allocated order.
    pub fn visible_sections<'a>(
        &self,
        allocated: &'a [ResolvedSection],
    ) -> Vec<&'a ResolvedSection> {
        allocated
            .iter()
            .filter(|entry| self.is_visible(entry))
            .collect()
    }

    pub fn is_visible(&self, entry: &ResolvedSection) -> bool {
        !entry.hidden || self.is_expanded(entry.id())
    }

    /// Up to `limit` prompts for hidden, unrevealed entries, in allocated order.
    ///
    /// The teaser falls back to the resolved display title.
    pub fn proposals(&self, allocated: &[ResolvedSection], limit: usize) -> Vec<Proposal> {
        allocated
            .iter()
            .filter(|entry| !self.is_visible(entry))
            .take(limit)
            .map(|entry| Proposal {
                id: entry.id().clone(),
                teaser: entry
                    .section
                    .teaser
                    .clone()
                    .unwrap_or_else(|| entry.display_title.clone()),
            })
            .collect()
    }
}
