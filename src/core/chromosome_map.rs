use std::collections::HashMap;

use crate::core::types::DuplicateAccessionPolicy;

/// Outcome of inserting an accession that was already present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateAccession {
    /// Same accession with the same sequence name
    Identical,
    /// Name differs; the map now holds whichever name the policy kept
    Resolved { kept: String, discarded: String },
    /// Name differs and the policy forbids conflicts; the map is unchanged
    Rejected { existing: String },
}

/// Lookup from GenBank accession to assembly sequence name (e.g. `CP122180.1` -> `2L`).
///
/// Built once per run from the assembly report and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ChromosomeMap {
    by_accession: HashMap<String, String>,
    policy: DuplicateAccessionPolicy,
}

impl ChromosomeMap {
    #[must_use]
    pub fn new(policy: DuplicateAccessionPolicy) -> Self {
        Self {
            by_accession: HashMap::new(),
            policy,
        }
    }

    /// Insert `accession -> sequence_name`, resolving repeats with the map's policy.
    ///
    /// Returns `None` for a new accession.
    pub fn insert(
        &mut self,
        accession: impl Into<String>,
        sequence_name: impl Into<String>,
    ) -> Option<DuplicateAccession> {
        let accession = accession.into();
        let sequence_name = sequence_name.into();

        let Some(existing) = self.by_accession.get_mut(&accession) else {
            self.by_accession.insert(accession, sequence_name);
            return None;
        };

        if *existing == sequence_name {
            return Some(DuplicateAccession::Identical);
        }

        let outcome = match self.policy {
            DuplicateAccessionPolicy::First => DuplicateAccession::Resolved {
                kept: existing.clone(),
                discarded: sequence_name,
            },
            DuplicateAccessionPolicy::Last => DuplicateAccession::Resolved {
                kept: sequence_name.clone(),
                discarded: std::mem::replace(existing, sequence_name),
            },
            DuplicateAccessionPolicy::Reject => DuplicateAccession::Rejected {
                existing: existing.clone(),
            },
        };
        Some(outcome)
    }

    /// Sequence name for an accession
    #[must_use]
    pub fn get(&self, accession: &str) -> Option<&str> {
        self.by_accession.get(accession).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, accession: &str) -> bool {
        self.by_accession.contains_key(accession)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_accession.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_accession.is_empty()
    }
}

impl<A, N> FromIterator<(A, N)> for ChromosomeMap
where
    A: Into<String>,
    N: Into<String>,
{
    /// Collects with the default (last wins) policy
    fn from_iter<I: IntoIterator<Item = (A, N)>>(iter: I) -> Self {
        let mut map = ChromosomeMap::default();
        for (accession, name) in iter {
            map.insert(accession, name);
        }
        map
    }
}
