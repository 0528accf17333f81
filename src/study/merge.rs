use std::collections::{HashMap, VecDeque};

use crate::error::Result;
use crate::template::NameTemplate;

use super::{ParameterSet, ParameterStudy};

/// Result of reconciling a fresh study against a previous one.
#[derive(Clone, Debug)]
pub struct MergeOutcome {
    /// The merged study, ordered by set identifier.
    pub study: ParameterStudy,
    /// Sets that kept a previous identifier.
    pub reused: usize,
    /// Sets that received a new identifier.
    pub minted: usize,
}

/// Carries identifiers forward from `previous` to matching sets of `fresh`.
///
/// A fresh set reuses the identifier of a previous set with exactly the same
/// non-missing values; each previous identifier is handed out at most once,
/// in previous study order. Every other fresh set gets the next identifier
/// after the largest one seen so far, so identifiers are never recycled.
/// Sets found only in `previous` are dropped. All names are re-rendered
/// from `template`.
///
/// # Errors
///
/// Returns [`Error::CorruptStudy`](crate::Error::CorruptStudy) if the merged
/// names collide.
pub fn merge(previous: &ParameterStudy, fresh: ParameterStudy, template: &NameTemplate) -> Result<MergeOutcome> {
    let mut pool: HashMap<&str, VecDeque<&ParameterSet>> = HashMap::new();
    for set in &previous.sets {
        pool.entry(set.hash()).or_default().push_back(set);
    }

    let mut next_id = previous.max_set_id().map_or(0, |max| max + 1);
    let mut reused = 0;
    let mut minted = 0;

    let ParameterStudy {
        parameter_names,
        sets,
    } = fresh;
    let mut merged: Vec<ParameterSet> = sets
        .into_iter()
        .map(|set| {
            let matched = pool
                .get_mut(set.hash())
                .and_then(|candidates| take_match(candidates, &set));
            let set_id = if let Some(id) = matched {
                reused += 1;
                id
            } else {
                minted += 1;
                next_id += 1;
                next_id - 1
            };
            set.renamed(set_id, template)
        })
        .collect();
    merged.sort_by_key(ParameterSet::id);

    trace_info!(
        reused,
        minted,
        dropped = previous.len() - reused,
        "merged against previous parameter study"
    );

    Ok(MergeOutcome {
        study: ParameterStudy::new(parameter_names, merged)?,
        reused,
        minted,
    })
}

/// Pops the first candidate whose values really equal `set`'s.
fn take_match(candidates: &mut VecDeque<&ParameterSet>, set: &ParameterSet) -> Option<u64> {
    let position = candidates
        .iter()
        .position(|candidate| same_content(candidate, set))?;
    candidates.remove(position).map(ParameterSet::id)
}

fn same_content(a: &ParameterSet, b: &ParameterSet) -> bool {
    let present = |set: &ParameterSet| {
        set.values
            .iter()
            .filter(|(_, value)| !value.is_missing())
            .count()
    };
    present(a) == present(b)
        && a.values
            .iter()
            .filter(|(_, value)| !value.is_missing())
            .all(|(name, value)| b.values.get(name) == Some(value))
}
