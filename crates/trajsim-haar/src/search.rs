//! Stepwise pruning search over a candidate set.
//!
//! Depth runs from the start depth down to 1. Each round bounds every alive
//! candidate, takes the k-th smallest upper bound as the threshold, and
//! discards candidates whose lower bound exceeds it. At least k candidates
//! hold an upper bound no greater than the threshold, so a discarded
//! candidate is provably outside the true top k.

use tracing::{debug, info, instrument, warn};

use crate::bounds::{Bounds, PairProfile};
use crate::candidate::CandidateSet;
use crate::config::SearchConfig;
use crate::error::HaarError;
use crate::result::{RoundSummary, SearchResult, Survivor};
use crate::series::HaarSeries;

#[instrument(skip_all, fields(k = config.k, candidates = candidates.alive_count()))]
pub(crate) fn run(
    config: &SearchConfig,
    query: &HaarSeries,
    candidates: &mut CandidateSet,
) -> Result<SearchResult, HaarError> {
    let levels = query.levels();
    let start = config.start_depth.unwrap_or(levels);
    if start == 0 || start > levels {
        return Err(HaarError::InvalidDepth {
            depth: start,
            max_depth: levels,
        });
    }
    let max_rounds = config.max_rounds.unwrap_or(start as usize);

    let profiles = candidates
        .entries()
        .iter()
        .map(|c| PairProfile::new(query, &c.series))
        .collect::<Result<Vec<_>, _>>()?;

    let mut latest: Vec<Option<Bounds>> = vec![None; profiles.len()];
    let mut rounds = Vec::new();
    let mut depth = start;
    let mut final_depth = start;

    loop {
        let alive_before = candidates.alive_count();
        if alive_before <= config.k {
            break;
        }
        if rounds.len() >= max_rounds {
            warn!(max_rounds, alive = alive_before, depth, "round cap reached before k candidates remained");
            break;
        }

        let alive: Vec<usize> = candidates
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.alive)
            .map(|(i, _)| i)
            .collect();

        let mut uppers = Vec::with_capacity(alive.len());
        for &i in &alive {
            let b = profiles[i].bounds(depth, config.weighting)?;
            uppers.push(b.upper);
            latest[i] = Some(b);
        }
        uppers.sort_by(f64::total_cmp);
        let threshold = uppers[config.k - 1];

        let mut pruned = 0;
        for &i in &alive {
            if latest[i].is_some_and(|b| b.lower > threshold) {
                candidates.mark_dead(i);
                pruned += 1;
            }
        }

        debug!(depth, threshold, alive_before, pruned, "pruning round");
        rounds.push(RoundSummary {
            depth,
            threshold,
            alive_before,
            pruned,
        });
        final_depth = depth;

        if depth == 1 {
            break;
        }
        depth -= 1;
    }

    let mut survivors = Vec::with_capacity(candidates.alive_count());
    for (i, c) in candidates.entries().iter().enumerate() {
        if !c.alive {
            continue;
        }
        let bounds = match latest[i] {
            Some(b) => b,
            None => profiles[i].bounds(final_depth, config.weighting)?,
        };
        survivors.push(Survivor {
            position: c.position,
            bounds,
        });
    }
    candidates.compact();

    info!(
        survivors = survivors.len(),
        rounds = rounds.len(),
        final_depth,
        "search complete"
    );
    Ok(SearchResult {
        survivors,
        rounds,
        final_depth,
    })
}
