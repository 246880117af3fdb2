use crate::domain::model::{HotCold, Phase};
use crate::utils::error::{LottoError, Result};
use std::collections::HashMap;

/// Entries kept in each ranked list.
const TOP_COUNT: usize = 10;

/// Compute hot/cold rankings over the first `window` phases.
///
/// `phases` must be ordered most-recent-first. Every `main` and `bonus`
/// value of a taken phase must parse as an integer inside `universe`;
/// unlike extraction, analysis refuses to produce statistics from values it
/// cannot account for. The slice order of `universe` doubles as the cold
/// tie order.
pub fn hot_cold(phases: &[Phase], window: usize, universe: &[u32]) -> Result<HotCold> {
    let draws = collect_draws(phases, window, universe)?;

    // Hot: occurrence counts across the taken draws, ties in first-seen order.
    let mut first_seen: Vec<u32> = Vec::new();
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for draw in &draws {
        for &number in draw {
            let count = counts.entry(number).or_insert(0);
            if *count == 0 {
                first_seen.push(number);
            }
            *count += 1;
        }
    }

    let mut hot: Vec<(u32, usize)> = first_seen.into_iter().map(|n| (n, counts[&n])).collect();
    hot.sort_by(|a, b| b.1.cmp(&a.1));
    hot.truncate(TOP_COUNT);

    // Cold: how many of the most recent draws a number has missed. Index 0 is
    // the most recent draw; a number never seen inside the window is assigned
    // the number of taken draws.
    let mut cold: Vec<(u32, usize)> = universe
        .iter()
        .map(|&number| {
            let distance = draws
                .iter()
                .position(|draw| draw.contains(&number))
                .unwrap_or(draws.len());
            (number, distance)
        })
        .collect();
    cold.sort_by(|a, b| b.1.cmp(&a.1));
    cold.truncate(TOP_COUNT);

    Ok(HotCold {
        taken: draws.len(),
        hot,
        cold,
    })
}

/// Parse the first `window` phases into full draw sets (main values plus the
/// bonus value), validating every number against the universe.
fn collect_draws(phases: &[Phase], window: usize, universe: &[u32]) -> Result<Vec<Vec<u32>>> {
    phases
        .iter()
        .take(window)
        .map(|phase| {
            phase
                .main
                .iter()
                .chain(std::iter::once(&phase.bonus))
                .map(|value| {
                    let number: u32 =
                        value
                            .trim()
                            .parse()
                            .map_err(|_| LottoError::NumberParseError {
                                phase: phase.phase.clone(),
                                value: value.clone(),
                            })?;
                    if !universe.contains(&number) {
                        return Err(LottoError::OutOfRangeError {
                            phase: phase.phase.clone(),
                            value: number,
                        });
                    }
                    Ok(number)
                })
                .collect()
        })
        .collect()
}
