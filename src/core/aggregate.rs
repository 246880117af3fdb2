use crate::domain::model::{Level, Phase, PhaseEntries};

/// Fold extracted entry lists into canonical `Phase` records, preserving
/// input order. Main numbers keep their presentation order; if a block
/// marked more than one bonus entry the last one wins. The categorical
/// attributes are not carried past this point.
pub fn aggregate(extracted: PhaseEntries) -> Vec<Phase> {
    extracted
        .into_iter()
        .map(|(label, entries)| {
            let mut phase = Phase {
                phase: label,
                main: Vec::new(),
                bonus: String::new(),
            };

            for entry in entries {
                match entry.level {
                    Level::Main => phase.main.push(entry.number),
                    Level::Bonus => phase.bonus = entry.number,
                }
            }

            phase
        })
        .collect()
}
