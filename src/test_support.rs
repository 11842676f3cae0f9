//! Fixture instances shared by unit tests.

use crate::extended::ExtendedInstance;
use crate::model::{parse_instance, StartTimes};

pub(crate) const TAB1: &str = include_str!("../testdata/aghelinejad2019a_tab1.json");
pub(crate) const FULLHORIZON: &str = include_str!("../testdata/fullhorizon.json");

fn load(json: &str) -> ExtendedInstance {
    let mut ext = ExtendedInstance::new(parse_instance(json).unwrap()).unwrap();
    ext.generate_full();
    ext
}

/// Three jobs `[2, 1, 2]` over ten intervals; optimum 155.
pub(crate) fn aghelinejad2019a_tab1() -> ExtendedInstance {
    load(TAB1)
}

/// Two jobs `[1, 2]` filling the whole usable window; optimum 48.
pub(crate) fn fullhorizon() -> ExtendedInstance {
    load(FULLHORIZON)
}

/// Start times from `(job index, start)` pairs.
pub(crate) fn starts_for(ext: &ExtendedInstance, pairs: &[(usize, i64)]) -> StartTimes {
    pairs
        .iter()
        .map(|&(index, start)| (ext.jobs()[index], start))
        .collect()
}
