//! Machine power-state diagram.

use serde::{Deserialize, Serialize};

/// Transition times and power draws between the machine power states.
///
/// There are `n` "off" variants (index `0` is the base off state the machine
/// must be in at both ends of the horizon), one "on" state and one "idle"
/// state. Every off variant has a mandatory transition to and from "on";
/// transitions to and from "idle" are optional (`None` means forbidden).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDiagram {
    pub off_on_time: Vec<i64>,
    pub on_off_time: Vec<i64>,
    pub off_on_power: Vec<i64>,
    pub on_off_power: Vec<i64>,
    pub off_idle_time: Vec<Option<i64>>,
    pub idle_off_time: Vec<Option<i64>>,
    pub off_idle_power: Vec<Option<i64>>,
    pub idle_off_power: Vec<Option<i64>>,
    pub on_power: i64,
    pub idle_power: i64,
    pub off_power: Vec<i64>,
}

impl StateDiagram {
    /// Single off state, no idle transitions (the "NOSBY" diagram of
    /// Aghelinejad et al., 2017).
    pub fn aghelinejad2017a() -> Self {
        Self {
            off_on_time: vec![2],
            on_off_time: vec![1],
            off_on_power: vec![5],
            on_off_power: vec![1],
            off_idle_time: vec![None],
            idle_off_time: vec![None],
            off_idle_power: vec![None],
            idle_off_power: vec![None],
            on_power: 4,
            idle_power: 2,
            off_power: vec![0],
        }
    }

    /// Three off states of decreasing depth (the "TWOSBY" diagram of
    /// Benedikt et al., 2020).
    pub fn benedikt2020a() -> Self {
        Self {
            off_on_time: vec![4, 3, 2],
            on_off_time: vec![1, 1, 1],
            off_on_power: vec![15, 13, 12],
            on_off_power: vec![2, 2, 2],
            off_idle_time: vec![None; 3],
            idle_off_time: vec![None; 3],
            off_idle_power: vec![None; 3],
            idle_off_power: vec![None; 3],
            on_power: 10,
            idle_power: 8,
            off_power: vec![0, 2, 4],
        }
    }

    /// Number of off variants.
    pub fn off_states_count(&self) -> usize {
        self.off_power.len()
    }

    /// Checks that every per-off-state array has one entry per off state and
    /// that times and powers are non-negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_energysched::model::StateDiagram;
    ///
    /// assert!(StateDiagram::aghelinejad2017a().validate().is_ok());
    ///
    /// let mut broken = StateDiagram::benedikt2020a();
    /// broken.on_off_time.pop();
    /// assert!(broken.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        let n = self.off_states_count();
        if n == 0 {
            return Err("at least the base off state is required".into());
        }
        let lengths = [
            ("off_on_time", self.off_on_time.len()),
            ("on_off_time", self.on_off_time.len()),
            ("off_on_power", self.off_on_power.len()),
            ("on_off_power", self.on_off_power.len()),
            ("off_idle_time", self.off_idle_time.len()),
            ("idle_off_time", self.idle_off_time.len()),
            ("off_idle_power", self.off_idle_power.len()),
            ("idle_off_power", self.idle_off_power.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(format!("{name} has {len} entries, expected {n}"));
            }
        }

        let fixed = self
            .off_on_time
            .iter()
            .chain(&self.on_off_time)
            .chain(&self.off_on_power)
            .chain(&self.on_off_power)
            .chain(&self.off_power);
        let optional = self
            .off_idle_time
            .iter()
            .chain(&self.idle_off_time)
            .chain(&self.off_idle_power)
            .chain(&self.idle_off_power)
            .flatten();
        if fixed.chain(optional).any(|&v| v < 0) {
            return Err("transition times and powers must be non-negative".into());
        }
        if self.on_power < 0 || self.idle_power < 0 {
            return Err("state powers must be non-negative".into());
        }

        for i in 0..n {
            if self.off_idle_time[i].is_some() != self.off_idle_power[i].is_some()
                || self.idle_off_time[i].is_some() != self.idle_off_power[i].is_some()
            {
                return Err(format!(
                    "idle transition of off state {i} needs both time and power"
                ));
            }
        }
        Ok(())
    }
}
