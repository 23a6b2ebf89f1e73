use sweepnet_nn::random::RandomSource;

use std::collections::VecDeque;

/// A [`RandomSource`] replaying fixed draws.
///
/// Integer draws must all be scripted, and each is checked
/// against the requested range. Once the scripted uniform
/// draws run out, 0.5 is returned.
pub(crate) struct ScriptedSource {
    ints: VecDeque<u64>,
    uniforms: VecDeque<f64>,
}

impl ScriptedSource {
    pub(crate) fn new(ints: Vec<u64>, uniforms: Vec<f64>) -> ScriptedSource {
        ScriptedSource {
            ints: ints.into(),
            uniforms: uniforms.into(),
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.ints.is_empty() && self.uniforms.is_empty()
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self) -> f64 {
        self.uniforms.pop_front().unwrap_or(0.5)
    }

    fn uniform_int(&mut self, low: u64, high: u64) -> u64 {
        let value = self
            .ints
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted integer draw in [{}, {}]", low, high));
        assert!(
            (low..=high).contains(&value),
            "scripted {} outside [{}, {}]",
            value,
            low,
            high
        );
        value
    }
}
