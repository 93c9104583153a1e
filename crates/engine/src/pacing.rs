//! Response pacing — the deliberate stagger between character responses.
//!
//! The pacing value is assigned at fan-out time and is authoritative for
//! delivery order. It has nothing to do with how long generation actually
//! takes: a slow character with a small pacing delay still appears early
//! once the whole batch has resolved.

use ensemble_config::PacingConfig;
use ensemble_core::character::CharacterRecord;

/// Assigns each fan-out slot its pacing delay.
pub trait Pacing: Send + Sync {
    /// The delay for the character at `index` in fan-out order.
    fn delay_for(&self, index: usize, character: &CharacterRecord) -> u64;
}

/// The default policy: a base delay plus a fixed step per subsequent
/// responder, so a group reads as taking turns rather than answering in
/// unison.
#[derive(Debug, Clone)]
pub struct StaggeredPacing {
    pub base_ms: u64,
    pub step_ms: u64,
}

impl StaggeredPacing {
    pub fn from_config(config: &PacingConfig) -> Self {
        Self {
            base_ms: config.base_ms,
            step_ms: config.step_ms,
        }
    }
}

impl Pacing for StaggeredPacing {
    fn delay_for(&self, index: usize, _character: &CharacterRecord) -> u64 {
        self.base_ms + index as u64 * self.step_ms
    }
}

/// A fixed per-slot delay table. Indexes wrap around the table.
#[derive(Debug, Clone)]
pub struct FixedPacing {
    pub delays_ms: Vec<u64>,
}

impl FixedPacing {
    pub fn new(delays_ms: Vec<u64>) -> Self {
        assert!(!delays_ms.is_empty(), "FixedPacing needs at least one delay");
        Self { delays_ms }
    }
}

impl Pacing for FixedPacing {
    fn delay_for(&self, index: usize, _character: &CharacterRecord) -> u64 {
        self.delays_ms[index % self.delays_ms.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any_character() -> CharacterRecord {
        CharacterRecord::stock("c", "C", 30, "male", "entirely unremarkable test personality")
    }

    #[test]
    fn staggered_pacing_steps_by_index() {
        let pacing = StaggeredPacing {
            base_ms: 600,
            step_ms: 900,
        };
        let c = any_character();
        assert_eq!(pacing.delay_for(0, &c), 600);
        assert_eq!(pacing.delay_for(1, &c), 1500);
        assert_eq!(pacing.delay_for(2, &c), 2400);
    }

    #[test]
    fn fixed_pacing_wraps() {
        let pacing = FixedPacing::new(vec![800, 100, 500]);
        let c = any_character();
        assert_eq!(pacing.delay_for(0, &c), 800);
        assert_eq!(pacing.delay_for(2, &c), 500);
        assert_eq!(pacing.delay_for(3, &c), 800);
    }
}
