//! A single wave in the optimizer's population.

/// One candidate solution: a flattened real-valued roster plus the
/// per-wave search state.
///
/// Waves are created once at population initialization and live for
/// the whole run; operators replace their contents in place.
#[derive(Debug, Clone)]
pub struct Wave {
    /// Flattened roster as continuous coordinates.
    pub position: Vec<f64>,
    /// Cost of `position` under the unit's evaluator.
    pub cost: f64,
    /// Propagation step-size coefficient.
    pub wavelength: f64,
    /// Remaining non-improving iterations before refraction.
    pub height: u32,
}

impl Wave {
    /// Creates a wave with its own copy of the initial position.
    pub fn new(position: Vec<f64>, cost: f64, wavelength: f64, height: u32) -> Self {
        Self {
            position,
            cost,
            wavelength,
            height,
        }
    }

    /// Replaces the wave's position and cost after an accepted move.
    pub fn accept(&mut self, position: Vec<f64>, cost: f64, hmax: u32) {
        self.position = position;
        self.cost = cost;
        self.height = hmax;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_resets_height() {
        let mut wave = Wave::new(vec![0.0, 1.0], 5.0, 0.5, 2);
        wave.height = 1;
        wave.accept(vec![2.0, 3.0], 3.0, 6);
        assert_eq!(wave.position, vec![2.0, 3.0]);
        assert_eq!(wave.cost, 3.0);
        assert_eq!(wave.height, 6);
    }
}
