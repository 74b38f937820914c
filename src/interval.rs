//! Closed intervals for ray travel distances.

/// Closed interval [min, max] of ray parameter values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Create a new interval with given min and max values
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check if the interval contains the given value (inclusive bounds)
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let i = Interval::new(15.0, 2000.0);
        assert!(i.contains(15.0));
        assert!(i.contains(2000.0));
        assert!(!i.contains(14.9));
        assert!(!i.contains(2000.1));
    }

    #[test]
    fn degenerate_interval_holds_one_value() {
        let i = Interval::new(15.0, 15.0);
        assert!(i.contains(15.0));
        assert!(!i.contains(15.001));
    }
}
