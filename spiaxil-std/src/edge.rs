//! Edge detection.

/// Transition of a sampled line between two consecutive cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Low to high.
    Rising,
    /// High to low.
    Falling,
}

impl Edge {
    /// Classifies the transition from `prev` to `cur`.
    pub const fn detect(prev: bool, cur: bool) -> Option<Self> {
        match (prev, cur) {
            (false, true) => Some(Self::Rising),
            (true, false) => Some(Self::Falling),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect() {
        assert_eq!(Edge::detect(false, true), Some(Edge::Rising));
        assert_eq!(Edge::detect(true, false), Some(Edge::Falling));
        assert_eq!(Edge::detect(true, true), None);
        assert_eq!(Edge::detect(false, false), None);
    }
}
