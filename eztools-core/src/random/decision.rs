use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::RandomProvider;

/// Outcome of the yes/no decider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Yes,
    No,
    Maybe,
}

impl Decision {
    pub const ALL: [Decision; 3] = [Decision::Yes, Decision::No, Decision::Maybe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Maybe => "MAYBE",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks one of YES / NO / MAYBE with equal probability.
pub fn decide<R: RngCore>(provider: &mut RandomProvider<R>) -> Decision {
    let index = provider.uniform_index(Decision::ALL.len()).unwrap_or_default();
    Decision::ALL[index]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::mock::StepRng;

    use super::*;

    #[test]
    fn decide_follows_option_order() {
        let mut provider = RandomProvider::with_source(StepRng::new(0, 1));

        let picks: Vec<Decision> = (0..4).map(|_| decide(&mut provider)).collect();

        assert_eq!(
            picks,
            vec![Decision::Yes, Decision::No, Decision::Maybe, Decision::Yes]
        );
    }

    #[test]
    fn decide_reaches_every_option() {
        let mut provider = RandomProvider::new();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..300 {
            seen.insert(decide(&mut provider));
        }

        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn display_uses_upper_case_labels() {
        assert_eq!(Decision::Maybe.to_string(), "MAYBE");
    }
}
