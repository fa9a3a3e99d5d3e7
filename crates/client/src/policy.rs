//! Baseline policies for driving an [`ArenaEnv`] without a trained agent.
use arena_runtime::ArenaEnv;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PolicyKind {
    /// Uniform over the legal actions.
    Random,
    /// First legal action that is not the basic attack.
    Greedy,
}

pub enum Policy {
    Random(StdRng),
    Greedy { basic_attack: Option<String> },
}

impl Policy {
    pub fn new(kind: PolicyKind, seed: u64, basic_attack: Option<&str>) -> Self {
        match kind {
            PolicyKind::Random => Self::Random(StdRng::seed_from_u64(seed)),
            PolicyKind::Greedy => Self::Greedy {
                basic_attack: basic_attack.map(str::to_owned),
            },
        }
    }

    pub fn act(&mut self, env: &ArenaEnv, mask: &[bool]) -> usize {
        let legal: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(action, &legal)| legal.then_some(action))
            .collect();

        match self {
            Self::Random(rng) => legal.choose(rng).copied().unwrap_or(0),
            Self::Greedy { basic_attack } => {
                let skills = env
                    .session()
                    .and_then(|session| session.agent_state())
                    .map(|agent| agent.skills.as_slice())
                    .unwrap_or_default();
                let is_basic = |action: usize| {
                    env.codec()
                        .split(action)
                        .ok()
                        .and_then(|(index, _)| skills.get(index))
                        .is_some_and(|skill| Some(skill) == basic_attack.as_ref())
                };

                legal
                    .iter()
                    .copied()
                    .find(|&action| !is_basic(action))
                    .or_else(|| legal.first().copied())
                    .unwrap_or(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_names_parse() {
        assert_eq!("random".parse::<PolicyKind>().unwrap(), PolicyKind::Random);
        assert_eq!("Greedy".parse::<PolicyKind>().unwrap(), PolicyKind::Greedy);
        assert!("smart".parse::<PolicyKind>().is_err());
    }
}
