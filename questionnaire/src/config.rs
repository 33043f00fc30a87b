use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::GroupAssignment;

/// How a session picks its variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupSelection {
    /// A or B with equal probability.
    #[default]
    Random,
    /// Always variant A.
    A,
    /// Always variant B.
    B,
}

impl GroupSelection {
    /// Pick a variant.
    pub fn choose(self, rng: &mut impl Rng) -> GroupAssignment {
        match self {
            Self::Random => {
                if rng.gen_bool(0.5) {
                    GroupAssignment::A
                } else {
                    GroupAssignment::B
                }
            }
            Self::A => GroupAssignment::A,
            Self::B => GroupAssignment::B,
        }
    }
}

/// What happens to the variant when a session is reset after submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupReset {
    /// The next respondent keeps the same variant.
    #[default]
    Retain,
    /// The variant is chosen again with the configured selection.
    Reroll,
}

/// Session behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How the variant is chosen at session start.
    #[serde(default)]
    pub group_selection: GroupSelection,

    /// Whether the variant is kept or chosen again after a submission.
    #[serde(default)]
    pub group_on_reset: GroupReset,

    /// How many times a submission tries to save before reporting failure.
    #[serde(default = "default_save_attempts")]
    pub save_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            group_selection: GroupSelection::default(),
            group_on_reset: GroupReset::default(),
            save_attempts: default_save_attempts(),
        }
    }
}

impl SessionConfig {
    /// Use a fixed variant.
    pub fn fixed(group: GroupAssignment) -> Self {
        let group_selection = match group {
            GroupAssignment::A => GroupSelection::A,
            GroupAssignment::B => GroupSelection::B,
        };
        Self {
            group_selection,
            ..Self::default()
        }
    }

    pub fn with_group_on_reset(mut self, reset: GroupReset) -> Self {
        self.group_on_reset = reset;
        self
    }

    pub fn with_save_attempts(mut self, attempts: u32) -> Self {
        self.save_attempts = attempts;
        self
    }
}

fn default_save_attempts() -> u32 {
    3
}
