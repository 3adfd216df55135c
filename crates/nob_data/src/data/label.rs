use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbolic label assigned to a classified feature point.
///
/// The alphabet is closed: exactly seven symbols, in the fixed order of
/// [`ALPHABET`]. Labels are handed out by cluster rank, so the order matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "SU-TI")]
    SuTi,
    #[serde(rename = "ME-TI")]
    MeTi,
    #[serde(rename = "ME-ME")]
    MeMe,
    #[serde(rename = "FRAG-Δ")]
    FragDelta,
    #[serde(rename = "THE_ONE")]
    TheOne,
    #[serde(rename = "THE_MANY")]
    TheMany,
    #[serde(rename = "COH-REBUILD")]
    CohRebuild,
}

/// The label alphabet in rank order.
pub const ALPHABET: [Label; 7] = [
    Label::SuTi,
    Label::MeTi,
    Label::MeMe,
    Label::FragDelta,
    Label::TheOne,
    Label::TheMany,
    Label::CohRebuild,
];

impl Label {
    /// Label for a cluster at `rank` in the radius ordering. Wraps modulo 7.
    #[must_use]
    pub fn from_rank(rank: usize) -> Self {
        ALPHABET[rank % ALPHABET.len()]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Label::SuTi => "SU-TI",
            Label::MeTi => "ME-TI",
            Label::MeMe => "ME-ME",
            Label::FragDelta => "FRAG-Δ",
            Label::TheOne => "THE_ONE",
            Label::TheMany => "THE_MANY",
            Label::CohRebuild => "COH-REBUILD",
        }
    }

    /// Position of this label within [`ALPHABET`].
    #[must_use]
    pub fn index(self) -> usize {
        ALPHABET.iter().position(|l| *l == self).unwrap_or(0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALPHABET
            .iter()
            .copied()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown label: {s}"))
    }
}
