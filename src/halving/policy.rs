//! Runtime policy selection
//!
//! `PolicyConfig` names a promotion policy in configuration files and
//! dispatches to the concrete implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::bracket::Bracket;
use super::conservative::ConservativePromotion;
use super::efficient::EfficientPromotion;
use super::traits::{Payload, PromotionPolicy, RunContext};
use crate::error::Result;
use crate::evaluation::traits::Evaluator;

/// Serializable choice of promotion policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PolicyConfig {
    /// Trust promotions recorded by earlier runs
    #[default]
    Efficient,
    /// Re-evaluate every rung, optionally widening from history
    Conservative {
        /// Disable history widening
        #[serde(default)]
        strict: bool,
    },
}

impl PolicyConfig {
    /// Non-strict conservative policy
    pub fn conservative() -> Self {
        Self::Conservative { strict: false }
    }

    /// Strict conservative policy
    pub fn strict_conservative() -> Self {
        Self::Conservative { strict: true }
    }
}

impl From<EfficientPromotion> for PolicyConfig {
    fn from(_: EfficientPromotion) -> Self {
        Self::Efficient
    }
}

impl From<ConservativePromotion> for PolicyConfig {
    fn from(policy: ConservativePromotion) -> Self {
        Self::Conservative {
            strict: policy.strict,
        }
    }
}

impl fmt::Display for PolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl PromotionPolicy for PolicyConfig {
    fn name(&self) -> &'static str {
        match self {
            Self::Efficient => EfficientPromotion.name(),
            Self::Conservative { strict } => ConservativePromotion { strict: *strict }.name(),
        }
    }

    fn promote<P, E>(
        &self,
        bracket: &mut Bracket<P>,
        working: Vec<usize>,
        i: usize,
        ctx: &RunContext<'_, E>,
    ) -> Result<Vec<usize>>
    where
        P: Payload,
        E: Evaluator<P>,
    {
        match self {
            Self::Efficient => EfficientPromotion.promote(bracket, working, i, ctx),
            Self::Conservative { strict } => {
                ConservativePromotion { strict: *strict }.promote(bracket, working, i, ctx)
            }
        }
    }
}
