//! # incremental-hyperband
//!
//! Budget-extensible Hyperband for multi-fidelity optimization.
//!
//! Hyperband runs several Successive Halving brackets, each trading the number
//! of candidates it looks at against the budget every candidate gets. This
//! crate keeps every bracket's history between runs, so the maximum budget can
//! be raised after the fact and earlier evaluations are reused instead of
//! repeated.
//!
//! ## Core Concepts
//!
//! - **Brackets and rungs**: a bracket evaluates its candidates at geometrically
//!   growing budgets and keeps the best `1 / eta` at each rung
//! - **Promotion policies**: `EfficientPromotion` trusts results recorded by
//!   earlier runs, `ConservativePromotion` re-ranks every rung
//! - **Incremental budgets**: `Hyperband::increment_max_budget` multiplies the
//!   maximum budget by eta and extends every bracket by one rung
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use incremental_hyperband::prelude::*;
//!
//! let evaluator = Fidelity::new(Sphere::new(4));
//! let sampler = UniformSampler::new(evaluator.benchmark().search_space());
//!
//! let mut hb = Hyperband::new(HyperbandConfig::default().with_max_budget(27.0), evaluator)?;
//! let first = hb.hyperband(&sampler)?;
//!
//! hb.increment_max_budget();
//! let second = hb.hyperband(&sampler)?;
//! println!("{}", second.summary());
//! ```

pub mod candidate;
pub mod error;
pub mod evaluation;
pub mod halving;
pub mod hyperband;
pub mod sampling;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::candidate::prelude::*;
    pub use crate::error::*;
    pub use crate::evaluation::prelude::*;
    pub use crate::halving::prelude::*;
    pub use crate::hyperband::prelude::*;
    pub use crate::sampling::prelude::*;
}
