//! Economic evaluation of competing strategies.
//!
//! - **CEA** ([`cea`]): dominance, extended dominance and ICERs along the frontier
//! - **CBA** ([`cba`]): incremental net monetary benefit and willingness-to-pay advice

pub mod cba;
pub mod cea;
mod strategy;

pub use cba::{CostBenefitAnalysis, NmbEstimate, WtpRecommendation};
pub use cea::{icer, CeaRow, CostEffectivenessAnalysis, Icer};
pub use strategy::{Estimate, Strategy};
