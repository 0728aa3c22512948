//! Export of triage results for referral.

mod referral;

pub use referral::*;
