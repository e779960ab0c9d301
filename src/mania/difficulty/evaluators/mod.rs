pub use self::{
    anchor::AnchorEvaluator,
    cross_column::CrossColumnEvaluator,
    individual::IndividualStrainEvaluator,
    key_usage::{note_density, KeyUsage},
    overall::OverallStrainEvaluator,
    press::PressEvaluator,
    release::ReleaseEvaluator,
    same_column::{SameColumnEvaluator, SameColumnPressure},
    unevenness::UnevennessEvaluator,
};

mod anchor;
mod cross_column;
mod individual;
pub mod key_usage;
mod overall;
mod press;
mod release;
mod same_column;
mod unevenness;
