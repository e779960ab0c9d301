pub use self::{
    attributes::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
    performance::{HitResultPriority, ManiaPerformance, MapOrAttrs},
    score_state::ManiaScoreState,
};

mod attributes;
pub mod difficulty;
mod performance;
mod score_state;
