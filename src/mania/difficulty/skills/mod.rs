pub mod accuracy;
pub mod judgements;
pub mod simulator;
pub mod strain;
