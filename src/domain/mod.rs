// Domain layer - Value types and the growth-condition analysis engine
pub mod analysis;
pub mod cleaner;
pub mod profile;
pub mod range_evaluator;
pub mod recommender;
pub mod resample;
pub mod scorer;
pub mod series;
pub mod statistics;
pub mod trend_estimator;
