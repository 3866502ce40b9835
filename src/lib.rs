pub mod config;
pub mod form;
pub mod insights;
pub mod league;
pub mod model;
pub mod predictor;
pub mod report;
pub mod report_export;
pub mod sample_season;
pub mod scenarios;
pub mod scorecard;
pub mod snapshot;
pub mod strategy;
