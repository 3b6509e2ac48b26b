pub mod dataset;
pub mod output;
pub mod record;
pub mod scoring;
