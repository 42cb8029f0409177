pub mod analytics;
pub mod goal;
pub mod holding;
pub mod series;
pub mod settings;
pub mod snapshot;
pub mod view;
