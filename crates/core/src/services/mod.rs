pub mod analytics_service;
pub mod goal_service;
pub mod quote_service;
pub mod refresh_service;
