pub mod aggregation_service;
pub mod alert_sink;
pub mod category_resolver;
pub mod configuration_service;
pub mod draft_categorizer;
pub mod suggestion_service;
pub mod threshold_service;
