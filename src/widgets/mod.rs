pub mod controls;
pub mod dataset;
pub mod debug;
pub mod metrics;
pub mod pie;
pub mod sidebar;
pub mod trend;
