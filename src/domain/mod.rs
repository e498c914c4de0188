pub mod areas;
pub mod objects;
pub mod options;
pub mod planner;
