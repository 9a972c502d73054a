pub mod chart;
pub mod dashboard;
pub mod history;
pub mod index;
pub mod layout;
