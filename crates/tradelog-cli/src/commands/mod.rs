pub mod calendar;
pub mod insights;
pub mod risk;
pub mod tags;
