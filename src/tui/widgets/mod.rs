pub mod detail;
pub mod history;
