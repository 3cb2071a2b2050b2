pub mod extraction;
pub mod literal;
pub mod ranking;
pub mod report;
