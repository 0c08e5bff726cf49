//! Entity Module

pub mod report;
