//! Value Object Module

pub mod attachments;
pub mod report_content;
pub mod report_status;
