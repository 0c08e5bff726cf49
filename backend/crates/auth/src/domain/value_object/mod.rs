//! Value Object Module

pub mod birth_date;
pub mod email;
pub mod full_name;
pub mod national_id;
pub mod reset_token;
pub mod user_password;
