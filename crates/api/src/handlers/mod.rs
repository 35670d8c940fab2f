pub mod build_logs;
pub mod generated_code;
pub mod health;
pub mod jenkins;
pub mod stats;
