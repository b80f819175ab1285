//! Services Module
//!
//! - [`EmailService`] - SMTP 邮件通知

pub mod email;

pub use email::EmailService;
