//! External API integrations

pub mod mailer;

pub use mailer::MailerClient;
