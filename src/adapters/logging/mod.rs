mod mailer;

pub use mailer::LoggingMailer;
