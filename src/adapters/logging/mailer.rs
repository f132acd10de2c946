use crate::ports::mailer::{MailSettings, Mailer, Result};
use async_trait::async_trait;

/// 送信内容をログに出力するだけのMailer
///
/// 配送手段を持たない環境向け。送信内容は保持しない。
pub struct LoggingMailer {
    settings: MailSettings,
}

impl LoggingMailer {
    pub fn new(settings: MailSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send_mails(&self, message: &str, addresses: &[String]) -> Result<()> {
        tracing::info!(
            from = %self.settings.sender,
            subject = %self.settings.subject,
            recipients = ?addresses,
            "sending mail: {}",
            message
        );

        Ok(())
    }

    fn settings(&self) -> &MailSettings {
        &self.settings
    }
}
