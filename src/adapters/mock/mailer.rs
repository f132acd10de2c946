use crate::ports::mailer::{MailSettings, Mailer as MailerTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// 送信されたメール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub sender: String,
    pub subject: String,
    pub message: String,
    pub addresses: Vec<String>,
}

/// Mailerのモック実装
///
/// 実際には送信せず、内容を記録する。
/// `fail_with` を設定すると送信を失敗させる。
pub struct Mailer {
    settings: MailSettings,
    sent: Mutex<Vec<SentMail>>,
    failure: Mutex<Option<String>>,
}

impl Mailer {
    pub fn new() -> Self {
        Self::with_settings(MailSettings::default())
    }

    pub fn with_settings(settings: MailSettings) -> Self {
        Self {
            settings,
            sent: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// 以降の送信を指定したメッセージで失敗させる
    pub fn fail_with(&self, reason: impl Into<String>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(reason.into());
        }
    }

    /// 送信済みメール（送信順）
    pub fn sent_mails(&self) -> Vec<SentMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Default for Mailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailerTrait for Mailer {
    async fn send_mails(&self, message: &str, addresses: &[String]) -> Result<()> {
        let failure = self
            .failure
            .lock()
            .map_err(|e| e.to_string())?
            .clone();
        if let Some(reason) = failure {
            return Err(reason.into());
        }

        self.sent
            .lock()
            .map_err(|e| e.to_string())?
            .push(SentMail {
                sender: self.settings.sender.clone(),
                subject: self.settings.subject.clone(),
                message: message.to_string(),
                addresses: addresses.to_vec(),
            });

        Ok(())
    }

    fn settings(&self) -> &MailSettings {
        &self.settings
    }
}
