use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 督促メールの既定の件名
pub const DEFAULT_MAIL_SUBJECT: &str = "Overdue library loan";

/// 既定の送信元アドレス
pub const DEFAULT_MAIL_SENDER: &str = "library@localhost";

/// 送信元と件名
///
/// 本文と宛先は送信ごとに渡され、こちらはアダプターの生成時に固定される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub sender: String,
    pub subject: String,
}

impl MailSettings {
    pub fn new(sender: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            subject: subject.into(),
        }
    }
}

impl Default for MailSettings {
    fn default() -> Self {
        Self::new(DEFAULT_MAIL_SENDER, DEFAULT_MAIL_SUBJECT)
    }
}

/// メール送信ポート
///
/// 配送の仕組み（SMTP、外部API等）を抽象化する。
/// 送信元と件名は実装が保持する [`MailSettings`] に従う。
#[async_trait]
pub trait Mailer: Send + Sync {
    /// 同じ本文を複数の宛先に送信する
    async fn send_mails(&self, message: &str, addresses: &[String]) -> Result<()>;

    /// 送信に使う送信元と件名
    fn settings(&self) -> &MailSettings;
}
