use crate::application::notification::DEFAULT_LATE_LOANS_MESSAGE;
use crate::ports::mailer::{DEFAULT_MAIL_SENDER, DEFAULT_MAIL_SUBJECT, MailSettings};
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/library";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// アプリケーション設定
///
/// 環境変数から読み込む。`.env` があれば先に読み込まれる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub late_loans_message: String,
    pub mail_sender: String,
    pub mail_subject: String,
}

impl AppConfig {
    /// `.env` と環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        // .env がなくてもよい
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の取得関数から設定を組み立てる
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            port: parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?,
            max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                lookup("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
            late_loans_message: non_blank(lookup("LATE_LOANS_MESSAGE"))
                .unwrap_or_else(|| DEFAULT_LATE_LOANS_MESSAGE.into()),
            mail_sender: non_blank(lookup("MAIL_SENDER"))
                .unwrap_or_else(|| DEFAULT_MAIL_SENDER.into()),
            mail_subject: non_blank(lookup("MAIL_SUBJECT"))
                .unwrap_or_else(|| DEFAULT_MAIL_SUBJECT.into()),
        })
    }

    /// 督促メールの送信元と件名
    pub fn mail_settings(&self) -> MailSettings {
        MailSettings::new(self.mail_sender.clone(), self.mail_subject.clone())
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.late_loans_message, DEFAULT_LATE_LOANS_MESSAGE);
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert_eq!(config.mail_settings(), MailSettings::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://db/loans"),
            ("PORT", "8080"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("LATE_LOANS_MESSAGE", "Devolva o livro"),
            ("MAIL_SENDER", "biblioteca@x.com"),
            ("MAIL_SUBJECT", "Livro atrasado"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "postgres://db/loans");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.late_loans_message, "Devolva o livro");
        assert_eq!(
            config.mail_settings(),
            MailSettings::new("biblioteca@x.com", "Livro atrasado")
        );
    }

    #[test]
    fn test_blank_mail_settings_fall_back_to_defaults() {
        let config = config_from(&[("MAIL_SENDER", "  "), ("MAIL_SUBJECT", "")]).unwrap();
        assert_eq!(config.mail_sender, DEFAULT_MAIL_SENDER);
        assert_eq!(config.mail_subject, DEFAULT_MAIL_SUBJECT);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "PORT", .. }));
    }
}
