use chrono::{NaiveDate, Utc};

use crate::application::{ApplicationError, Result, ServiceDependencies, loan};
use crate::domain::Loan;

/// 延滞通知の既定本文
pub const DEFAULT_LATE_LOANS_MESSAGE: &str =
    "Attention! You have an overdue loan. Please return the book as soon as possible.";

/// 延滞中の貸出から通知先メールアドレスを抽出する
///
/// メールアドレスのない貸出は除外し、重複は最初の出現のみ残す。
fn collect_addresses(loans: &[Loan]) -> Vec<String> {
    let mut addresses: Vec<String> = Vec::new();

    for email in loans.iter().filter_map(|loan| loan.customer_email.as_deref()) {
        let email = email.trim();
        if !email.is_empty() && !addresses.iter().any(|a| a == email) {
            addresses.push(email.to_string());
        }
    }

    addresses
}

/// 延滞中の利用者に督促メールを送る（日次バッチ）
///
/// 送信失敗はリトライせずそのまま返す。次回の実行で再送される。
///
/// # 戻り値
/// 送信した宛先の件数
pub async fn notify_late_loans(deps: &ServiceDependencies, message: &str) -> Result<usize> {
    notify_late_loans_as_of(deps, message, Utc::now().date_naive()).await
}

/// `today` を基準に督促メールを送る
pub async fn notify_late_loans_as_of(
    deps: &ServiceDependencies,
    message: &str,
    today: NaiveDate,
) -> Result<usize> {
    let late_loans = loan::get_late_loans_as_of(deps, today).await?;
    let addresses = collect_addresses(&late_loans);

    if addresses.is_empty() {
        tracing::debug!("no late loans to notify");
        return Ok(0);
    }

    deps.mailer
        .send_mails(message, &addresses)
        .await
        .map_err(ApplicationError::MailerError)?;

    let settings = deps.mailer.settings();
    tracing::info!(
        late_loans = late_loans.len(),
        recipients = addresses.len(),
        from = %settings.sender,
        subject = %settings.subject,
        "late loan reminders sent"
    );

    Ok(addresses.len())
}
