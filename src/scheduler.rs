use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::application::{ServiceDependencies, notification};

/// 次の0時（UTC）までの待ち時間
///
/// ちょうど0時の場合は翌日の0時までを返す。
pub fn duration_until_next_midnight(now: DateTime<Utc>) -> std::time::Duration {
    let next_midnight = (now.date_naive() + Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now + Duration::days(1));

    (next_midnight - now)
        .to_std()
        .unwrap_or(std::time::Duration::ZERO)
}

/// 目覚めた時点で実行予定日に達しているか
///
/// タイマーが0時より僅かに早く戻った場合は前日扱いとなり、実行しない。
pub fn has_reached(run_date: NaiveDate, now: DateTime<Utc>) -> bool {
    now.date_naive() >= run_date
}

/// 延滞督促バッチを毎日0時（UTC）に実行する
///
/// 失敗はログに記録し、翌日の実行を続ける。戻らない。
pub async fn run_late_loan_notifier(deps: ServiceDependencies, message: String) {
    loop {
        let now = Utc::now();
        let run_date = now.date_naive() + Duration::days(1);
        let wait = duration_until_next_midnight(now);
        tracing::debug!(wait_secs = wait.as_secs(), %run_date, "late loan notifier sleeping");
        tokio::time::sleep(wait).await;

        if !has_reached(run_date, Utc::now()) {
            tracing::debug!(%run_date, "woke before midnight, waiting again");
            continue;
        }

        match notification::notify_late_loans(&deps, &message).await {
            Ok(recipients) => {
                tracing::info!(recipients, "late loan notification finished");
            }
            Err(e) => {
                tracing::error!(error = ?e, "late loan notification failed: {}", e);
            }
        }
    }
}
