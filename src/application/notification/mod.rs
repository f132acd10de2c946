mod late_loan_notifier;

pub use late_loan_notifier::{
    DEFAULT_LATE_LOANS_MESSAGE, notify_late_loans, notify_late_loans_as_of,
};
