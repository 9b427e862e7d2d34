pub mod event;

use crate::model::id::{EventId, RegistrationId};
use chrono::{DateTime, Utc};

#[derive(Debug)]
pub struct Registration {
    pub registration_id: RegistrationId,
    pub user_name: String,
    pub user_email: String,
    pub registration_date: DateTime<Utc>,
    pub event: RegistrationEvent,
}

// ホスト側でイベントが削除された登録はタイトルが取れないため Option にする
#[derive(Debug)]
pub struct RegistrationEvent {
    pub event_id: EventId,
    pub title: Option<String>,
}

// 登録処理の結末。リダイレクト先の registered クエリパラメータとして
// そのまま文字列化される
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RegistrationOutcome {
    Success,
    Error,
    Duplicate,
    Full,
}

// 重複チェックと定員チェックの判定。None なら登録を続行してよい。
// 重複は定員に関係なく優先される
pub fn evaluate_registration(
    already_registered: bool,
    registered_count: i64,
    capacity: Option<i64>,
) -> Option<RegistrationOutcome> {
    if already_registered {
        return Some(RegistrationOutcome::Duplicate);
    }
    match capacity {
        Some(capacity) if registered_count >= capacity => Some(RegistrationOutcome::Full),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, 0, Some(2), None)]
    #[case(false, 1, Some(2), None)]
    #[case(false, 2, Some(2), Some(RegistrationOutcome::Full))]
    #[case(false, 3, Some(2), Some(RegistrationOutcome::Full))]
    #[case(true, 0, Some(2), Some(RegistrationOutcome::Duplicate))]
    // 満席でも重複が優先される
    #[case(true, 2, Some(2), Some(RegistrationOutcome::Duplicate))]
    #[case(false, 10_000, None, None)]
    #[case(true, 10_000, None, Some(RegistrationOutcome::Duplicate))]
    fn evaluates_duplicate_then_capacity(
        #[case] already_registered: bool,
        #[case] registered_count: i64,
        #[case] capacity: Option<i64>,
        #[case] expected: Option<RegistrationOutcome>,
    ) {
        assert_eq!(
            evaluate_registration(already_registered, registered_count, capacity),
            expected
        );
    }

    #[test]
    fn outcome_renders_as_lowercase_query_value() {
        assert_eq!(RegistrationOutcome::Success.to_string(), "success");
        assert_eq!(RegistrationOutcome::Duplicate.to_string(), "duplicate");
        assert_eq!(RegistrationOutcome::Full.to_string(), "full");
        assert_eq!(RegistrationOutcome::Error.to_string(), "error");
        assert_eq!(
            "full".parse::<RegistrationOutcome>().ok(),
            Some(RegistrationOutcome::Full)
        );
    }

    // 定員 2 のイベントに対する一連の申し込みの流れ
    #[test]
    fn capacity_two_scenario() {
        let capacity = Some(2);
        let mut emails: Vec<String> = Vec::new();

        let submit = |emails: &mut Vec<String>, email: &str| {
            let already = emails.iter().any(|e| e == email);
            let outcome = evaluate_registration(already, emails.len() as i64, capacity);
            if outcome.is_none() {
                emails.push(email.to_string());
            }
            outcome
        };

        assert_eq!(submit(&mut emails, "ann@x.com"), None);
        assert_eq!(emails.len(), 1);

        assert_eq!(
            submit(&mut emails, "ann@x.com"),
            Some(RegistrationOutcome::Duplicate)
        );
        assert_eq!(emails.len(), 1);

        assert_eq!(submit(&mut emails, "bob@x.com"), None);
        assert_eq!(emails.len(), 2);

        assert_eq!(
            submit(&mut emails, "cat@x.com"),
            Some(RegistrationOutcome::Full)
        );
        assert_eq!(emails.len(), 2);
    }
}
