use garde::Validate;
use serde::Deserialize;

// 公開側の登録フォームの送信内容
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterEventRequest {
    #[garde(skip)]
    pub action: String,
    #[garde(skip)]
    pub event_id: String,
    #[garde(length(min = 1, max = 100))]
    pub en_user_name: String,
    #[garde(email, length(max = 100))]
    pub en_user_email: String,
    #[garde(skip)]
    pub en_registration_nonce: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str) -> RegisterEventRequest {
        RegisterEventRequest {
            action: "en_register_event".into(),
            event_id: "1".into(),
            en_user_name: name.into(),
            en_user_email: email.into(),
            en_registration_nonce: "token".into(),
        }
    }

    #[test]
    fn accepts_a_plain_submission() {
        assert!(request("Ann", "ann@x.com").validate(&()).is_ok());
    }

    #[test]
    fn rejects_invalid_email_and_empty_name() {
        assert!(request("Ann", "not-an-email").validate(&()).is_err());
        assert!(request("", "ann@x.com").validate(&()).is_err());
    }

    #[test]
    fn rejects_values_over_the_column_limit() {
        let long = "x".repeat(101);
        assert!(request(&long, "ann@x.com").validate(&()).is_err());
        let long_email = format!("{}@x.com", "x".repeat(101));
        assert!(request("Ann", &long_email).validate(&()).is_err());
    }
}
