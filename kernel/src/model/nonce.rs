use std::fmt;

// フォームごとに発行するワンタイムトークンの用途名
pub const REGISTER_EVENT_ACTION: &str = "en_register_event";
pub const SAVE_EVENT_META_ACTION: &str = "en_save_event_meta";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceToken(pub String);

impl NonceToken {
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
