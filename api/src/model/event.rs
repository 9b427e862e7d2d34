use garde::Validate;
use serde::Deserialize;

// 編集画面からの保存の種類。自動保存とリビジョンは
// メタデータの書き込み対象にしない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    #[default]
    Manual,
    Autosave,
    Revision,
}

// 編集画面の保存フォーム。日付は必須、それ以外のメタは任意
#[derive(Debug, Deserialize, Validate)]
pub struct SaveEventRequest {
    #[garde(length(min = 1, max = 200))]
    pub title: String,
    #[garde(skip)]
    #[serde(default)]
    pub body: String,
    #[garde(length(min = 1))]
    pub en_event_date: String,
    #[garde(skip)]
    #[serde(default)]
    pub en_event_time: String,
    #[garde(skip)]
    #[serde(default)]
    pub en_event_location: String,
    #[garde(skip)]
    #[serde(default)]
    pub en_event_capacity: String,
    #[garde(skip)]
    pub en_event_nonce: String,
    #[garde(skip)]
    #[serde(default)]
    pub save_kind: SaveKind,
}

// 公開側イベントページのクエリ。登録後のリダイレクトで
// registered=success|error|duplicate|full が付く
#[derive(Debug, Deserialize)]
pub struct EventPageQuery {
    pub registered: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, date: &str) -> SaveEventRequest {
        SaveEventRequest {
            title: title.into(),
            body: "".into(),
            en_event_date: date.into(),
            en_event_time: "".into(),
            en_event_location: "".into(),
            en_event_capacity: "".into(),
            en_event_nonce: "token".into(),
            save_kind: SaveKind::Manual,
        }
    }

    #[test]
    fn date_is_required_on_save() {
        assert!(request("Meetup", "2030-05-01").validate(&()).is_ok());
        assert!(request("Meetup", "").validate(&()).is_err());
        assert!(request("", "2030-05-01").validate(&()).is_err());
    }

    #[test]
    fn save_kind_defaults_to_manual() {
        assert_eq!(SaveKind::default(), SaveKind::Manual);
    }
}
