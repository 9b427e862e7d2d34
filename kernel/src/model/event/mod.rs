pub mod event;

use crate::model::id::EventId;
use chrono::{DateTime, NaiveDate, Utc};

// event_meta テーブルに格納するメタキー
pub const EVENT_DATE_KEY: &str = "event_date";
pub const EVENT_TIME_KEY: &str = "event_time";
pub const EVENT_LOCATION_KEY: &str = "event_location";
pub const EVENT_CAPACITY_KEY: &str = "event_capacity";

#[derive(Debug)]
pub struct Event {
    pub event_id: EventId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// イベントに紐づくメタデータ。値はすべてテキストで保存されるため、
// 日付と定員は読み出し時にここでパースする。
#[derive(Debug, Clone, Default)]
pub struct EventDetails {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i64>,
}

impl EventDetails {
    pub fn from_raw(
        date: Option<String>,
        time: Option<String>,
        location: Option<String>,
        capacity: Option<String>,
    ) -> Self {
        Self {
            // パースできない日付は未設定扱いにする
            date: date
                .as_deref()
                .and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok()),
            time: time.filter(|v| !v.trim().is_empty()),
            location: location.filter(|v| !v.trim().is_empty()),
            capacity: capacity.as_deref().and_then(parse_capacity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none() && self.location.is_none() && self.capacity.is_none()
    }

    // 開催日が過ぎているか。日付未設定のイベントは開催前として扱う
    pub fn is_past(&self, today: NaiveDate) -> bool {
        matches!(self.date, Some(date) if date < today)
    }

    pub fn is_full(&self, registered_count: i64) -> bool {
        matches!(self.capacity, Some(capacity) if registered_count >= capacity)
    }

    pub fn remaining_seats(&self, registered_count: i64) -> Option<i64> {
        self.capacity.map(|capacity| (capacity - registered_count).max(0))
    }
}

// 定員はテキストで保存されるため数値へ変換する。
// 数値にならない、または 0 以下の場合は定員なしとする
pub fn parse_capacity(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|v| *v > 0)
}
