//! Wire types shared with the reminder service.
//!
//! The server owns every field here; the client never derives scheduling
//! state locally (see `Reminder::is_completed` for the one read-side
//! projection it keeps).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cached profile of the logged-in user. Replaced wholesale on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

/// Body of a successful `auth-with-password` call.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub record: UserProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    OneTime,
    Recurring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    Solar,
    Lunar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Active,
    Paused,
    Completed,
}

/// Repeat cadence attached to a recurring reminder.
///
/// One fixed shape per cadence kind, tagged by `frequency` on the wire.
/// The client only constructs and forwards these; evaluating them (next
/// occurrence, lunar conversion) is entirely server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "snake_case")]
pub enum RecurrencePattern {
    Minute {
        interval: u32,
    },
    Hour {
        interval: u32,
    },
    Day {
        interval: u32,
    },
    Week {
        interval: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        day_of_week: Option<u8>,
    },
    Month {
        interval: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        day_of_month: Option<u8>,
    },
    Year {
        interval: u32,
    },
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n, unit) = match self {
            RecurrencePattern::Minute { interval } => (*interval, "minute"),
            RecurrencePattern::Hour { interval } => (*interval, "hour"),
            RecurrencePattern::Day { interval } => (*interval, "day"),
            RecurrencePattern::Week { interval, .. } => (*interval, "week"),
            RecurrencePattern::Month { interval, .. } => (*interval, "month"),
            RecurrencePattern::Year { interval } => (*interval, "year"),
        };
        if n == 1 {
            write!(f, "every {unit}")
        } else {
            write!(f, "every {n} {unit}s")
        }
    }
}

/// A reminder record as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    /// Owning user id.
    #[serde(default)]
    pub user: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    pub calendar_type: CalendarType,
    pub next_trigger_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_time_of_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub status: ReminderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_interval_sec: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snooze_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

impl Reminder {
    /// Derived read-model flag; `status` itself stays server-authoritative.
    pub fn is_completed(&self) -> bool {
        self.status == ReminderStatus::Completed
    }
}

/// Payload for creating a reminder.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReminder {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    pub calendar_type: CalendarType,
    pub next_trigger_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub status: ReminderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_interval_sec: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

/// Partial payload for editing a reminder; absent fields are left untouched
/// by the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReminder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReminderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_type: Option<CalendarType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_trigger_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReminderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snooze_until: Option<DateTime<Utc>>,
}

impl UpdateReminder {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.kind.is_none()
            && self.calendar_type.is_none()
            && self.next_trigger_at.is_none()
            && self.recurrence_pattern.is_none()
            && self.status.is_none()
            && self.snooze_until.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reminder_kind_uses_type_field_on_wire() {
        let dto = CreateReminder {
            title: "water plants".into(),
            description: None,
            kind: ReminderKind::OneTime,
            calendar_type: CalendarType::Solar,
            next_trigger_at: "2026-03-01T09:00:00Z".parse().unwrap(),
            recurrence_pattern: None,
            status: ReminderStatus::Active,
            retry_interval_sec: None,
            max_retries: None,
        };
        let v = serde_json::to_value(&dto).unwrap();
        assert_eq!(v["type"], "one_time");
        assert_eq!(v["calendar_type"], "solar");
        assert_eq!(v["status"], "active");
        assert!(v.get("description").is_none());
        assert!(v.get("recurrence_pattern").is_none());
    }

    #[test]
    fn recurrence_pattern_is_tagged_by_frequency() {
        let p = RecurrencePattern::Day { interval: 3 };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v, serde_json::json!({"frequency": "day", "interval": 3}));

        let back: RecurrencePattern =
            serde_json::from_value(serde_json::json!({"frequency": "week", "interval": 2}))
                .unwrap();
        assert_eq!(
            back,
            RecurrencePattern::Week {
                interval: 2,
                day_of_week: None
            }
        );
    }

    #[test]
    fn reminder_parses_server_record() {
        let raw = serde_json::json!({
            "id": "r1",
            "user": "u1",
            "title": "pay rent",
            "type": "recurring",
            "calendar_type": "lunar",
            "next_trigger_at": "2026-02-17T01:00:00Z",
            "recurrence_pattern": {"frequency": "month", "interval": 1},
            "status": "completed",
            "created": "2026-01-01 00:00:00.000Z",
            "updated": "2026-02-01 00:00:00.000Z"
        });
        let r: Reminder = serde_json::from_value(raw).unwrap();
        assert_eq!(r.kind, ReminderKind::Recurring);
        assert_eq!(r.calendar_type, CalendarType::Lunar);
        assert!(r.is_completed());
        assert_eq!(r.trigger_time_of_day, None);
    }

    #[test]
    fn update_reminder_serializes_only_set_fields() {
        let patch = UpdateReminder {
            title: Some("new title".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        let v = serde_json::to_value(&patch).unwrap();
        assert_eq!(v, serde_json::json!({"title": "new title"}));
        assert!(UpdateReminder::default().is_empty());
    }

    #[test]
    fn recurrence_display_is_human_readable() {
        assert_eq!(RecurrencePattern::Day { interval: 1 }.to_string(), "every day");
        assert_eq!(
            RecurrencePattern::Month {
                interval: 6,
                day_of_month: None
            }
            .to_string(),
            "every 6 months"
        );
    }
}
