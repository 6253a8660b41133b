use crate::date::{parse_weekday, weekday_name};
use crate::event::Event;
use serde::{Deserialize, Serialize};

/// Repetition cadence parsed from the event's opaque rule token. Anything
/// else (typos, legacy tokens) is treated as an unknown schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceRule {
    Weekly,
    Biweekly,
    Monthly,
}

impl RecurrenceRule {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "weekly" => Some(Self::Weekly),
            "biweekly" => Some(Self::Biweekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterpretation {
    pub is_recurring: bool,
    /// Whether the schedule carries enough information to project concrete
    /// dates. Unconfident events surface as "unknown schedule" and expand
    /// to nothing.
    pub is_confident: bool,
    pub cadence: Option<String>,
}

/// Pure read of an event's raw schedule fields. Tolerates all-null input.
pub fn interpret(event: &Event) -> ScheduleInterpretation {
    let has_custom_dates = event
        .custom_dates
        .as_ref()
        .map_or(false, |dates| !dates.is_empty());
    let is_recurring = event.recurrence_rule.is_some() || has_custom_dates;

    if !is_recurring {
        return ScheduleInterpretation {
            is_recurring: false,
            is_confident: event.event_date.is_some(),
            cadence: None,
        };
    }

    // An explicit date list wins over a cadence token. The dates are taken
    // as given, and no rule-based cadence label applies.
    if has_custom_dates {
        return ScheduleInterpretation {
            is_recurring: true,
            is_confident: true,
            cadence: None,
        };
    }

    let rule = event
        .recurrence_rule
        .as_deref()
        .and_then(RecurrenceRule::parse);
    let weekday = event.day_of_week.as_deref().and_then(parse_weekday);

    let (is_confident, cadence) = match rule {
        Some(RecurrenceRule::Weekly) => match weekday {
            Some(weekday) => (true, Some(format!("Every {}", weekday_name(weekday)))),
            None => (false, None),
        },
        Some(RecurrenceRule::Biweekly) => match weekday {
            Some(weekday) => (true, Some(format!("Every other {}", weekday_name(weekday)))),
            None => (false, None),
        },
        Some(RecurrenceRule::Monthly) => {
            if event.event_date.is_some() {
                (true, Some("Monthly".to_string()))
            } else {
                (false, None)
            }
        }
        None => (false, None),
    };

    ScheduleInterpretation {
        is_recurring: true,
        is_confident,
        cadence,
    }
}
