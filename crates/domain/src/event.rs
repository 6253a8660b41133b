use crate::date::{days_in_month, parse_weekday, DateKey, DateWindow};
use crate::occurrence::Occurrence;
use crate::recurrence::{interpret, RecurrenceRule, ScheduleInterpretation};
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    OpenMic,
    Showcase,
    SongwriterRound,
    Workshop,
    Jam,
    #[default]
    Other,
}

/// Underlying types covered by the synthetic "shows" category used in
/// saved digest filters.
pub const SHOWS_CATEGORY: &[EventType] = &[
    EventType::Showcase,
    EventType::SongwriterRound,
    EventType::OpenMic,
];

impl EventType {
    /// Total parse for database tokens, unknown tokens fall back to `Other`.
    pub fn parse(token: &str) -> Self {
        match token {
            "open_mic" => Self::OpenMic,
            "showcase" => Self::Showcase,
            "songwriter_round" => Self::SongwriterRound,
            "workshop" => Self::Workshop,
            "jam" => Self::Jam,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenMic => "open_mic",
            Self::Showcase => "showcase",
            Self::SongwriterRound => "songwriter_round",
            Self::Workshop => "workshop",
            Self::Jam => "jam",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Active,
    Archived,
}

impl EventStatus {
    pub fn parse(token: &str) -> Self {
        match token {
            "archived" => Self::Archived,
            _ => Self::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

/// A listed event: the schedule-relevant fields driving occurrence
/// expansion plus the display fields an occurrence inherits unless a
/// per-date override patches them.
#[derive(Debug, Clone, Default)]
pub struct Event {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    /// Anchor date of the series (or the single date of a one-time event).
    pub event_date: Option<DateKey>,
    /// Raw weekday name as entered by the host, e.g. "Monday".
    pub day_of_week: Option<String>,
    /// Opaque cadence token, see `RecurrenceRule::parse`.
    pub recurrence_rule: Option<String>,
    /// Explicit date list for irregular series.
    pub custom_dates: Option<Vec<DateKey>>,
    /// Cap on total projected occurrences, counted from the anchor.
    pub max_occurrences: Option<u32>,
    pub start_time: Option<chrono::NaiveTime>,
    pub end_time: Option<chrono::NaiveTime>,
    pub cover_image_url: Option<String>,
    pub venue_id: Option<ID>,
    pub custom_location_name: Option<String>,
    pub custom_location_address: Option<String>,
    pub host_notes: Option<String>,
    /// Tri-state cost flag: free, paid, or unknown when unset.
    pub is_free: Option<bool>,
    pub event_type: EventType,
    pub published: bool,
    pub status: EventStatus,
    pub created: i64,
    pub updated: i64,
}

impl Entity for Event {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Event {
    pub fn interpretation(&self) -> ScheduleInterpretation {
        interpret(self)
    }

    /// Projects the event's schedule onto the given closed window. Output
    /// is sorted ascending with no duplicates. Unconfident schedules and
    /// inverted windows expand to nothing. Pure: same inputs, same output.
    pub fn expand(&self, window: &DateWindow) -> Vec<Occurrence> {
        if !self.interpretation().is_confident || window.start() > window.end() {
            return Vec::new();
        }

        let dates = if let Some(custom) = self
            .custom_dates
            .as_deref()
            .filter(|dates| !dates.is_empty())
        {
            Self::custom_occurrence_dates(custom, self.max_occurrences, window)
        } else if let Some(rule) = self
            .recurrence_rule
            .as_deref()
            .and_then(RecurrenceRule::parse)
        {
            match rule {
                RecurrenceRule::Weekly => self.cadence_occurrence_dates(window, 1),
                RecurrenceRule::Biweekly => self.cadence_occurrence_dates(window, 2),
                RecurrenceRule::Monthly => self.monthly_occurrence_dates(window),
            }
        } else {
            match self.event_date {
                Some(anchor) if window.contains(anchor) => vec![anchor],
                _ => Vec::new(),
            }
        };

        dates
            .into_iter()
            .map(|date_key| Occurrence {
                date_key,
                is_confident: true,
            })
            .collect()
    }

    /// Weekly (`interval_weeks == 1`) and biweekly (`interval_weeks == 2`)
    /// cadences. The sequence origin is the first matching weekday on or
    /// after the anchor (window start when no anchor); `max_occurrences`
    /// counts absolute sequence positions from that origin, so occurrences
    /// elapsed before the window still consume the cap.
    fn cadence_occurrence_dates(&self, window: &DateWindow, interval_weeks: i64) -> Vec<DateKey> {
        let weekday = match self.day_of_week.as_deref().and_then(parse_weekday) {
            Some(weekday) => weekday,
            None => return Vec::new(),
        };
        let step_days = 7 * interval_weeks;

        let origin = self
            .event_date
            .unwrap_or_else(|| window.start())
            .next_on_or_after(weekday);

        let scan_from = if origin > window.start() {
            origin
        } else {
            window.start()
        };
        let mut candidate = scan_from.next_on_or_after(weekday);

        // Same weekday, so the offset is a whole number of weeks. Align
        // the first candidate to the cadence parity of the origin.
        let misaligned = origin.days_until(candidate) % step_days;
        if misaligned != 0 {
            candidate = candidate.add_days(step_days - misaligned);
        }

        let mut dates = Vec::new();
        while candidate <= window.end() {
            let position = origin.days_until(candidate) / step_days + 1;
            if let Some(cap) = self.max_occurrences {
                if position > cap as i64 {
                    break;
                }
            }
            dates.push(candidate);
            candidate = candidate.add_days(step_days);
        }
        dates
    }

    /// The anchor's day-of-month for every month from the anchor forward.
    /// Months without that day are skipped outright, never rolled over,
    /// and a skipped month does not consume a `max_occurrences` slot.
    fn monthly_occurrence_dates(&self, window: &DateWindow) -> Vec<DateKey> {
        let anchor = match self.event_date {
            Some(anchor) => anchor,
            None => return Vec::new(),
        };
        let day = anchor.day();
        let (mut year, mut month) = (anchor.year(), anchor.month());

        let mut emitted: u32 = 0;
        let mut dates = Vec::new();
        loop {
            match DateKey::from_ymd(year, month, 1) {
                Some(month_start) if month_start <= window.end() => {}
                _ => break,
            }
            if day <= days_in_month(year, month) {
                if let Some(candidate) = DateKey::from_ymd(year, month, day) {
                    if candidate <= window.end() {
                        emitted += 1;
                        if let Some(cap) = self.max_occurrences {
                            if emitted > cap {
                                break;
                            }
                        }
                        if candidate >= window.start() {
                            dates.push(candidate);
                        }
                    }
                }
            }
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }
        dates
    }

    /// The cap truncates the full sorted list before windowing, so a cap
    /// can exclude dates that would otherwise be in range.
    fn custom_occurrence_dates(
        custom: &[DateKey],
        max_occurrences: Option<u32>,
        window: &DateWindow,
    ) -> Vec<DateKey> {
        let mut all = custom.to_vec();
        all.sort_unstable();
        all.dedup();
        if let Some(cap) = max_occurrences {
            all.truncate(cap as usize);
        }
        all.into_iter()
            .filter(|date| window.contains(*date))
            .collect()
    }
}
