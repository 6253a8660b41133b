use crate::date::{parse_weekday, DateKey, DateWindow};
use crate::event::{Event, EventType, SHOWS_CATEGORY};
use crate::geo::{centroid, haversine_miles, BoundingBox};
use crate::overrides::{apply_override, EffectiveOccurrence, OccurrenceOverride};
use crate::shared::entity::ID;
use crate::venue::Venue;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// The fixed Sunday-through-Saturday span containing the reference day.
pub fn week_window(today: DateKey) -> DateWindow {
    let start = today.add_days(-(today.weekday().num_days_from_sunday() as i64));
    DateWindow::new(start, start.add_days(6))
}

/// A dated agenda over one window: surviving occurrences grouped by date,
/// plus the aggregate counts the rendering collaborator needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    pub by_date: BTreeMap<DateKey, Vec<EffectiveOccurrence>>,
    pub total_count: usize,
    pub venue_count: usize,
}

impl Digest {
    pub fn from_groups(by_date: BTreeMap<DateKey, Vec<EffectiveOccurrence>>) -> Self {
        let total_count = by_date.values().map(Vec::len).sum();
        let venue_count = by_date
            .values()
            .flatten()
            .filter_map(|occurrence| occurrence.venue_id())
            .unique()
            .count();
        Self {
            by_date,
            total_count,
            venue_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// Expands every event over the window, drops cancelled and unconfident
/// occurrences, merges active override patches, and groups by date. Within
/// a date occurrences sort by start time, missing times last.
pub fn build_digest(
    events: &[Event],
    window: &DateWindow,
    overrides: &[OccurrenceOverride],
) -> Digest {
    let override_lookup: HashMap<(&ID, DateKey), &OccurrenceOverride> = overrides
        .iter()
        .map(|o| ((&o.event_id, o.date_key), o))
        .collect();

    let mut by_date: BTreeMap<DateKey, Vec<EffectiveOccurrence>> = BTreeMap::new();
    for event in events {
        for occurrence in event.expand(window) {
            if !occurrence.is_confident {
                continue;
            }
            let overridden = override_lookup
                .get(&(&event.id, occurrence.date_key))
                .copied();
            if overridden.map_or(false, |o| o.is_cancelled()) {
                continue;
            }
            by_date
                .entry(occurrence.date_key)
                .or_default()
                .push(apply_override(event, &occurrence, overridden));
        }
    }

    for occurrences in by_date.values_mut() {
        occurrences.sort_by_key(|o| (o.start_time.is_none(), o.start_time));
    }

    Digest::from_groups(by_date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostFilter {
    Free,
    Paid,
    /// The free/paid flag itself is unset on the event.
    Unknown,
}

impl CostFilter {
    pub fn matches(&self, is_free: Option<bool>) -> bool {
        matches!(
            (self, is_free),
            (Self::Free, Some(true)) | (Self::Paid, Some(false)) | (Self::Unknown, None)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    /// Synthetic category covering the fixed set of show-like types.
    Shows,
    Type(EventType),
}

impl CategoryFilter {
    pub fn matches(&self, event_type: EventType) -> bool {
        match self {
            Self::Shows => SHOWS_CATEGORY.contains(&event_type),
            Self::Type(wanted) => *wanted == event_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationFilter {
    pub zip: Option<String>,
    pub city: Option<String>,
    pub radius_miles: Option<f64>,
}

/// Per-recipient criteria for personalizing an already-built digest.
/// Saved filters only subset the digest; they never change what
/// occurrences exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedFilter {
    pub categories: Option<Vec<CategoryFilter>>,
    pub cost: Option<CostFilter>,
    /// Raw weekday names as saved by the recipient.
    pub weekdays: Option<Vec<String>>,
    pub location: Option<LocationFilter>,
}

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Unrecognized weekday name in saved filter: `{0}`")]
    UnknownWeekday(String),
    #[error("Location filter has neither zip nor city")]
    EmptyLocation,
}

/// Re-filters a built digest for one recipient. Counts are recomputed on
/// the surviving occurrences. An error marks the saved filter unusable;
/// the caller falls back to the unfiltered digest instead of failing the
/// batch.
pub fn filter_for_recipient(
    digest: &Digest,
    filter: &SavedFilter,
    venues: &[Venue],
    default_radius_miles: f64,
) -> Result<Digest, FilterError> {
    let weekdays = filter
        .weekdays
        .as_ref()
        .map(|names| {
            names
                .iter()
                .map(|name| {
                    parse_weekday(name).ok_or_else(|| FilterError::UnknownWeekday(name.clone()))
                })
                .collect::<Result<HashSet<_>, _>>()
        })
        .transpose()?;

    let allowed_venues = filter
        .location
        .as_ref()
        .map(|location| venues_in_reach(location, venues, default_radius_miles))
        .transpose()?;

    let mut by_date: BTreeMap<DateKey, Vec<EffectiveOccurrence>> = BTreeMap::new();
    for (date, occurrences) in &digest.by_date {
        let kept: Vec<EffectiveOccurrence> = occurrences
            .iter()
            .filter(|occurrence| {
                if let Some(categories) = &filter.categories {
                    if !categories.iter().any(|c| c.matches(occurrence.event_type)) {
                        return false;
                    }
                }
                if let Some(cost) = &filter.cost {
                    if !cost.matches(occurrence.is_free) {
                        return false;
                    }
                }
                if let Some(weekdays) = &weekdays {
                    // Evaluated on the occurrence's own date key so a
                    // rescheduled date filters by where it actually lands.
                    if !weekdays.contains(&occurrence.date_key.weekday()) {
                        return false;
                    }
                }
                if let Some(allowed) = &allowed_venues {
                    match occurrence.venue_id() {
                        Some(venue_id) => {
                            if !allowed.contains(venue_id) {
                                return false;
                            }
                        }
                        None => return false,
                    }
                }
                true
            })
            .cloned()
            .collect();
        if !kept.is_empty() {
            by_date.insert(*date, kept);
        }
    }

    Ok(Digest::from_groups(by_date))
}

/// Venues admitted by a location constraint: the exact zip/city matches,
/// widened by any venue whose great-circle distance from the matches'
/// centroid is within the radius. Zero exact matches admit nothing; there
/// is no radius-only fallback.
fn venues_in_reach(
    location: &LocationFilter,
    venues: &[Venue],
    default_radius_miles: f64,
) -> Result<HashSet<ID>, FilterError> {
    let matched: Vec<&Venue> = if let Some(zip) = &location.zip {
        venues
            .iter()
            .filter(|v| v.zip.as_deref() == Some(zip.as_str()))
            .collect()
    } else if let Some(city) = &location.city {
        venues
            .iter()
            .filter(|v| {
                v.city
                    .as_deref()
                    .map_or(false, |c| c.eq_ignore_ascii_case(city))
            })
            .collect()
    } else {
        return Err(FilterError::EmptyLocation);
    };

    if matched.is_empty() {
        return Ok(HashSet::new());
    }

    let mut allowed: HashSet<ID> = matched.iter().map(|v| v.id.clone()).collect();

    let coordinates: Vec<(f64, f64)> = matched.iter().filter_map(|v| v.coordinates()).collect();
    if let Some(center) = centroid(&coordinates) {
        let radius = location.radius_miles.unwrap_or(default_radius_miles);
        let bbox = BoundingBox::around(center, radius);
        for venue in venues {
            if let Some(point) = venue.coordinates() {
                if bbox.contains(point) && haversine_miles(center, point) <= radius {
                    allowed.insert(venue.id.clone());
                }
            }
        }
    }

    Ok(allowed)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::overrides::{OverrideStatus, OccurrenceOverride};
    use chrono::NaiveTime;

    fn key(s: &str) -> DateKey {
        s.parse().expect("Valid date key")
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("Valid time")
    }

    fn one_time_event(title: &str, date: &str) -> Event {
        Event {
            title: title.into(),
            event_date: Some(key(date)),
            published: true,
            ..Default::default()
        }
    }

    fn venue_at(name: &str, zip: &str, coordinates: Option<(f64, f64)>) -> Venue {
        let mut venue = Venue::new(name);
        venue.zip = Some(zip.into());
        venue.city = Some("Denver".into());
        if let Some((lat, lng)) = coordinates {
            venue.latitude = Some(lat);
            venue.longitude = Some(lng);
        }
        venue
    }

    // Sunday 2026-08-23 .. Saturday 2026-08-29
    fn digest_week() -> DateWindow {
        week_window(key("2026-08-26"))
    }

    #[test]
    fn week_window_is_sunday_through_saturday() {
        let window = week_window(key("2026-08-26")); // a Wednesday
        assert_eq!(window.start(), key("2026-08-23"));
        assert_eq!(window.end(), key("2026-08-29"));

        // A Sunday reference day starts its own week.
        let window = week_window(key("2026-08-23"));
        assert_eq!(window.start(), key("2026-08-23"));
    }

    #[test]
    fn cancelled_occurrence_never_appears_in_the_digest() {
        // Weekly Monday event; the Monday inside the digest week is
        // cancelled via an override for that exact date key.
        let event = Event {
            title: "Monday Round".into(),
            event_date: Some(key("2026-07-27")),
            day_of_week: Some("Monday".into()),
            recurrence_rule: Some("weekly".into()),
            ..Default::default()
        };
        // Expansion alone still produces the Monday.
        assert_eq!(
            event.expand(&digest_week())[0].date_key,
            key("2026-08-24")
        );

        let mut cancellation = OccurrenceOverride::new(event.id.clone(), key("2026-08-24"));
        cancellation.status = OverrideStatus::Cancelled;

        let digest = build_digest(&[event], &digest_week(), &[cancellation]);
        assert!(!digest.by_date.contains_key(&key("2026-08-24")));
        assert_eq!(digest.total_count, 0);
    }

    #[test]
    fn active_override_patch_shows_in_the_digest() {
        let mut event = one_time_event("Workshop", "2026-08-25");
        event.start_time = Some(time(18, 0));

        let mut reschedule = OccurrenceOverride::new(event.id.clone(), key("2026-08-25"));
        reschedule.patch.start_time = Some(time(20, 0));

        let digest = build_digest(&[event], &digest_week(), &[reschedule]);
        let occurrences = digest.by_date.get(&key("2026-08-25")).expect("Occurrences");
        assert_eq!(occurrences[0].start_time, Some(time(20, 0)));
    }

    #[test]
    fn occurrences_without_start_time_sort_last() {
        let mut early = one_time_event("Early", "2026-08-25");
        early.start_time = Some(time(17, 0));
        let mut late = one_time_event("Late", "2026-08-25");
        late.start_time = Some(time(21, 0));
        let untimed = one_time_event("Untimed", "2026-08-25");

        let digest = build_digest(&[untimed, late, early], &digest_week(), &[]);
        let titles: Vec<_> = digest.by_date[&key("2026-08-25")]
            .iter()
            .map(|o| o.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Early", "Late", "Untimed"]);
    }

    #[test]
    fn venue_count_is_distinct_venues() {
        let venue_a = ID::new();
        let venue_b = ID::new();
        let mut e1 = one_time_event("A", "2026-08-24");
        e1.venue_id = Some(venue_a.clone());
        let mut e2 = one_time_event("B", "2026-08-25");
        e2.venue_id = Some(venue_a.clone());
        let mut e3 = one_time_event("C", "2026-08-26");
        e3.venue_id = Some(venue_b);
        let e4 = one_time_event("D", "2026-08-27");

        let digest = build_digest(&[e1, e2, e3, e4], &digest_week(), &[]);
        assert_eq!(digest.total_count, 4);
        assert_eq!(digest.venue_count, 2);
    }

    #[test]
    fn cost_filter_keeps_only_matching_occurrences() {
        let venue = venue_at("Mercury Cafe", "80205", Some((39.7560, -104.9774)));
        let mut events = Vec::new();
        for i in 0..5 {
            let mut event = one_time_event(&format!("Free {}", i), "2026-08-24");
            event.is_free = Some(true);
            event.venue_id = Some(venue.id.clone());
            events.push(event);
        }
        for i in 0..3 {
            let mut event = one_time_event(&format!("Paid {}", i), "2026-08-25");
            event.is_free = Some(false);
            events.push(event);
        }

        let digest = build_digest(&events, &digest_week(), &[]);
        assert_eq!(digest.total_count, 8);

        let filter = SavedFilter {
            cost: Some(CostFilter::Free),
            ..Default::default()
        };
        let personalized =
            filter_for_recipient(&digest, &filter, &[venue], 25.0).expect("Usable filter");
        assert_eq!(personalized.total_count, 5);
        assert_eq!(personalized.venue_count, 1);
        assert!(!personalized.by_date.contains_key(&key("2026-08-25")));
    }

    #[test]
    fn unknown_cost_matches_unset_flag_only() {
        assert!(CostFilter::Unknown.matches(None));
        assert!(!CostFilter::Unknown.matches(Some(true)));
        assert!(!CostFilter::Free.matches(None));
        assert!(CostFilter::Paid.matches(Some(false)));
    }

    #[test]
    fn shows_category_matches_the_fixed_set() {
        assert!(CategoryFilter::Shows.matches(EventType::Showcase));
        assert!(CategoryFilter::Shows.matches(EventType::OpenMic));
        assert!(CategoryFilter::Shows.matches(EventType::SongwriterRound));
        assert!(!CategoryFilter::Shows.matches(EventType::Workshop));
        assert!(CategoryFilter::Type(EventType::Workshop).matches(EventType::Workshop));
    }

    #[test]
    fn weekday_filter_uses_the_occurrence_date() {
        let monday = one_time_event("Monday show", "2026-08-24");
        let thursday = one_time_event("Thursday show", "2026-08-27");
        let digest = build_digest(&[monday, thursday], &digest_week(), &[]);

        let filter = SavedFilter {
            weekdays: Some(vec!["Thursday".into()]),
            ..Default::default()
        };
        let personalized =
            filter_for_recipient(&digest, &filter, &[], 25.0).expect("Usable filter");
        assert_eq!(personalized.total_count, 1);
        assert!(personalized.by_date.contains_key(&key("2026-08-27")));
    }

    #[test]
    fn malformed_weekday_marks_the_filter_unusable() {
        let digest = build_digest(&[], &digest_week(), &[]);
        let filter = SavedFilter {
            weekdays: Some(vec!["Thurzday".into()]),
            ..Default::default()
        };
        assert_eq!(
            filter_for_recipient(&digest, &filter, &[], 25.0),
            Err(FilterError::UnknownWeekday("Thurzday".into()))
        );
    }

    #[test]
    fn zip_with_no_exact_match_yields_empty_not_radius_fallback() {
        // The venue is well within any radius of downtown Denver but its
        // zip is not 80202, so the location filter admits nothing.
        let venue = venue_at("Syntax Physic Opera", "80209", Some((39.7093, -104.9878)));
        let mut event = one_time_event("Round", "2026-08-24");
        event.venue_id = Some(venue.id.clone());

        let digest = build_digest(&[event], &digest_week(), &[]);
        assert_eq!(digest.total_count, 1);

        let filter = SavedFilter {
            location: Some(LocationFilter {
                zip: Some("80202".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let personalized =
            filter_for_recipient(&digest, &filter, &[venue], 25.0).expect("Usable filter");
        assert!(personalized.is_empty());
    }

    #[test]
    fn radius_widens_an_exact_zip_match() {
        let downtown = venue_at("Larimer Lounge", "80202", Some((39.7530, -104.9880)));
        let nearby = venue_at("Boulder Theater", "80302", Some((40.0190, -105.2780)));
        let faraway = venue_at("Moby Arena", "80521", Some((40.5764, -105.0917)));

        let mut e1 = one_time_event("Downtown", "2026-08-24");
        e1.venue_id = Some(downtown.id.clone());
        let mut e2 = one_time_event("Nearby", "2026-08-25");
        e2.venue_id = Some(nearby.id.clone());
        let mut e3 = one_time_event("Faraway", "2026-08-26");
        e3.venue_id = Some(faraway.id.clone());

        let digest = build_digest(&[e1, e2, e3], &digest_week(), &[]);
        let venues = vec![downtown, nearby, faraway];

        let filter = SavedFilter {
            location: Some(LocationFilter {
                zip: Some("80202".into()),
                radius_miles: Some(30.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let personalized =
            filter_for_recipient(&digest, &filter, &venues, 25.0).expect("Usable filter");
        // The exact match and the venue within 30 miles survive; the one
        // ~60 miles out does not.
        assert_eq!(personalized.total_count, 2);
        assert!(personalized.by_date.contains_key(&key("2026-08-24")));
        assert!(personalized.by_date.contains_key(&key("2026-08-25")));
        assert!(!personalized.by_date.contains_key(&key("2026-08-26")));
    }

    #[test]
    fn location_filter_without_zip_or_city_is_unusable() {
        let digest = build_digest(&[], &digest_week(), &[]);
        let filter = SavedFilter {
            location: Some(LocationFilter::default()),
            ..Default::default()
        };
        assert_eq!(
            filter_for_recipient(&digest, &filter, &[], 25.0),
            Err(FilterError::EmptyLocation)
        );
    }
}
