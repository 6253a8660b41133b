mod date;
pub mod digest;
mod event;
mod geo;
mod occurrence;
mod overrides;
mod recurrence;
mod shared;
mod subscriber;
mod venue;

pub use date::{
    days_in_month, is_leap_year, parse_weekday, weekday_name, DateKey, DateWindow, InvalidDateKey,
};
pub use digest::{
    build_digest, filter_for_recipient, week_window, CategoryFilter, CostFilter, Digest,
    FilterError, LocationFilter, SavedFilter,
};
pub use event::{Event, EventStatus, EventType, SHOWS_CATEGORY};
pub use geo::{centroid, haversine_miles, BoundingBox};
pub use occurrence::Occurrence;
pub use overrides::{
    apply_override, first_present, EffectiveLocation, EffectiveOccurrence, OccurrenceOverride,
    OverridePatch, OverrideStatus,
};
pub use recurrence::{interpret, RecurrenceRule, ScheduleInterpretation};
pub use shared::entity::{Entity, ID};
pub use subscriber::DigestSubscriber;
pub use venue::Venue;
