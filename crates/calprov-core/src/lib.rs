//! Core types: calendars, events, time windows, tracing

pub mod calendar;
pub mod event;
pub mod time;
pub mod tracing;

pub use calendar::{
    AccessLevel, CalendarCreateRequest, CalendarDescriptor, CalendarHandle, CalendarSource,
    DEFAULT_CLOUD_SOURCE_NAME, EntityType, Platform, SourceRef,
};
pub use event::{Alarm, AlarmMethod, EventDescriptor};
pub use time::{EventWindow, InvalidWindow};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
