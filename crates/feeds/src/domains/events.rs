use crate::{
    credential, fallback_events, EventSettings, Feed, FeedError, FeedSource, FeedsConfig,
    Upstream, UpstreamRequest,
};
use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime};
use utoipa::ToSchema;

pub const MAX_EVENTS: usize = 5;
/// Upstream events considered before trimming to `MAX_EVENTS`
const EVENT_CANDIDATES: usize = 10;
const DESCRIPTION_LIMIT: usize = 100;
const PAID_CEILING: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Free,
    Paid,
    Premium,
}

impl PriceType {
    pub fn from_amount(amount: f64) -> Self {
        if amount <= 0.0 {
            PriceType::Free
        } else if amount <= PAID_CEILING {
            PriceType::Paid
        } else {
            PriceType::Premium
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub upcoming: Vec<Event>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub title: String,
    pub date: String,
    pub day: String,
    pub time: String,
    pub venue: String,
    pub description: String,
    pub price: String,
    pub price_type: PriceType,
}

/// Events are kept raw so one malformed entry can be skipped on its own.
#[derive(Clone, Debug, Deserialize)]
pub struct EventSearchResponse {
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpstreamEvent {
    pub name: Option<TextField>,
    pub description: Option<TextField>,
    pub start: Option<LocalTime>,
    pub end: Option<LocalTime>,
    pub venue: Option<Venue>,
    pub ticket_availability: Option<TicketAvailability>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TextField {
    pub text: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LocalTime {
    /// Venue local time, `2024-06-15T19:00:00`
    pub local: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Venue {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TicketAvailability {
    pub minimum_ticket_price: Option<TicketPrice>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TicketPrice {
    pub major_value: Option<PriceValue>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    pub fn amount(&self) -> Result<f64, FeedError> {
        let amount = match self {
            PriceValue::Number(amount) => Some(*amount),
            PriceValue::Text(text) => text.trim().parse::<f64>().ok(),
        };
        amount
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| FeedError::InvalidValue(format!("ticket price {:?}", self)))
    }
}

impl UpstreamEvent {
    /// No listed price means the event is free.
    fn min_price(&self) -> Result<f64, FeedError> {
        self.ticket_availability
            .as_ref()
            .and_then(|tickets| tickets.minimum_ticket_price.as_ref())
            .and_then(|price| price.major_value.as_ref())
            .map(PriceValue::amount)
            .unwrap_or(Ok(0.0))
    }
}

pub fn price_label(amount: f64) -> String {
    if amount <= 0.0 {
        String::from("Free")
    } else if amount.fract() == 0.0 {
        format!("${}", amount as i64)
    } else {
        format!("${:.2}", amount)
    }
}

pub fn truncate_description(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_LIMIT {
        let mut truncated: String = text.chars().take(DESCRIPTION_LIMIT).collect();
        truncated.push_str("...");
        truncated
    } else {
        text.to_owned()
    }
}

fn parse_local(value: &str) -> Result<PrimitiveDateTime, FeedError> {
    Ok(PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )?)
}

fn clock(at: PrimitiveDateTime) -> Result<String, FeedError> {
    Ok(at.format(format_description!(
        "[hour repr:12 padding:none]:[minute] [period]"
    ))?)
}

pub fn display_event(event: &UpstreamEvent) -> Result<Event, FeedError> {
    let start = event
        .start
        .as_ref()
        .ok_or_else(|| FeedError::InvalidValue(String::from("event has no start time")))?;
    let start = parse_local(&start.local)?;
    let time = match &event.end {
        Some(end) => format!("{} - {}", clock(start)?, clock(parse_local(&end.local)?)?),
        None => clock(start)?,
    };
    let day = start.day().to_string();
    let month = start
        .format(format_description!("[month repr:short]"))?
        .to_uppercase();
    let amount = event.min_price()?;

    Ok(Event {
        title: event
            .name
            .as_ref()
            .and_then(|name| name.text.clone())
            .unwrap_or_else(|| String::from("Untitled event")),
        date: format!("{} {}", month, day),
        day,
        time,
        venue: event
            .venue
            .as_ref()
            .and_then(|venue| venue.name.clone())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| String::from("TBA")),
        description: event
            .description
            .as_ref()
            .and_then(|description| description.text.as_deref())
            .map(truncate_description)
            .unwrap_or_else(|| String::from("Event details available on registration")),
        price: price_label(amount),
        price_type: PriceType::from_amount(amount),
    })
}

fn read_event(value: &serde_json::Value) -> Result<Event, FeedError> {
    let event = UpstreamEvent::deserialize(value)?;
    display_event(&event)
}

pub fn upcoming_events(events: &[serde_json::Value]) -> Vec<Event> {
    events
        .iter()
        .take(EVENT_CANDIDATES)
        .filter_map(|event| match read_event(event) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("skipping event with unreadable details: {}", e);
                None
            }
        })
        .take(MAX_EVENTS)
        .collect()
}

pub struct EventSource {
    settings: EventSettings,
}

impl EventSource {
    pub fn new(config: &FeedsConfig) -> Self {
        EventSource {
            settings: config.events.clone(),
        }
    }
}

#[async_trait]
impl FeedSource for EventSource {
    type Query = ();
    type Record = EventRecord;

    fn feed(&self) -> Feed {
        Feed::Events
    }

    async fn fetch(&self, upstream: &dyn Upstream, _query: &()) -> Result<EventRecord, FeedError> {
        let token = credential(&self.settings.token).ok_or_else(|| {
            FeedError::MissingCredential(String::from("Eventbrite token not configured"))
        })?;

        let request = UpstreamRequest::get(format!(
            "{}/events/search/",
            self.settings.base_url.trim_end_matches('/')
        ))
        .query("location.address", &self.settings.address)
        .query("location.within", format!("{}mi", self.settings.within_miles))
        .query("expand", "venue")
        .query("sort_by", "date")
        .bearer(token);
        let response = upstream.get(request).await?;
        if !response.is_success() {
            return Err(FeedError::Status {
                upstream: "Eventbrite API",
                status: response.status,
            });
        }

        let search: EventSearchResponse = response.json()?;
        let upcoming = upcoming_events(&search.events);
        if upcoming.is_empty() {
            return Err(FeedError::NoData(String::from("No upcoming events found")));
        }
        Ok(EventRecord {
            upcoming,
            last_updated: OffsetDateTime::now_utc(),
        })
    }

    fn fallback(&self, _err: &FeedError) -> Option<EventRecord> {
        Some(EventRecord {
            upcoming: fallback_events(),
            last_updated: OffsetDateTime::now_utc(),
        })
    }
}
