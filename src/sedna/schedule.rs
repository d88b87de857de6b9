//! Extraction of calendar events from `mplanif.jsp` planning pages.
//!
//! A planning page is not structured per event. Under `body > font` it is a
//! flat run of siblings:
//!
//! ```text
//! lu 14 Mar 8h00-10h00 <a>Algorithmics</a> (Room 201) <br>
//! ma 15 Mar 13h30-15h30 <a>Networks</a> (Amphi B) <br>
//! ```
//!
//! The scan walks the text siblings in order. A text line matching the
//! schedule grammar takes its title from the next element sibling when that
//! is a link, and its location from the node right after the link. Lines that
//! are navigation noise or fail to parse are dropped; only a page with no
//! events at all is an error.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Europe::Paris;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::sedna::decode::decode_planning;
use crate::sedna::document::{ChildNode, DocumentReader, HtmlDocument};
use crate::sedna::errors::SednaError;
use crate::sedna::models::{Listing, ScheduleEvent};
use crate::sedna::months::{self, PortalMonth};

/// Element(s) whose children hold the planning lines.
pub const PLANNING_CONTAINER: &str = "body > font";

/// Location used when a line has no parenthesized room after its title.
pub const DEFAULT_LOCATION: &str = "IUT NFC";

/// `<day> <date> <month> <H>h<MM>-<H>h<MM>`; minutes may be empty.
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Za-z]{2})\s+([0-9]+)\s+([A-Za-zéû]+)\s+([0-9]{1,2})h([0-9]{0,2})-([0-9]{1,2})h([0-9]{0,2})",
    )
    .unwrap()
});

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((.*?)\)").unwrap());

/// How a noise pattern is compared against a trimmed line.
#[derive(Debug, Clone, Copy)]
enum Noise {
    Contains(&'static str),
    Exact(&'static str),
    Prefix(&'static str),
}

/// Navigation labels and banners that share the container with event lines.
/// Lines starting with `(` are room annotations already read by lookahead.
const NOISE: &[Noise] = &[
    Noise::Contains("Auj"),
    Noise::Contains("Demain"),
    Noise::Contains("Sem"),
    Noise::Contains("Affichage planning"),
    Noise::Exact("Retour"),
    Noise::Contains("Note :"),
    Noise::Exact(": Semaine"),
    Noise::Prefix("("),
];

/// Whether a trimmed line is navigation or annotation text.
pub fn is_noise(line: &str) -> bool {
    NOISE.iter().any(|noise| match *noise {
        Noise::Contains(needle) => line.contains(needle),
        Noise::Exact(label) => line == label,
        Noise::Prefix(prefix) => line.starts_with(prefix),
    })
}

/// The raw captures of a line matching the schedule grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleLine<'a> {
    pub weekday: &'a str,
    pub day: &'a str,
    pub month: &'a str,
    pub start_hour: &'a str,
    pub start_minute: &'a str,
    pub end_hour: &'a str,
    pub end_minute: &'a str,
}

impl<'a> ScheduleLine<'a> {
    pub fn parse(line: &'a str) -> Option<Self> {
        let caps = LINE_RE.captures(line)?;
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        Some(Self {
            weekday: group(1),
            day: group(2),
            month: group(3),
            start_hour: group(4),
            start_minute: group(5),
            end_hour: group(6),
            end_minute: group(7),
        })
    }

    /// `{day}-{start}-{end}` with empty minutes written as `00`.
    fn id_suffix(&self) -> String {
        format!(
            "{}-{}{}-{}{}",
            self.day,
            self.start_hour,
            or_zero(self.start_minute),
            self.end_hour,
            or_zero(self.end_minute),
        )
    }
}

fn or_zero(minutes: &str) -> &str {
    if minutes.is_empty() { "00" } else { minutes }
}

/// Why a candidate line produced no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoMatch,
    UnknownMonth(String),
    InvalidDate { day: String, month: &'static str },
    InvalidTime(String),
    InvertedInterval,
}

/// Result of classifying one non-noise line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Event(ScheduleEvent),
    Skip(SkipReason),
}

/// Title and room found after a schedule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookahead {
    pub title: String,
    pub location: String,
}

impl Lookahead {
    /// Title from the next element sibling if it is a link; location from the
    /// first `(...)` group of the node right after that link.
    pub fn after(nodes: &[ChildNode], index: usize) -> Self {
        let next_element = nodes
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, node)| node.is_element());

        match next_element {
            Some((anchor_index, anchor)) if anchor.is_anchor() => {
                let trailing = nodes
                    .get(anchor_index + 1)
                    .map(|node| node.text().trim())
                    .unwrap_or_default();
                Self {
                    title: anchor.text().trim().to_string(),
                    location: location_in(trailing),
                }
            }
            _ => Self {
                title: String::new(),
                location: DEFAULT_LOCATION.to_string(),
            },
        }
    }
}

fn location_in(text: &str) -> String {
    LOCATION_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|room| !room.is_empty())
        .unwrap_or(DEFAULT_LOCATION)
        .to_string()
}

/// Builds events for one subclass, dating every line in a fixed year.
///
/// The page never prints a year. Callers pass the current one, so a window
/// that crosses New Year dates its January lines in the old year.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleParser<'a> {
    subclass_id: &'a str,
    year: i32,
}

impl<'a> ScheduleParser<'a> {
    pub fn new(subclass_id: &'a str, year: i32) -> Self {
        Self { subclass_id, year }
    }

    /// Turn a matched line and its lookahead into an event.
    pub fn build(&self, line: &ScheduleLine<'_>, lookahead: Lookahead) -> LineOutcome {
        match self.try_build(line, lookahead) {
            Ok(event) => LineOutcome::Event(event),
            Err(reason) => LineOutcome::Skip(reason),
        }
    }

    fn try_build(
        &self,
        line: &ScheduleLine<'_>,
        lookahead: Lookahead,
    ) -> Result<ScheduleEvent, SkipReason> {
        let month: PortalMonth = months::resolve(line.month)
            .ok_or_else(|| SkipReason::UnknownMonth(line.month.to_string()))?;

        let invalid_date = || SkipReason::InvalidDate {
            day: line.day.to_string(),
            month: month.name,
        };
        let day: u32 = line.day.parse().map_err(|_| invalid_date())?;
        let date =
            NaiveDate::from_ymd_opt(self.year, month.number(), day).ok_or_else(invalid_date)?;

        let start = at(date, line.start_hour, line.start_minute)?;
        let end = at(date, line.end_hour, line.end_minute)?;
        if start >= end {
            return Err(SkipReason::InvertedInterval);
        }

        Ok(ScheduleEvent {
            id: format!("{}-{}", self.subclass_id, line.id_suffix()),
            title: lookahead.title,
            start,
            end,
            location: lookahead.location,
            professor: None,
            kind: None,
            description: None,
            all_day: Some(false),
        })
    }

    /// Classify the text node at `index`; `None` for blank or noise lines.
    pub fn classify(&self, nodes: &[ChildNode], index: usize) -> Option<LineOutcome> {
        let ChildNode::Text(raw) = nodes.get(index)? else {
            return None;
        };
        let text = raw.trim();
        if text.is_empty() || is_noise(text) {
            return None;
        }

        let Some(line) = ScheduleLine::parse(text) else {
            return Some(LineOutcome::Skip(SkipReason::NoMatch));
        };
        Some(self.build(&line, Lookahead::after(nodes, index)))
    }

    /// Scan one sibling run, keeping document order.
    pub fn scan(&self, nodes: &[ChildNode]) -> Vec<ScheduleEvent> {
        let mut events = Vec::new();
        for index in 0..nodes.len() {
            match self.classify(nodes, index) {
                Some(LineOutcome::Event(event)) => events.push(event),
                Some(LineOutcome::Skip(reason)) => log_skip(nodes[index].text().trim(), &reason),
                None => {}
            }
        }
        events
    }
}

/// Compose a UTC instant from the date and raw `H`/`MM` captures. The
/// portal's wall-clock time is stored as UTC and shifted only for display.
fn at(date: NaiveDate, hour: &str, minute: &str) -> Result<DateTime<Utc>, SkipReason> {
    let invalid = || SkipReason::InvalidTime(format!("{hour}h{minute}"));
    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = if minute.is_empty() {
        0
    } else {
        minute.parse().map_err(|_| invalid())?
    };
    date.and_hms_opt(hour, minute, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(invalid)
}

fn log_skip(line: &str, reason: &SkipReason) {
    match reason {
        SkipReason::NoMatch => debug!(line, "Line did not match schedule pattern"),
        SkipReason::UnknownMonth(abbreviation) => {
            warn!(line, month = %abbreviation, "Unknown month abbreviation, skipping line")
        }
        SkipReason::InvalidDate { day, month } => {
            warn!(line, day = %day, month, "Invalid date, skipping line")
        }
        SkipReason::InvalidTime(time) => warn!(line, time = %time, "Invalid time, skipping line"),
        SkipReason::InvertedInterval => warn!(line, "Event ends before it starts, skipping line"),
    }
}

/// Current calendar year at the institution.
pub fn current_year() -> i32 {
    Utc::now().with_timezone(&Paris).year()
}

/// Events from an already parsed page.
pub fn events_from(
    reader: &impl DocumentReader,
    subclass_id: &str,
    year: i32,
) -> Result<Vec<ScheduleEvent>, SednaError> {
    let parser = ScheduleParser::new(subclass_id, year);
    let events: Vec<ScheduleEvent> = reader
        .child_nodes(PLANNING_CONTAINER)
        .iter()
        .flat_map(|nodes| parser.scan(nodes))
        .collect();

    if events.is_empty() {
        warn!(subclass_id, "No events found in planning page");
        return Err(SednaError::EmptyResult {
            listing: Listing::Schedule,
        });
    }
    debug!(subclass_id, count = events.len(), "Parsed planning page");
    Ok(events)
}

/// Decode, parse and scan a raw planning page, dating lines in `year`.
#[instrument(skip(document), fields(bytes = document.len()))]
pub fn extract_schedule_in_year(
    document: &[u8],
    subclass_id: &str,
    day_window: u32,
    year: i32,
) -> Result<Vec<ScheduleEvent>, SednaError> {
    let html = decode_planning(document)?;
    events_from(&HtmlDocument::parse(&html), subclass_id, year)
}

/// Decode, parse and scan a raw planning page, dating lines in the current year.
///
/// `day_window` is the window the page was requested with; the page itself
/// already reflects it and it is only recorded for diagnostics.
pub fn extract_schedule(
    document: &[u8],
    subclass_id: &str,
    day_window: u32,
) -> Result<Vec<ScheduleEvent>, SednaError> {
    extract_schedule_in_year(document, subclass_id, day_window, current_year())
}
