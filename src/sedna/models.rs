//! Typed records produced from Sedna pages.
//!
//! Every record is built fresh by one extraction call. Foreign keys are never
//! read from the HTML; they are the parent id the caller passed in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub name: String,
    pub department_id: String,
}

/// The two term markers Sedna lists under a school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemesterName {
    #[serde(rename = "S1")]
    First,
    #[serde(rename = "S2")]
    Second,
}

impl SemesterName {
    /// Parse the exact link label used by the portal (`S1` or `S2`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "S1" => Some(Self::First),
            "S2" => Some(Self::Second),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: String,
    pub name: SemesterName,
    pub school_id: String,
}

/// A class group inside a semester (`A`, `B`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    pub semester_id: String,
}

/// A subclass (`A1`, `S2B`, ...). Its id is the only key the planning page accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subclass {
    pub id: String,
    pub name: String,
    pub class_id: String,
}

/// One calendar entry from a planning page.
///
/// `id` is `{subclass}-{day}-{start}-{end}`: stable for a given fetch, not
/// unique across fetches with different parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professor: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
}

/// What an extraction call was asked to list; carried by empty-result errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listing {
    Departments,
    Schools,
    Semesters,
    Classes,
    Subclasses,
    Schedule,
}

impl Listing {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Departments => "departments",
            Self::Schools => "schools",
            Self::Semesters => "semesters",
            Self::Classes => "classes",
            Self::Subclasses => "subclasses",
            Self::Schedule => "schedule events",
        }
    }
}
