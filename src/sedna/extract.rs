//! Extractors for the `mselect.jsp` hierarchy pages.
//!
//! Each hierarchy page is a list of links. Links to `mselect.jsp?id=` open
//! the next level, links to `mplanif.jsp?id=` open a planning directly. The
//! id is the `id` query parameter of the link; the parent id is supplied by
//! the caller, never read from the page.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::sedna::document::{DocumentReader, HtmlDocument};
use crate::sedna::errors::SednaError;
use crate::sedna::models::{
    Class, Department, Listing, School, Semester, SemesterName, Subclass,
};

/// Label of the navigation link back to the previous level.
pub const BACK_LABEL: &str = "Retour";

const SELECT_PREFIX: &str = "mselect.jsp?id=";
const PLANNING_PREFIX: &str = "mplanif.jsp?id=";

static SEMESTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^S[12]$").unwrap());
static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^S[0-9]+[A-D]$").unwrap());
static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^S[0-9]+[A-Z]$").unwrap());

/// Which page a link points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Select,
    Planning,
}

impl Target {
    fn of(href: &str) -> Option<Self> {
        if href.starts_with(SELECT_PREFIX) {
            Some(Self::Select)
        } else if href.starts_with(PLANNING_PREFIX) {
            Some(Self::Planning)
        } else {
            None
        }
    }
}

/// A usable link: known target, non-empty label, non-empty id.
#[derive(Debug)]
struct Entry {
    id: String,
    name: String,
    target: Target,
}

/// The `id` query parameter of a relative link, percent-decoded.
fn query_id(href: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}

fn entries(reader: &impl DocumentReader) -> Vec<Entry> {
    reader
        .anchors()
        .into_iter()
        .filter_map(|anchor| {
            let target = Target::of(&anchor.href)?;
            let name = anchor.text.trim();
            if name.is_empty() || name == BACK_LABEL {
                return None;
            }
            let Some(id) = query_id(&anchor.href) else {
                debug!(href = %anchor.href, "Link without id, skipping");
                return None;
            };
            Some(Entry {
                id,
                name: name.to_string(),
                target,
            })
        })
        .collect()
}

fn non_empty<T>(records: Vec<T>, listing: Listing) -> Result<Vec<T>, SednaError> {
    if records.is_empty() {
        return Err(SednaError::EmptyResult { listing });
    }
    debug!(listing = listing.as_str(), count = records.len(), "Extracted records");
    Ok(records)
}

pub fn departments_from(reader: &impl DocumentReader) -> Result<Vec<Department>, SednaError> {
    let departments = entries(reader)
        .into_iter()
        .filter(|entry| entry.target == Target::Select)
        .map(|entry| Department {
            id: entry.id,
            name: entry.name,
        })
        .collect();
    non_empty(departments, Listing::Departments)
}

/// Schools are the `mselect` links; `mplanif` shortcuts to a whole step are dropped.
pub fn schools_from(
    reader: &impl DocumentReader,
    department_id: &str,
) -> Result<Vec<School>, SednaError> {
    let schools = entries(reader)
        .into_iter()
        .filter(|entry| entry.target == Target::Select)
        .map(|entry| School {
            id: entry.id,
            name: entry.name,
            department_id: department_id.to_string(),
        })
        .collect();
    non_empty(schools, Listing::Schools)
}

pub fn semesters_from(
    reader: &impl DocumentReader,
    school_id: &str,
) -> Result<Vec<Semester>, SednaError> {
    let semesters = entries(reader)
        .into_iter()
        .filter(|entry| entry.target == Target::Select && SEMESTER_RE.is_match(&entry.name))
        .filter_map(|entry| {
            Some(Semester {
                name: SemesterName::from_label(&entry.name)?,
                id: entry.id,
                school_id: school_id.to_string(),
            })
        })
        .collect();
    non_empty(semesters, Listing::Semesters)
}

/// Class groups are labelled `S<n><A-D>`; the record keeps only the letter.
pub fn classes_from(
    reader: &impl DocumentReader,
    semester_id: &str,
) -> Result<Vec<Class>, SednaError> {
    let classes = entries(reader)
        .into_iter()
        .filter(|entry| entry.target == Target::Select && CLASS_RE.is_match(&entry.name))
        .map(|entry| {
            let letter = entry.name[entry.name.len() - 1..].to_string();
            Class {
                id: entry.id,
                name: letter,
                semester_id: semester_id.to_string(),
            }
        })
        .collect();
    non_empty(classes, Listing::Classes)
}

/// Subclasses are either direct planning links or `S<n><letter>` groups.
pub fn subclasses_from(
    reader: &impl DocumentReader,
    class_id: &str,
) -> Result<Vec<Subclass>, SednaError> {
    let subclasses = entries(reader)
        .into_iter()
        .filter(|entry| entry.target == Target::Planning || GROUP_RE.is_match(&entry.name))
        .map(|entry| Subclass {
            id: entry.id,
            name: entry.name,
            class_id: class_id.to_string(),
        })
        .collect();
    non_empty(subclasses, Listing::Subclasses)
}

pub fn departments(html: &str) -> Result<Vec<Department>, SednaError> {
    departments_from(&HtmlDocument::parse(html))
}

pub fn schools(html: &str, department_id: &str) -> Result<Vec<School>, SednaError> {
    schools_from(&HtmlDocument::parse(html), department_id)
}

pub fn semesters(html: &str, school_id: &str) -> Result<Vec<Semester>, SednaError> {
    semesters_from(&HtmlDocument::parse(html), school_id)
}

pub fn classes(html: &str, semester_id: &str) -> Result<Vec<Class>, SednaError> {
    classes_from(&HtmlDocument::parse(html), semester_id)
}

pub fn subclasses(html: &str, class_id: &str) -> Result<Vec<Subclass>, SednaError> {
    subclasses_from(&HtmlDocument::parse(html), class_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sedna::document::{Anchor, ChildNode};

    /// Synthetic reader: a fixed list of links, no HTML involved.
    struct Links(Vec<Anchor>);

    impl DocumentReader for Links {
        fn anchors(&self) -> Vec<Anchor> {
            self.0.clone()
        }

        fn child_nodes(&self, _container: &str) -> Vec<Vec<ChildNode>> {
            Vec::new()
        }
    }

    fn links(pairs: &[(&str, &str)]) -> Links {
        Links(
            pairs
                .iter()
                .map(|(href, text)| Anchor::new(*href, *text))
                .collect(),
        )
    }

    fn is_empty_result(result: Result<impl std::fmt::Debug, SednaError>, expected: Listing) {
        match result {
            Err(SednaError::EmptyResult { listing }) => assert_eq!(listing, expected),
            other => panic!("expected EmptyResult, got {other:?}"),
        }
    }

    #[test]
    fn test_query_id() {
        assert_eq!(query_id("mselect.jsp?id=6976"), Some("6976".into()));
        assert_eq!(query_id("mplanif.jsp?id=12&jours=7"), Some("12".into()));
        assert_eq!(query_id("mselect.jsp?jours=7&id=a%20b"), Some("a b".into()));
        assert_eq!(query_id("mselect.jsp?id="), None);
        assert_eq!(query_id("mselect.jsp"), None);
    }

    #[test]
    fn test_departments_three_links_and_back() {
        let html = r#"<html><body>
            <a href="mselect.jsp?id=1">Sciences</a><br>
            <a href="mselect.jsp?id=2"> Lettres </a><br>
            <a href="mselect.jsp?id=3">IUT</a><br>
            <a href="mselect.jsp?id=0">Retour</a>
        </body></html>"#;

        let departments = departments(html).unwrap();
        assert_eq!(
            departments,
            vec![
                Department { id: "1".into(), name: "Sciences".into() },
                Department { id: "2".into(), name: "Lettres".into() },
                Department { id: "3".into(), name: "IUT".into() },
            ]
        );
    }

    #[test]
    fn test_departments_empty_page() {
        is_empty_result(
            departments("<html><body><p>Maintenance</p></body></html>"),
            Listing::Departments,
        );
    }

    #[test]
    fn test_schools_drop_planning_shortcuts() {
        let reader = links(&[
            ("mselect.jsp?id=10", "BUT Informatique"),
            ("mplanif.jsp?id=11", "Etape"),
            ("mselect.jsp?id=12", "BUT GEA"),
            ("mselect.jsp?id=1", "Retour"),
            ("https://elsewhere", "Aide"),
        ]);
        let schools = schools_from(&reader, "6976").unwrap();
        let ids: Vec<_> = schools.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["10", "12"]);
        assert!(schools.iter().all(|s| s.department_id == "6976"));
    }

    #[test]
    fn test_semesters_only_term_markers() {
        let reader = links(&[
            ("mselect.jsp?id=20", "S1"),
            ("mselect.jsp?id=21", "S2"),
            ("mselect.jsp?id=22", "S3"),
            ("mselect.jsp?id=23", "Année"),
            ("mplanif.jsp?id=24", "S1"),
        ]);
        let semesters = semesters_from(&reader, "10").unwrap();
        assert_eq!(
            semesters,
            vec![
                Semester { id: "20".into(), name: SemesterName::First, school_id: "10".into() },
                Semester { id: "21".into(), name: SemesterName::Second, school_id: "10".into() },
            ]
        );
    }

    #[test]
    fn test_classes_keep_group_letter() {
        let reader = links(&[
            ("mselect.jsp?id=30", "S2A"),
            ("mselect.jsp?id=31", "S2B"),
            ("mselect.jsp?id=32", "S2E"),
            ("mselect.jsp?id=33", "S12D"),
            ("mselect.jsp?id=34", "TD A"),
        ]);
        let classes = classes_from(&reader, "21").unwrap();
        let names: Vec<_> = classes.iter().map(|c| (c.id.as_str(), c.name.as_str())).collect();
        assert_eq!(names, [("30", "A"), ("31", "B"), ("33", "D")]);
        assert!(classes.iter().all(|c| c.semester_id == "21"));
    }

    #[test]
    fn test_group_labels_need_ascii_digits() {
        let reader = links(&[
            ("mselect.jsp?id=30", "S٢A"),
            ("mselect.jsp?id=31", "S２B"),
            ("mselect.jsp?id=32", "S2C"),
        ]);
        let classes = classes_from(&reader, "21").unwrap();
        let ids: Vec<_> = classes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["32"]);

        let reader = links(&[("mselect.jsp?id=40", "S٣B")]);
        is_empty_result(subclasses_from(&reader, "30"), Listing::Subclasses);
    }

    #[test]
    fn test_classes_none_matching() {
        let reader = links(&[("mselect.jsp?id=1", "Retour"), ("mselect.jsp?id=2", "S2E")]);
        is_empty_result(classes_from(&reader, "21"), Listing::Classes);
    }

    #[test]
    fn test_subclasses_leaf_and_group_entries() {
        let reader = links(&[
            ("mplanif.jsp?id=40", "A1"),
            ("mplanif.jsp?id=41", "A2"),
            ("mselect.jsp?id=42", "S2A"),
            ("mselect.jsp?id=43", "Options"),
            ("mplanif.jsp?id=", "A3"),
            ("mselect.jsp?id=30", "Retour"),
        ]);
        let subclasses = subclasses_from(&reader, "30").unwrap();
        let names: Vec<_> = subclasses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A1", "A2", "S2A"]);
        assert!(subclasses.iter().all(|s| s.class_id == "30"));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let reader = links(&[("mselect.jsp?id=1", "A"), ("mselect.jsp?id=2", "B")]);
        assert_eq!(
            departments_from(&reader).unwrap(),
            departments_from(&reader).unwrap()
        );
    }
}
