//! The department → school → semester → class → subclass drill-down.

/// One level of the selection hierarchy, in containment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Department,
    School,
    Semester,
    Class,
    Subclass,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Department,
        Level::School,
        Level::Semester,
        Level::Class,
        Level::Subclass,
    ];

    /// Human label used in API messages (`"Department ID is required"`).
    pub fn label(self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::School => "School",
            Self::Semester => "Semester",
            Self::Class => "Class",
            Self::Subclass => "Subclass",
        }
    }

    pub fn child(self) -> Option<Level> {
        match self {
            Self::Department => Some(Self::School),
            Self::School => Some(Self::Semester),
            Self::Semester => Some(Self::Class),
            Self::Class => Some(Self::Subclass),
            Self::Subclass => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The ids picked so far while drilling down.
///
/// Choosing an id at one level clears every level below it, so a selection
/// never pairs a class with a semester it does not belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    slots: [Option<String>; 5],
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` at `level` and clear all descendant levels.
    pub fn set(&mut self, level: Level, id: impl Into<String>) {
        self.slots[level.index()] = Some(id.into());
        for slot in &mut self.slots[level.index() + 1..] {
            *slot = None;
        }
    }

    pub fn get(&self, level: Level) -> Option<&str> {
        self.slots[level.index()].as_deref()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The deepest selected level and its id.
    pub fn deepest(&self) -> Option<(Level, &str)> {
        Level::ALL
            .iter()
            .rev()
            .find_map(|&level| self.get(level).map(|id| (level, id)))
    }

    /// The level whose list should be shown next, or `None` once a subclass
    /// is chosen and the schedule can be loaded.
    pub fn next_level(&self) -> Option<Level> {
        match self.deepest() {
            None => Some(Level::Department),
            Some((level, _)) => level.child(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clears_descendants() {
        let mut selection = Selection::new();
        selection.set(Level::Department, "6976");
        selection.set(Level::School, "12");
        selection.set(Level::Semester, "13");
        selection.set(Level::Class, "14");
        selection.set(Level::Subclass, "15");

        selection.set(Level::School, "99");

        assert_eq!(selection.get(Level::Department), Some("6976"));
        assert_eq!(selection.get(Level::School), Some("99"));
        assert_eq!(selection.get(Level::Semester), None);
        assert_eq!(selection.get(Level::Class), None);
        assert_eq!(selection.get(Level::Subclass), None);
    }

    #[test]
    fn test_setting_department_resets_everything_below() {
        let mut selection = Selection::new();
        selection.set(Level::Department, "1");
        selection.set(Level::School, "2");
        selection.set(Level::Department, "3");
        assert_eq!(selection.deepest(), Some((Level::Department, "3")));
    }

    #[test]
    fn test_next_level_walks_hierarchy() {
        let mut selection = Selection::new();
        assert_eq!(selection.next_level(), Some(Level::Department));

        selection.set(Level::Department, "1");
        assert_eq!(selection.next_level(), Some(Level::School));

        selection.set(Level::School, "2");
        selection.set(Level::Semester, "3");
        assert_eq!(selection.next_level(), Some(Level::Class));

        selection.set(Level::Class, "4");
        selection.set(Level::Subclass, "5");
        assert_eq!(selection.next_level(), None);

        selection.reset();
        assert_eq!(selection, Selection::new());
    }

    #[test]
    fn test_child_follows_containment_order() {
        let children: Vec<_> = Level::ALL.iter().filter_map(|level| level.child()).collect();
        assert_eq!(children, Level::ALL[1..].to_vec());
        assert_eq!(Level::Subclass.child(), None);
    }
}
