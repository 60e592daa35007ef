//! Entities that can be looked up by name

use std::fmt;

/// An entity snapshot that can take part in a name search.
///
/// Tasks and comments expose their `content`, everything else its `name`.
pub trait Candidate {
    /// Stable, opaque identifier assigned by the service
    fn id(&self) -> &str;

    /// Text matched against a free-text reference
    fn display_name(&self) -> &str;

    /// Formats the candidate as a disambiguation hint: `"<name>" (id:<id>)`
    fn hint(&self) -> String {
        format!("\"{}\" (id:{})", self.display_name(), self.id())
    }
}

/// The kind of entity a reference points at, used for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Task,
    ParentTask,
    Project,
    Section,
    Label,
    Comment,
}

impl EntityKind {
    /// Lower-case singular noun (`"parent task"`)
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Task => "task",
            EntityKind::ParentTask => "parent task",
            EntityKind::Project => "project",
            EntityKind::Section => "section",
            EntityKind::Label => "label",
            EntityKind::Comment => "comment",
        }
    }

    /// Lower-case plural noun
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Task | EntityKind::ParentTask => "tasks",
            EntityKind::Project => "projects",
            EntityKind::Section => "sections",
            EntityKind::Label => "labels",
            EntityKind::Comment => "comments",
        }
    }

    /// Capitalized noun for the start of a sentence
    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::Task => "Task",
            EntityKind::ParentTask => "Parent task",
            EntityKind::Project => "Project",
            EntityKind::Section => "Section",
            EntityKind::Label => "Label",
            EntityKind::Comment => "Comment",
        }
    }

    /// Upper-case fragment used in error codes (`TASK_NOT_FOUND`)
    pub fn code(&self) -> &'static str {
        match self {
            EntityKind::Task | EntityKind::ParentTask => "TASK",
            EntityKind::Project => "PROJECT",
            EntityKind::Section => "SECTION",
            EntityKind::Label => "LABEL",
            EntityKind::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, &'static str);

    impl Candidate for Named {
        fn id(&self) -> &str {
            self.0
        }

        fn display_name(&self) -> &str {
            self.1
        }
    }

    #[test]
    fn hint_quotes_name_and_prefixes_id() {
        assert_eq!(Named("p-1", "Work").hint(), "\"Work\" (id:p-1)");
    }

    #[test]
    fn parent_task_shares_task_codes() {
        assert_eq!(EntityKind::ParentTask.code(), "TASK");
        assert_eq!(EntityKind::ParentTask.plural(), "tasks");
        assert_eq!(EntityKind::ParentTask.to_string(), "parent task");
    }
}
