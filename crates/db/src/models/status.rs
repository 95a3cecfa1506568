//! Status helper enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Planning-entity workflow status, shared by initiatives and tasks.
    WorkflowStatus {
        Backlog = 1,
        ToDo = 2,
        InProgress = 3,
        Done = 4,
        Blocked = 5,
        Archived = 6,
    }
}

impl WorkflowStatus {
    /// Snake-case name used in LLM contracts and MCP tool arguments.
    pub fn as_name(self) -> &'static str {
        match self {
            WorkflowStatus::Backlog => "backlog",
            WorkflowStatus::ToDo => "to_do",
            WorkflowStatus::InProgress => "in_progress",
            WorkflowStatus::Done => "done",
            WorkflowStatus::Blocked => "blocked",
            WorkflowStatus::Archived => "archived",
        }
    }

    /// Parse the snake-case name back into a status.
    pub fn parse_name(name: &str) -> Option<Self> {
        match name {
            "backlog" => Some(WorkflowStatus::Backlog),
            "to_do" => Some(WorkflowStatus::ToDo),
            "in_progress" => Some(WorkflowStatus::InProgress),
            "done" => Some(WorkflowStatus::Done),
            "blocked" => Some(WorkflowStatus::Blocked),
            "archived" => Some(WorkflowStatus::Archived),
            _ => None,
        }
    }

    /// Look up a status by its database ID.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(WorkflowStatus::Backlog),
            2 => Some(WorkflowStatus::ToDo),
            3 => Some(WorkflowStatus::InProgress),
            4 => Some(WorkflowStatus::Done),
            5 => Some(WorkflowStatus::Blocked),
            6 => Some(WorkflowStatus::Archived),
            _ => None,
        }
    }
}

define_status_enum! {
    /// AI improvement job lifecycle status.
    JobStatus {
        Pending = 1,
        Processing = 2,
        Completed = 3,
        Failed = 4,
        Canceled = 5,
    }
}
