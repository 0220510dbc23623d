/// Record state definitions for tracking crawl progress
///
/// This module defines all possible states a cached skin page can be in.
use std::fmt;

/// Represents the current state of a skin page in the cache
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RecordState {
    /// Page has not been fetched yet (or the last fetch failed before it was updated)
    #[default]
    Pending,

    /// Page was fetched and both identifiers were extracted
    Resolved {
        /// Steam workshop id of the skin
        workshop_id: u64,
        /// Shortname of the item the skin applies to
        item_id: String,
    },

    /// Page has no skin data worth keeping; never crawled again
    ///
    /// Whatever identifiers were known when the page was ignored are kept so
    /// that saving the cache never drops them.
    Ignored {
        workshop_id: Option<u64>,
        item_id: String,
    },
}

impl RecordState {
    /// A page ignored without any known identifiers
    pub fn ignored() -> Self {
        Self::Ignored {
            workshop_id: None,
            item_id: String::new(),
        }
    }

    /// Returns true if the page still needs to be fetched
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the page was resolved to a workshop id
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Returns true if the page is permanently skipped
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored { .. })
    }

    /// Returns the workshop id, if resolved
    pub fn workshop_id(&self) -> Option<u64> {
        match self {
            Self::Resolved { workshop_id, .. } => Some(*workshop_id),
            _ => None,
        }
    }

    /// Returns the item shortname, if resolved
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Self::Resolved { item_id, .. } => Some(item_id),
            _ => None,
        }
    }

    /// Returns a short label for the state, used in logs and statistics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved { .. } => "resolved",
            Self::Ignored { .. } => "ignored",
        }
    }

    /// Builds a state from the flat on-disk fields
    ///
    /// `ignore` wins over everything else. A workshop id together with an item
    /// shortname means the page was resolved. A workshop id without a
    /// shortname cannot be grouped, so the page is ignored and keeps its id.
    /// No workshop id (the `-1` sentinel) means the page is still pending.
    pub fn from_fields(workshop_id: Option<u64>, item_id: String, ignore: bool) -> Self {
        match workshop_id {
            _ if ignore => Self::Ignored {
                workshop_id,
                item_id,
            },
            Some(workshop_id) if item_id.is_empty() => Self::Ignored {
                workshop_id: Some(workshop_id),
                item_id,
            },
            Some(workshop_id) => Self::Resolved {
                workshop_id,
                item_id,
            },
            None => Self::Pending,
        }
    }

    /// Flattens the state into `(workshopid, itemid, ignore)` on-disk fields
    ///
    /// A `None` workshop id is written as the `-1` sentinel.
    pub fn to_fields(&self) -> (Option<u64>, String, bool) {
        match self {
            Self::Pending => (None, String::new(), false),
            Self::Resolved {
                workshop_id,
                item_id,
            } => (Some(*workshop_id), item_id.clone(), false),
            Self::Ignored {
                workshop_id,
                item_id,
            } => (*workshop_id, item_id.clone(), true),
        }
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved {
                workshop_id,
                item_id,
            } => write!(f, "resolved({} -> {})", workshop_id, item_id),
            other => f.write_str(other.label()),
        }
    }
}
