//! Conflict resolution policies for INSERT and UPDATE statements

use serde::{Deserialize, Serialize};

/// SQLite ON CONFLICT algorithm applied to a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConflictAction {
    /// No explicit clause; the database default applies
    #[default]
    None,
    Rollback,
    Abort,
    Fail,
    Ignore,
    Replace,
}

impl ConflictAction {
    /// Clause inserted after the INSERT/UPDATE keyword, including its
    /// leading space; empty for `None`.
    pub fn sql_infix(&self) -> &'static str {
        match self {
            ConflictAction::None => "",
            ConflictAction::Rollback => " OR ROLLBACK",
            ConflictAction::Abort => " OR ABORT",
            ConflictAction::Fail => " OR FAIL",
            ConflictAction::Ignore => " OR IGNORE",
            ConflictAction::Replace => " OR REPLACE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_infix() {
        assert_eq!(ConflictAction::None.sql_infix(), "");
        assert_eq!(ConflictAction::Replace.sql_infix(), " OR REPLACE");
        assert_eq!(ConflictAction::default(), ConflictAction::None);
    }
}
