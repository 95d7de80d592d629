//! Dashboard working-status toggles. A toggle only proposes a change; it is
//! applied once `addWorkingStatus` has been accepted.

use crate::ClientError;

pub const WORKING: &str = "Working";
pub const ON_BREAK: &str = "On Break";
pub const MEETING: &str = "Meeting";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub working_status: String,
    pub break_status: String,
    remember: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBoard {
    working_status: String,
    break_status: String,
    previous_working_status: String,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self {
            working_status: WORKING.into(),
            break_status: WORKING.into(),
            previous_working_status: WORKING.into(),
        }
    }
}

impl StatusBoard {
    /// Seeds the board from the server's view of today.
    pub fn from_server(working_status: &str, break_status: &str) -> Self {
        let or_working = |value: &str| {
            let value = value.trim();
            if value.is_empty() {
                WORKING.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            working_status: or_working(working_status),
            break_status: or_working(break_status),
            previous_working_status: WORKING.into(),
        }
    }

    /// Restores the status a break or meeting should return to.
    pub fn with_previous(mut self, previous: &str) -> Self {
        let previous = previous.trim();
        if !previous.is_empty() {
            self.previous_working_status = previous.to_string();
        }
        self
    }

    pub fn working_status(&self) -> &str {
        &self.working_status
    }

    pub fn break_status(&self) -> &str {
        &self.break_status
    }

    pub fn previous_working_status(&self) -> &str {
        &self.previous_working_status
    }

    pub fn is_on_break(&self) -> bool {
        self.break_status != WORKING
    }

    pub fn in_meeting(&self) -> bool {
        self.working_status == MEETING
    }

    pub fn take_break(&self) -> StatusChange {
        if self.is_on_break() {
            StatusChange {
                working_status: self.previous_working_status.clone(),
                break_status: WORKING.into(),
                remember: None,
            }
        } else {
            StatusChange {
                working_status: ON_BREAK.into(),
                break_status: ON_BREAK.into(),
                remember: Some(self.working_status.clone()),
            }
        }
    }

    pub fn toggle_meeting(&self) -> StatusChange {
        if self.in_meeting() {
            StatusChange {
                working_status: self.previous_working_status.clone(),
                break_status: self.break_status.clone(),
                remember: Some(WORKING.into()),
            }
        } else {
            StatusChange {
                working_status: MEETING.into(),
                break_status: self.break_status.clone(),
                remember: Some(self.working_status.clone()),
            }
        }
    }

    /// Free-text status; whitespace runs collapse to single spaces.
    pub fn custom(&self, text: &str) -> Result<StatusChange, ClientError> {
        let normalized = normalize_status(text);
        if normalized.is_empty() {
            return Err(ClientError::Validation("Custom Status is required".into()));
        }
        Ok(StatusChange {
            working_status: normalized,
            break_status: self.break_status.clone(),
            remember: None,
        })
    }

    pub fn apply(&mut self, change: StatusChange) {
        if let Some(previous) = change.remember {
            self.previous_working_status = previous;
        }
        self.working_status = change.working_status;
        self.break_status = change.break_status;
    }
}

pub fn normalize_status(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_round_trip_restores_previous_status() {
        let mut board = StatusBoard::default();
        let meeting = board.toggle_meeting();
        board.apply(meeting);
        assert_eq!(board.working_status(), MEETING);

        let pause = board.take_break();
        assert_eq!(pause.working_status, ON_BREAK);
        board.apply(pause);
        assert!(board.is_on_break());
        assert_eq!(board.previous_working_status(), MEETING);

        let resume = board.take_break();
        board.apply(resume);
        assert_eq!(board.working_status(), MEETING);
        assert_eq!(board.break_status(), WORKING);
    }

    #[test]
    fn leaving_a_meeting_resets_remembered_status() {
        let mut board = StatusBoard::from_server("Deep work", WORKING);
        board.apply(board.toggle_meeting());
        assert_eq!(board.previous_working_status(), "Deep work");

        board.apply(board.toggle_meeting());
        assert_eq!(board.working_status(), "Deep work");
        assert_eq!(board.previous_working_status(), WORKING);
    }

    #[test]
    fn unapplied_change_leaves_board_untouched() {
        let board = StatusBoard::default();
        let _ = board.take_break();
        assert_eq!(board, StatusBoard::default());
    }

    #[test]
    fn custom_status_is_normalized_and_required() {
        let board = StatusBoard::default();
        let change = board.custom("  Client   visit\tdowntown ").expect("valid");
        assert_eq!(change.working_status, "Client visit downtown");
        assert_eq!(change.break_status, WORKING);

        let err = board.custom(" \n ").expect_err("blank");
        assert_eq!(err.to_string(), "Custom Status is required");
    }

    #[test]
    fn restored_previous_status_is_used_on_resume() {
        let board = StatusBoard::from_server(ON_BREAK, ON_BREAK).with_previous("Deep work");
        let resume = board.take_break();
        assert_eq!(resume.working_status, "Deep work");
        assert_eq!(resume.break_status, WORKING);
    }

    #[test]
    fn blank_server_values_fall_back_to_working() {
        let board = StatusBoard::from_server("", " ");
        assert_eq!(board, StatusBoard::default());
    }
}
