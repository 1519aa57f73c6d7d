//! # Record operations
//!
//! Every function in here is a pure function of its inputs: it takes the
//! current [`RecordList`] by reference and hands back the next one. Nothing
//! here touches storage, the network, or the terminal. The API layer decides
//! when a new list is worth persisting by comparing it with the previous one.

use crate::model::RecordList;

pub mod add;
pub mod delete;
pub mod init;
pub mod list;
pub mod toggle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What a facade call hands back to a binding: the snapshot to render and
/// anything worth telling the user.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub list: RecordList,
    pub changed: bool,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn new(list: RecordList) -> Self {
        Self {
            list,
            ..Default::default()
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_changed(mut self, changed: bool) -> Self {
        self.changed = changed;
        self
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{Record, RecordList};

    /// `[1: "A" done, 3: "C" open]`, the shape used by most operation tests.
    pub fn sparse_list() -> RecordList {
        RecordList::from_records(vec![
            Record::new(1, "A").with_completed(true),
            Record::new(3, "C"),
        ])
    }
}
