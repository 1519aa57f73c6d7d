//! # API Facade
//!
//! [`TodozApi`] is what a binding holds on to. It owns the live
//! [`RecordList`] and nothing else does: bindings get snapshots back in every
//! [`CmdResult`] and render from those.
//!
//! The facade adds three things on top of the pure operations in
//! [`crate::commands`]:
//!
//! - **Load gating.** Until [`TodozApi::initialize`] has resolved, mutations
//!   are ignored. Initializing after a user edit would silently throw that
//!   edit away.
//! - **Save on change.** After a mutation the new list is compared with the
//!   old one and persisted only if it differs.
//! - **External adoption.** Another instance writing the same slot is handled
//!   by validating its value like a normal load and replacing the whole list
//!   (last writer wins).
//!
//! Create one per session and drop it when the session ends.

use crate::commands;
use crate::error::Result;
use crate::model::RecordList;
use crate::persistence::{self, PersistenceAdapter};
use crate::seed::{self, SeedSource};
use crate::store::StorageBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

pub struct TodozApi<B: StorageBackend> {
    persistence: PersistenceAdapter<B>,
    list: RecordList,
    state: LoadState,
}

impl<B: StorageBackend> TodozApi<B> {
    pub fn new(persistence: PersistenceAdapter<B>) -> Self {
        Self {
            persistence,
            list: RecordList::new(),
            state: LoadState::Loading,
        }
    }

    pub fn list(&self) -> &RecordList {
        &self.list
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn persistence(&self) -> &PersistenceAdapter<B> {
        &self.persistence
    }

    /// Resolves the starting list: the persisted slot if there is one,
    /// otherwise the seed. The seed is only fetched when nothing usable is
    /// persisted. Always ends in [`LoadState::Ready`], even when the fetch
    /// fails.
    pub async fn initialize<S: SeedSource + ?Sized>(&mut self, source: &S) -> CmdResult {
        if !self.is_loading() {
            return self.snapshot();
        }
        let persisted = self.persistence.load_existing();
        let seed = match &persisted {
            Ok(Some(_)) => None,
            Ok(None) | Err(_) => seed::fetch_or_empty(source).await,
        };
        self.finish_initialize(seed, persisted)
    }

    /// Same as [`initialize`](Self::initialize) without any network access.
    pub fn initialize_offline(&mut self) -> CmdResult {
        if !self.is_loading() {
            return self.snapshot();
        }
        let persisted = self.persistence.load_existing();
        self.finish_initialize(None, persisted)
    }

    fn finish_initialize(
        &mut self,
        seed: Option<RecordList>,
        persisted: Result<Option<RecordList>>,
    ) -> CmdResult {
        // An unreadable slot is never overwritten by the seed.
        let (persisted, unreadable) = match persisted {
            Ok(persisted) => (persisted, false),
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted slot, leaving it untouched");
                (None, true)
            }
        };
        let from_seed = persisted.is_none() && seed.is_some();
        let seed_missing = persisted.is_none() && seed.is_none();

        self.list = commands::init::run(seed, persisted);
        self.state = LoadState::Ready;

        let mut result = CmdResult::new(self.list.clone());
        if unreadable {
            result.add_message(CmdMessage::warning(
                "Could not read the local todo list; it was left as it is.",
            ));
        }
        if from_seed {
            result.add_message(CmdMessage::info(format!(
                "Loaded {} todos from the seed.",
                self.list.len()
            )));
            // Save right away so the next start reads the local copy instead of refetching.
            if !unreadable && !self.persistence.save(&self.list) {
                result.add_message(save_failed_message());
            }
        } else if seed_missing {
            tracing::info!("no persisted list and no seed, starting empty");
        }
        result
    }

    pub fn view(&self, filter: StatusFilter) -> CmdResult {
        CmdResult::new(commands::list::run(&self.list, filter))
    }

    pub fn add(&mut self, title: &str) -> CmdResult {
        if let Some(rejected) = self.reject_while_loading("add") {
            return rejected;
        }

        let next = commands::add::run(&self.list, title);
        let message = match next.records().last() {
            Some(record) if next.len() > self.list.len() => {
                CmdMessage::success(format!("Added #{}: {}", record.id, record.title))
            }
            _ if title.trim().is_empty() => CmdMessage::info("Nothing added: title is empty."),
            _ => CmdMessage::warning("Nothing added: no ids left."),
        };
        self.commit(next, message)
    }

    pub fn toggle(&mut self, id: i64) -> CmdResult {
        if let Some(rejected) = self.reject_while_loading("toggle") {
            return rejected;
        }

        let next = commands::toggle::run(&self.list, id);
        let message = match next.get(id) {
            Some(record) if record.completed => {
                CmdMessage::success(format!("Completed #{}: {}", record.id, record.title))
            }
            Some(record) => {
                CmdMessage::success(format!("Reopened #{}: {}", record.id, record.title))
            }
            None => missing_message(id),
        };
        self.commit(next, message)
    }

    pub fn delete(&mut self, id: i64) -> CmdResult {
        if let Some(rejected) = self.reject_while_loading("delete") {
            return rejected;
        }

        let message = match self.list.get(id) {
            Some(record) => CmdMessage::success(format!("Deleted #{}: {}", record.id, record.title)),
            None => missing_message(id),
        };
        let next = commands::delete::run(&self.list, id);
        self.commit(next, message)
    }

    /// Forgets the persisted slot. The session goes back to loading, so the
    /// next [`initialize`](Self::initialize) starts over from the seed.
    pub fn reset(&mut self) -> CmdResult {
        let mut result = CmdResult::default().with_changed(!self.list.is_empty());
        if self.persistence.clear() {
            result.add_message(CmdMessage::success("Local todo list removed."));
        } else {
            result.add_message(CmdMessage::error("Could not remove the local todo list."));
        }
        self.list = RecordList::new();
        self.state = LoadState::Loading;
        result
    }

    /// Adopts a slot value written by someone else. `None` means the slot was
    /// removed. The value is validated like a load; anything unusable becomes
    /// the empty list. The adopted list is not written back.
    pub fn adopt_external(&mut self, raw: Option<&str>) -> CmdResult {
        if self.is_loading() {
            tracing::debug!("ignoring external change while loading");
            return self.snapshot();
        }

        let next = raw.and_then(persistence::decode).unwrap_or_default();
        let changed = next != self.list;
        if changed {
            tracing::info!(len = next.len(), "adopted external change");
            self.list = next;
        }
        self.snapshot().with_changed(changed)
    }

    /// Re-reads the slot and adopts it. A failed read keeps the current list.
    pub fn refresh(&mut self) -> CmdResult {
        match self.persistence.backend().read_slot(self.persistence.key()) {
            Ok(raw) => self.adopt_external(raw.as_deref()),
            Err(e) => {
                tracing::warn!(error = %e, "could not re-read persisted slot");
                self.snapshot()
            }
        }
    }

    fn reject_while_loading(&self, op: &str) -> Option<CmdResult> {
        if !self.is_loading() {
            return None;
        }
        tracing::debug!(op, "ignoring mutation while loading");
        let mut result = self.snapshot();
        result.add_message(CmdMessage::warning("Still loading, try again."));
        Some(result)
    }

    fn commit(&mut self, next: RecordList, message: CmdMessage) -> CmdResult {
        let changed = next != self.list;
        let mut result = CmdResult::new(next.clone()).with_changed(changed);
        result.add_message(message);

        if changed {
            self.list = next;
            if !self.persistence.save(&self.list) {
                result.add_message(save_failed_message());
            }
        }
        result
    }

    fn snapshot(&self) -> CmdResult {
        CmdResult::new(self.list.clone())
    }
}

fn missing_message(id: i64) -> CmdMessage {
    CmdMessage::info(format!("No todo with id {}.", id))
}

fn save_failed_message() -> CmdMessage {
    CmdMessage::warning("Could not save; the change only lasts for this session.")
}

pub use crate::commands::list::StatusFilter;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};
