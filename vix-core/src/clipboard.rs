// Copyright (C) 2025 Vix contributors. This program is free software: you can
// redistribute it and/or modify it under the terms of the GNU General Public
// License as published by the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! System clipboard access and paste-request bookkeeping.
//!
//! Clipboard reads are asynchronous from the engine's point of view: `p`/`P`
//! emit a request the host answers later with `complete_paste`. Requests
//! carry a monotonically increasing id and only the most recently issued one
//! is ever applied, so a slow read can never clobber a newer paste.

use async_trait::async_trait;
use tracing::warn;

/// Host-side clipboard transport. The engine never blocks on it.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn read_text(&self) -> Option<String>;
    async fn write_text(&self, text: String);
}

/// The OS clipboard via arboard. arboard's calls are blocking, so they run
/// on the blocking pool.
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn read_text(&self) -> Option<String> {
        tokio::task::spawn_blocking(|| {
            let mut cb = arboard::Clipboard::new().ok()?;
            cb.get_text().ok()
        })
        .await
        .ok()
        .flatten()
    }

    async fn write_text(&self, text: String) {
        let result = tokio::task::spawn_blocking(move || {
            let mut cb = arboard::Clipboard::new()?;
            cb.set_text(text)
        })
        .await;
        match result {
            Ok(Err(e)) => warn!("clipboard write failed: {e}"),
            Err(e) => warn!("clipboard task failed: {e}"),
            Ok(Ok(())) => {}
        }
    }
}

/// An outstanding `p`/`P` waiting for clipboard text from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasteRequest {
    pub id: u64,
    /// `P` pastes before the cursor, `p` after.
    pub before: bool,
}

/// Issues request ids and decides which completions still count.
#[derive(Debug, Default)]
pub struct PasteTracker {
    next_id: u64,
    live: Option<PasteRequest>,
}

impl PasteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request, superseding any outstanding one.
    pub fn issue(&mut self, before: bool) -> PasteRequest {
        self.next_id += 1;
        let req = PasteRequest {
            id: self.next_id,
            before,
        };
        self.live = Some(req);
        req
    }

    /// Consume and return the live request when `id` matches it. Stale and
    /// unknown completions yield `None` and change nothing.
    pub fn accept(&mut self, id: u64) -> Option<PasteRequest> {
        match self.live {
            Some(req) if req.id == id => {
                self.live = None;
                Some(req)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_request_is_accepted() {
        let mut t = PasteTracker::new();
        let a = t.issue(false);
        let b = t.issue(true);
        assert_eq!(t.accept(a.id), None);
        assert_eq!(t.accept(b.id), Some(b));
        // a completion is consumed exactly once
        assert_eq!(t.accept(b.id), None);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut t = PasteTracker::new();
        let a = t.issue(false);
        let b = t.issue(false);
        assert!(b.id > a.id);
    }
}
