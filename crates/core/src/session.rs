// Copyright (C) 2024 the Fluorite developers
//
// This file is part of Fluorite.
//
// Fluorite is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Fluorite is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Fluorite.  If not, see <http://www.gnu.org/licenses/>.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress reporting and cooperative cancellation for one load or save
/// pass.
///
/// The callbacks are invoked synchronously from inside the load loop, so
/// a UI layer can pump its own redraw between items. Everything else is
/// plain state the pipeline reads and writes between items; nothing here
/// is preemptive.
#[derive(Default)]
pub struct LoadSession<'cb> {
    on_progress: Option<Box<dyn FnMut(f32) + 'cb>>,
    on_text: Option<Box<dyn FnMut(&str) + 'cb>>,
    stop: Arc<AtomicBool>,
    problems: Vec<String>,
}

/// A cloneable handle that cancels the session it came from.
///
/// Handing one of these to a progress callback (or a UI cancel button)
/// lets the host stop a pass from inside it.
#[derive(Clone)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The fraction reported after loading item `index` of `count`.
///
/// Mirrors the game data loaders, which report `index / (count - 1)` so
/// the last item lands exactly on 1.0. Zero and one item collections
/// report 1.0 immediately instead of dividing by zero.
pub fn fraction(index: usize, count: usize) -> f32 {
    if count <= 1 {
        1.0
    } else {
        index as f32 / (count - 1) as f32
    }
}

impl<'cb> LoadSession<'cb> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(mut self, on_progress: impl FnMut(f32) + 'cb) -> Self {
        self.on_progress = Some(Box::new(on_progress));
        self
    }

    pub fn with_text(mut self, on_text: impl FnMut(&str) + 'cb) -> Self {
        self.on_text = Some(Box::new(on_text));
        self
    }

    /// Publishes a new status line, resetting progress to zero first so
    /// the host's progress bar restarts with the new label.
    pub fn set_text(&mut self, text: &str) {
        self.set_progress(0.0);
        if let Some(on_text) = &mut self.on_text {
            on_text(text);
        }
    }

    pub fn set_progress(&mut self, fraction: f32) {
        if let Some(on_progress) = &mut self.on_progress {
            on_progress(fraction);
        }
    }

    /// Requests cooperative cancellation. Loaders check this between
    /// items and between files; it never interrupts a decode in flight.
    pub fn abort(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle(Arc::clone(&self.stop))
    }

    /// Clears the cancel flag and accumulated problems. Called at the
    /// start of every pass.
    pub fn reset(&mut self) {
        self.stop.store(false, Ordering::Relaxed);
        self.problems.clear();
    }

    pub fn push_problem(&mut self, message: String) {
        self.problems.push(message);
    }

    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    pub fn take_problems(&mut self) -> Vec<String> {
        std::mem::take(&mut self.problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_lands_on_one_for_the_last_item() {
        assert_eq!(fraction(0, 5), 0.0);
        assert_eq!(fraction(4, 5), 1.0);
        assert_eq!(fraction(1, 3), 0.5);
    }

    #[test]
    fn tiny_collections_report_complete_without_dividing() {
        assert_eq!(fraction(0, 0), 1.0);
        assert_eq!(fraction(0, 1), 1.0);
    }

    #[test]
    fn set_text_resets_progress_before_the_text_lands() {
        let events = std::cell::RefCell::new(Vec::new());
        let mut session = LoadSession::new()
            .with_progress(|f| events.borrow_mut().push(format!("progress {f}")))
            .with_text(|t| events.borrow_mut().push(format!("text {t}")));

        session.set_progress(0.7);
        session.set_text("Loading Maps...");
        drop(session);

        assert_eq!(
            events.into_inner(),
            vec!["progress 0.7", "progress 0", "text Loading Maps..."]
        );
    }

    #[test]
    fn abort_handle_outlives_the_borrow() {
        let session = LoadSession::new();
        let handle = session.abort_handle();
        assert!(!session.stopped());
        handle.abort();
        assert!(session.stopped());
        assert!(handle.stopped());
    }

    #[test]
    fn reset_clears_the_flag_and_problems() {
        let mut session = LoadSession::new();
        session.abort();
        session.push_problem("failed".to_string());
        session.reset();
        assert!(!session.stopped());
        assert!(session.problems().is_empty());
    }
}
