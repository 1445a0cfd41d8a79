//! Session-scoped flags: the busy guard, autoplay, and the AI policy.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Control flags shared by every task touching one session.
#[derive(Debug, Default)]
pub struct SessionControl {
    move_in_progress: AtomicBool,
    autoplaying: AtomicBool,
    ai_follows_player: AtomicBool,
    /// Bumped whenever the timeline is replaced wholesale.
    epoch: AtomicU64,
    /// Bumped whenever an autoplay loop starts.
    autoplay_run: AtomicU64,
}

impl SessionControl {
    pub fn new(ai_follows_player: bool) -> Self {
        Self {
            ai_follows_player: AtomicBool::new(ai_follows_player),
            ..Self::default()
        }
    }

    /// Claim the busy flag. `None` if a transition is already in flight.
    pub fn try_begin_move(&self) -> Option<MoveGuard<'_>> {
        self.move_in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| MoveGuard {
                flag: &self.move_in_progress,
            })
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.move_in_progress.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_autoplaying(&self) -> bool {
        self.autoplaying.load(Ordering::Acquire)
    }

    /// Turn autoplay on. Returns the run id, or `None` if already on.
    pub fn start_autoplay(&self) -> Option<u64> {
        self.autoplaying
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| self.autoplay_run.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Turn autoplay off. Returns whether it was on.
    pub fn stop_autoplay(&self) -> bool {
        self.autoplaying.swap(false, Ordering::AcqRel)
    }

    /// Whether the loop started as `run` should keep stepping.
    #[must_use]
    pub fn autoplay_continues(&self, run: u64) -> bool {
        self.is_autoplaying() && self.autoplay_run.load(Ordering::Acquire) == run
    }

    /// Clear the autoplay flag if `run` is still the current loop.
    pub fn finish_autoplay(&self, run: u64) {
        if self.autoplay_run.load(Ordering::Acquire) == run {
            self.autoplaying.store(false, Ordering::Release);
        }
    }

    #[must_use]
    pub fn ai_follows_player(&self) -> bool {
        self.ai_follows_player.load(Ordering::Acquire)
    }

    pub fn set_ai_follows_player(&self, enabled: bool) {
        self.ai_follows_player.store(enabled, Ordering::Release);
    }

    /// Flip the AI policy, returning the new value.
    pub fn toggle_ai_follows_player(&self) -> bool {
        !self.ai_follows_player.fetch_xor(true, Ordering::AcqRel)
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Invalidate every transition started before now.
    pub fn bump_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Scoped hold on the busy flag; released on drop, whatever the exit path.
#[derive(Debug)]
#[must_use = "the busy flag is released as soon as the guard is dropped"]
pub struct MoveGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
