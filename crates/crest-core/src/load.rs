//! Load-lifecycle bookkeeping for the one-shot model fetch: progress
//! percentage math and the guarantee that a failed load substitutes the
//! fallback surface exactly once.

/// Percentage for a progress event. `None` when the total is unknown or
/// zero, in which case the consumer shows nothing rather than dividing.
pub fn progress_percent(items_loaded: u32, items_total: u32) -> Option<u8> {
    if items_total == 0 {
        return None;
    }
    let pct = (items_loaded as f64 / items_total as f64 * 100.0).round();
    Some(pct.min(100.0) as u8)
}

// Failure copy shared by the overlay and the fallback surface.

/// Text of the element substituted for the canvas.
pub const FALLBACK_TEXT: &str = "3D preview unavailable in this browser.";
/// Overlay line for a failed model load.
pub const LOAD_ERROR_TEXT: &str = "3D preview unavailable.";
/// Overlay line for any other loader-level error.
pub const DEFAULT_ERROR_TEXT: &str = "Unable to load crest.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Loading { percent: u8 },
    Ready,
    Failed,
}

/// Tracks the single asset-load attempt. Failure is terminal: there is no
/// retry, and the fallback substitution is reported to the caller exactly
/// once no matter how many error callbacks fire.
#[derive(Debug)]
pub struct LoadLifecycle {
    phase: LoadPhase,
    fallback_shown: bool,
}

impl Default for LoadLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadLifecycle {
    pub fn new() -> Self {
        Self {
            phase: LoadPhase::Loading { percent: 0 },
            fallback_shown: false,
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, LoadPhase::Ready | LoadPhase::Failed)
    }

    /// Record a progress event. Returns the percentage to display, or `None`
    /// when the event carries no usable total or the load already ended.
    pub fn on_progress(&mut self, items_loaded: u32, items_total: u32) -> Option<u8> {
        if self.is_terminal() {
            return None;
        }
        let percent = progress_percent(items_loaded, items_total)?;
        self.phase = LoadPhase::Loading { percent };
        Some(percent)
    }

    /// Mark the load successful. Returns false if the load already ended.
    pub fn succeed(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.phase = LoadPhase::Ready;
        true
    }

    /// Mark the load failed. Returns true exactly once; the caller performs
    /// the fallback substitution and error message on that first report.
    pub fn fail(&mut self) -> bool {
        if self.phase == LoadPhase::Ready {
            return false;
        }
        self.phase = LoadPhase::Failed;
        !std::mem::replace(&mut self.fallback_shown, true)
    }
}
