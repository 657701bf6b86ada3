//! Tab and overlay navigation state.
//!
//! DESIGN
//! ======
//! Three panels selected by location fragment, plus a fullscreen overlay
//! that embeds an external URL. Opening is two-phase: `request_open` shows
//! the loading indicator and hands out a ticket, and the caller redeems it
//! with `complete_open` after the artificial delay. Closing or navigating
//! invalidates the ticket, so a delay that fires late cannot reopen the
//! overlay behind the user's back.

use tracing::debug;

#[cfg(test)]
#[path = "navigator_test.rs"]
mod tests;

pub const BLANK_URL: &str = "about:blank";

/// Top-level panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Loader1,
    Chat,
    Loader2,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Loader1, Tab::Chat, Tab::Loader2];

    /// Fragment key, without the leading `#`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Loader1 => "loader1",
            Self::Chat => "chat",
            Self::Loader2 => "loader2",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.key() == key)
    }

    /// Resolve a location fragment (`#chat`, `chat`, `""`). Unknown values
    /// fall back to the default tab.
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Self {
        Self::from_key(fragment.strip_prefix('#').unwrap_or(fragment)).unwrap_or_default()
    }
}

/// Why the overlay was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    ExitButton,
    BackdropClick,
    EscapeKey,
    TabNavigation,
}

/// Proof of a pending overlay open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayPhase {
    Closed,
    Loading { ticket: OpenTicket, url: String },
    Open,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    active: Tab,
    phase: OverlayPhase,
    frame_url: String,
    fullscreen: bool,
    overlay_top_px: f64,
    next_ticket: u64,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            active: Tab::default(),
            phase: OverlayPhase::Closed,
            frame_url: BLANK_URL.to_string(),
            fullscreen: false,
            overlay_top_px: 0.0,
            next_ticket: 0,
        }
    }
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // TABS
    // =========================================================================

    #[must_use]
    pub fn active_tab(&self) -> Tab {
        self.active
    }

    #[must_use]
    pub fn is_selected(&self, tab: Tab) -> bool {
        self.active == tab
    }

    #[must_use]
    pub fn is_panel_visible(&self, tab: Tab) -> bool {
        self.active == tab
    }

    /// Handle a fragment change. Returns the tab now shown.
    pub fn navigate(&mut self, fragment: &str) -> Tab {
        self.select_tab(Tab::from_fragment(fragment))
    }

    /// Handle a tab click.
    pub fn select_tab(&mut self, tab: Tab) -> Tab {
        if self.phase != OverlayPhase::Closed {
            self.close(CloseReason::TabNavigation);
        }
        self.active = tab;
        tab
    }

    // =========================================================================
    // OVERLAY
    // =========================================================================

    /// Start opening the overlay on `url`. Blank URLs are ignored.
    pub fn request_open(&mut self, url: &str, header_height_px: f64) -> Option<OpenTicket> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }
        self.next_ticket += 1;
        let ticket = OpenTicket(self.next_ticket);
        self.phase = OverlayPhase::Loading { ticket, url: url.to_string() };
        self.overlay_top_px = header_height_px;
        debug!(url, "overlay loading");
        Some(ticket)
    }

    /// Finish an open request. Returns `false` for a stale ticket.
    pub fn complete_open(&mut self, ticket: OpenTicket) -> bool {
        let url = match &self.phase {
            OverlayPhase::Loading { ticket: current, url } if *current == ticket => url.clone(),
            _ => {
                debug!(?ticket, "ignoring stale overlay ticket");
                return false;
            }
        };
        self.frame_url = url;
        self.phase = OverlayPhase::Open;
        self.fullscreen = true;
        true
    }

    /// Close the overlay. Returns `false` if nothing was open or loading.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        if self.phase == OverlayPhase::Closed {
            return false;
        }
        debug!(?reason, "overlay closed");
        self.phase = OverlayPhase::Closed;
        self.frame_url = BLANK_URL.to_string();
        self.fullscreen = false;
        true
    }

    /// Escape key: only acts on a visible overlay.
    pub fn escape(&mut self) -> bool {
        self.is_overlay_open() && self.close(CloseReason::EscapeKey)
    }

    /// Click on the dimmed background around the frame.
    pub fn backdrop_click(&mut self) -> bool {
        self.is_overlay_open() && self.close(CloseReason::BackdropClick)
    }

    /// Window resize: keep the overlay below the header while visible.
    pub fn resize(&mut self, header_height_px: f64) {
        if self.is_overlay_open() {
            self.overlay_top_px = header_height_px;
        }
    }

    #[must_use]
    pub fn phase(&self) -> &OverlayPhase {
        &self.phase
    }

    #[must_use]
    pub fn is_overlay_open(&self) -> bool {
        self.phase == OverlayPhase::Open
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, OverlayPhase::Loading { .. })
    }

    #[must_use]
    pub fn overlay_url(&self) -> &str {
        &self.frame_url
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    #[must_use]
    pub fn overlay_top_px(&self) -> f64 {
        self.overlay_top_px
    }
}
