//! Repaint requests from the mode owner to the renderer

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use super::machine::DisplayState;

/// One pending repaint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RedrawRequest {
    pub display: DisplayState,
    /// Re-read the zone offset before drawing
    pub refresh_zone: bool,
}

impl RedrawRequest {
    /// Fold a newer request into one the renderer has not taken yet
    ///
    /// The newer display flags win; a zone refresh is never dropped.
    pub fn merge(self, newer: Self) -> Self {
        Self {
            display: newer.display,
            refresh_zone: self.refresh_zone || newer.refresh_zone,
        }
    }
}

/// Post a repaint, merging it with any request still unread
///
/// Only the mode owner posts, so the take-then-signal pair cannot lose a
/// concurrent write.
pub fn post_redraw<M: RawMutex>(signal: &Signal<M, RedrawRequest>, request: RedrawRequest) {
    let merged = match signal.try_take() {
        Some(pending) => pending.merge(request),
        None => request,
    };
    signal.signal(merged);
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    fn request(ambient: bool, refresh_zone: bool) -> RedrawRequest {
        RedrawRequest {
            display: DisplayState {
                visible: true,
                ambient,
                low_bit_ambient: false,
            },
            refresh_zone,
        }
    }

    #[test]
    fn test_zone_refresh_survives_coalescing() {
        let signal: Signal<NoopRawMutex, RedrawRequest> = Signal::new();

        post_redraw(&signal, request(false, true));
        post_redraw(&signal, request(false, false));

        let seen = block_on(signal.wait());
        assert!(seen.refresh_zone);
    }

    #[test]
    fn test_latest_display_state_wins() {
        let signal: Signal<NoopRawMutex, RedrawRequest> = Signal::new();

        post_redraw(&signal, request(false, false));
        post_redraw(&signal, request(true, false));

        assert_eq!(block_on(signal.wait()), request(true, false));
    }

    #[test]
    fn test_taken_request_does_not_leak_into_next() {
        let signal: Signal<NoopRawMutex, RedrawRequest> = Signal::new();

        post_redraw(&signal, request(false, true));
        assert!(block_on(signal.wait()).refresh_zone);

        post_redraw(&signal, request(false, false));
        assert!(!block_on(signal.wait()).refresh_zone);
    }
}
