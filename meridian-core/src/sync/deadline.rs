//! Deadline races
//!
//! Bounds a future by a delay from an `embedded-hal-async` clock. Whichever
//! completes first wins; the loser is dropped.

use core::future::Future;

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;

/// The deadline expired before the future completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Elapsed;

/// Run `fut` for at most `timeout_ms`
pub async fn with_deadline<D, F>(delay: &mut D, timeout_ms: u32, fut: F) -> Result<F::Output, Elapsed>
where
    D: DelayNs,
    F: Future,
{
    match select(fut, delay.delay_ms(timeout_ms)).await {
        Either::First(output) => Ok(output),
        Either::Second(()) => Err(Elapsed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    struct InstantDelay;

    impl DelayNs for InstantDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn test_ready_future_wins() {
        let result = block_on(with_deadline(&mut InstantDelay, 10, async { 7 }));
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn test_pending_future_times_out() {
        let result = block_on(with_deadline(
            &mut InstantDelay,
            10,
            core::future::pending::<()>(),
        ));
        assert_eq!(result, Err(Elapsed));
    }
}
