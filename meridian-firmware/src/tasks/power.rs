//! Power and lifecycle source task
//!
//! The board has no OS compositor, so this task plays its part through
//! `PowerPolicy`: it reports the panel's capabilities, wakes to active on a
//! button press, drops to ambient after an idle timeout, sends the
//! once-a-minute ambient tick and toggles visibility on a long press.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Input;
use embassy_time::{with_timeout, Duration, Timer};

use meridian_core::state::{PowerInput, PowerPolicy, PowerWait};

use crate::channels::LIFECYCLE;
use crate::config::{IDLE_TIMEOUT_S, LOW_BIT_AMBIENT};

/// Hold time that counts as a long press
const LONG_PRESS_MS: u64 = 1500;

/// Ambient tick period
const AMBIENT_TICK_S: u64 = 60;

/// Measure a press whose falling edge has already been seen
async fn classify_press(button: &mut Input<'static>) -> PowerInput {
    match with_timeout(Duration::from_millis(LONG_PRESS_MS), button.wait_for_high()).await {
        Ok(()) => PowerInput::ShortPress,
        Err(_) => PowerInput::LongPress,
    }
}

/// Power task - drives visibility and ambient transitions
#[embassy_executor::task]
pub async fn power_task(mut button: Input<'static>) {
    info!("Power task started");

    let mut policy = PowerPolicy::new();
    for event in policy.startup(LOW_BIT_AMBIENT) {
        LIFECYCLE.send(event).await;
    }

    loop {
        let wait = match policy.wait() {
            PowerWait::ButtonOnly => None,
            PowerWait::Idle => Some(Duration::from_secs(IDLE_TIMEOUT_S)),
            PowerWait::AmbientTick => Some(Duration::from_secs(AMBIENT_TICK_S)),
        };

        // Only the edge races the timer; the press is measured afterwards
        let input = match wait {
            None => {
                button.wait_for_falling_edge().await;
                classify_press(&mut button).await
            }
            Some(wait) => match select(button.wait_for_falling_edge(), Timer::after(wait)).await {
                Either::First(()) => classify_press(&mut button).await,
                Either::Second(()) => PowerInput::Timeout,
            },
        };

        debug!("Power input: {:?}", input);
        for event in policy.on_input(input) {
            LIFECYCLE.send(event).await;
        }
    }
}
