//! Display mode and frame timer task
//!
//! Owns the `ModeStateMachine` and the `FrameTimer`. Sleeps on lifecycle
//! notifications when no tick is pending; otherwise races them against the
//! pending deadline. Redraws are handed to the render task.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::Timer;

use meridian_core::scheduler::FrameTimer;
use meridian_core::state::{post_redraw, LifecycleEvent, ModeStateMachine, RedrawRequest};

use crate::channels::{LIFECYCLE, REDRAW};
use crate::clock;
use crate::config::FACE_CONFIG;

/// Mode task - applies lifecycle events and fires per-second redraws
#[embassy_executor::task]
pub async fn mode_task() {
    info!("Mode task started");

    let mut machine = ModeStateMachine::new();
    let mut timer = FrameTimer::new(FACE_CONFIG.timer.interval_ms);

    loop {
        let event = match timer.pending() {
            Some(deadline_ms) => {
                match select(LIFECYCLE.receive(), Timer::at(clock::instant_at(deadline_ms))).await {
                    Either::First(event) => Some(event),
                    Either::Second(()) => None,
                }
            }
            None => Some(LIFECYCLE.receive().await),
        };

        let now_ms = clock::now_unix_ms().max(0) as u64;

        match event {
            Some(event) => handle_event(&mut machine, &mut timer, event, now_ms),
            None => {
                if timer.poll(machine.should_animate(), now_ms).redraw() {
                    post_redraw(
                        &REDRAW,
                        RedrawRequest {
                            display: machine.state(),
                            refresh_zone: false,
                        },
                    );
                }
            }
        }
    }
}

fn handle_event(
    machine: &mut ModeStateMachine,
    timer: &mut FrameTimer,
    event: LifecycleEvent,
    now_ms: u64,
) {
    debug!("Lifecycle event: {:?}", event);
    let reaction = machine.apply(event);

    if reaction.reevaluate_timer {
        match timer.reevaluate(machine.should_animate(), now_ms) {
            Some(deadline) => trace!("Next tick at {}", deadline),
            None => debug!("Frame timer stopped ({:?})", machine.mode()),
        }
    }

    if reaction.redraw {
        post_redraw(
            &REDRAW,
            RedrawRequest {
                display: machine.state(),
                refresh_zone: reaction.refresh_time_zone,
            },
        );
    }
}
