//! Weather sync task
//!
//! Owns the companion link. Connects once at startup, then handles data
//! events as they arrive, reconnecting on demand. Failures are logged and
//! leave the last good forecast on screen.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;

use meridian_core::sync::{CompanionLink, WeatherSync};

use crate::channels::{DATA_EVENTS, SUSPENDED};
use crate::transport::UartLink;

/// Link and pipeline, kept in static memory for their asset buffer
pub struct SyncResources {
    pub link: CompanionLink<UartLink, Delay>,
    pub weather: WeatherSync<'static, CriticalSectionRawMutex>,
}

/// Sync task - turns companion data events into published forecasts
#[embassy_executor::task]
pub async fn sync_task(resources: &'static mut SyncResources) {
    info!("Sync task started");

    let SyncResources { link, weather } = resources;
    let connect_timeout_ms = weather.config().connect_timeout_ms;

    if link.connect(connect_timeout_ms).await.is_err() {
        warn!("Initial connect failed; will retry on next update");
    }

    loop {
        match select(DATA_EVENTS.receive(), SUSPENDED.wait()).await {
            Either::First(event) => {
                // Result is already logged and counted by the pipeline
                let _ = weather.handle_event(link, &event).await;
                trace!("Sync stats: {:?}", weather.stats());
            }
            Either::Second(cause) => link.on_suspended(cause),
        }
    }
}
