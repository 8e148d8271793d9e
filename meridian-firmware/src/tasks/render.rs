//! Render task
//!
//! Owns the panel. Each redraw takes one time snapshot and one weather
//! snapshot load, then draws the whole face.

use defmt::*;
use display_interface_spi::SPIInterface;
use embassy_rp::gpio::Output;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::models::GC9A01;
use mipidsi::Display;

use meridian_core::time::WatchClock;
use meridian_display::{PanelSurface, RenderEngine};

use crate::channels::{REDRAW, WEATHER};
use crate::clock;
use crate::config::FACE_CONFIG;

/// GC9A01 round panel on SPI1
pub type Panel = Display<
    SPIInterface<ExclusiveDevice<Spi<'static, embassy_rp::peripherals::SPI1, Blocking>, Output<'static>, Delay>, Output<'static>>,
    GC9A01,
    Output<'static>,
>;

/// Render task - draws the face whenever the mode task asks
#[embassy_executor::task]
pub async fn render_task(panel: Panel) {
    info!("Render task started");

    let mut surface = PanelSurface::new(panel);
    let engine = RenderEngine::default();
    let mut watch_clock = WatchClock::new(clock::utc_offset_s(), FACE_CONFIG.clock.format);

    loop {
        let request = REDRAW.wait().await;

        if request.refresh_zone && watch_clock.set_utc_offset(clock::utc_offset_s()) {
            debug!("Clock offset now {} s", watch_clock.utc_offset_s());
        }

        let Some(time) = watch_clock.snapshot(clock::now_unix_ms()) else {
            warn!("Wall clock out of range");
            continue;
        };
        let weather = WEATHER.load();

        if let Err(e) = engine.render(&mut surface, &time, request.display, &weather) {
            warn!("Render failed: {:?}", e);
        }
    }
}
