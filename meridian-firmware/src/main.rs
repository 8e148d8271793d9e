//! Meridian - Weather Watch Face Firmware
//!
//! Main firmware binary for RP2040-based watch boards with a GC9A01 round
//! panel and a BLE bridge on UART0 that relays the companion phone app.

#![no_std]
#![no_main]

use defmt::*;
use display_interface_spi::SPIInterface;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::models::GC9A01;
use mipidsi::options::{ColorInversion, ColorOrder};
use mipidsi::Builder;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use meridian_core::sync::{CompanionLink, WeatherSync};

use crate::channels::WEATHER;
use crate::config::FACE_CONFIG;
use crate::tasks::SyncResources;
use crate::transport::UartLink;

mod channels;
mod clock;
mod config;
mod tasks;
mod transport;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

// Link and sync pipeline (holds the icon buffer)
static SYNC_RESOURCES: StaticCell<SyncResources> = StaticCell::new();

/// Panel SPI clock
const DISPLAY_SPI_HZ: u32 = 62_500_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Meridian firmware starting...");

    if let Err(e) = FACE_CONFIG.validate() {
        defmt::panic!("Invalid face configuration: {:?}", e);
    }

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Setup UART for the BLE bridge
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for companion bridge");

    // Setup the GC9A01 panel on SPI1
    // Pin assignment is board-specific (SCK=GPIO10, MOSI=GPIO11, CS=GPIO9, DC=GPIO8, RST=GPIO12)
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = DISPLAY_SPI_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::Low);
    let rst = Output::new(p.PIN_12, Level::High);
    let _backlight = Output::new(p.PIN_25, Level::High);

    let spi_device = unwrap!(ExclusiveDevice::new(spi, cs, Delay));
    let di = SPIInterface::new(spi_device, dc);
    let panel = match Builder::new(GC9A01, di)
        .reset_pin(rst)
        .display_size(240, 240)
        .color_order(ColorOrder::Bgr)
        .invert_colors(ColorInversion::Inverted)
        .init(&mut Delay)
    {
        Ok(panel) => panel,
        Err(_) => defmt::panic!("Panel init failed"),
    };

    info!("Display initialized");

    // Wake button
    let button = Input::new(p.PIN_15, Pull::Up);

    let resources = SYNC_RESOURCES.init(SyncResources {
        link: CompanionLink::new(UartLink::new(), Delay),
        weather: WeatherSync::new(&WEATHER, FACE_CONFIG.sync),
    });

    // Spawn tasks
    spawner.spawn(tasks::companion_rx_task(rx)).unwrap();
    spawner.spawn(tasks::companion_tx_task(tx)).unwrap();
    spawner.spawn(tasks::mode_task()).unwrap();
    spawner.spawn(tasks::render_task(panel)).unwrap();
    spawner.spawn(tasks::sync_task(resources)).unwrap();
    spawner.spawn(tasks::power_task(button)).unwrap();

    info!("All tasks spawned");
}
