//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod companion_rx;
pub mod companion_tx;
pub mod mode;
pub mod power;
pub mod render;
pub mod sync;

pub use companion_rx::companion_rx_task;
pub use companion_tx::companion_tx_task;
pub use mode::mode_task;
pub use power::power_task;
pub use render::{render_task, Panel};
pub use sync::{sync_task, SyncResources};
