//! BMS Control Unit startup - hardware image entry.
//!
//! The reset vector `_c_int00` and everything it runs live in the library's
//! `hardware` module. This binary only pulls in the library, the RTT logger
//! and a panic handler.

#![no_std]
#![no_main]

use defmt_rtt as _;
use startup as _;

/// A panic before or inside the application has nowhere to unwind to.
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    if let Some(location) = info.location() {
        defmt::error!("panic at {=str}:{=u32}", location.file(), location.line());
    } else {
        defmt::error!("panic");
    }
    loop {
        core::hint::spin_loop();
    }
}
