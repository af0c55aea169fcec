//! CPU core control used during startup.

/// Core-level switches of the Cortex-R5F.
pub trait CpuCore {
    /// Enable CPU event bus export.
    ///
    /// Lets the core signal single- and double-bit ECC errors on flash and
    /// RAM accesses to the error signaling module.
    fn enable_event_bus_export(&mut self);

    /// Enable IRQ offset via the VIC port, so the VIM hands the core the
    /// handler address directly.
    fn enable_irq_vic_offset(&mut self);
}
