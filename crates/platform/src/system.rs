//! System-level configuration capabilities.

/// System module: clocks, flash wait states and the interrupt vector table.
pub trait SystemControl {
    /// Clock and flash configuration, including the eFuse self check.
    fn system_init(&mut self);

    /// Initialize the VIM (vectored interrupt manager) RAM table.
    fn initialize_vim(&mut self);
}
