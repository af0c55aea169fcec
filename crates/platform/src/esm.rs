//! Error Signaling Module (ESM) capability.
//!
//! Group 3 collects faults that can occur during power-up itself, for example
//! while the eFuse auto-load runs or flash OTP is read. Device operation is
//! not reliable when any of them is set. The startup code only forwards the
//! observed value to the notification hook; it does not interpret it.

/// ESM base address (TMS570LC43x).
pub const ESM_BASE: usize = 0xFFFF_F500;

/// Offset of `SR1[2]`, the group 3 status register, from [`ESM_BASE`].
pub const ESM_SR1_GROUP3_OFFSET: usize = 0x20;

/// Error signaling module.
pub trait ErrorSignaling {
    /// Current group 3 status flags. Zero means no power-up fault.
    fn group3_status(&self) -> u32;

    /// Notification hook for a non-zero group 3 status.
    fn notify_group3(&mut self, status: u32);

    /// Configure the system response to group 1 error conditions.
    fn initialize_esm(&mut self);
}
