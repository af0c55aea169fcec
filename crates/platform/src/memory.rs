//! Memory bring-up capabilities.

/// ECC-protected RAM.
///
/// RAM must be scrubbed before first use after power-up, otherwise the ECC
/// logic reports the random power-on contents as corrupted.
pub trait EccRam {
    /// Initialize the whole ECC-protected RAM. Runs once per startup.
    fn initialize_ecc_ram(&mut self);
}

/// Memory protection unit.
pub trait MemoryProtection {
    /// Program the MPU regions and enable it.
    fn initialize_mpu(&mut self);
}
