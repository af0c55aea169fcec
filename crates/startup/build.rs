fn main() {
    // Only hardware builds need the linker script and the vendor HAL objects
    #[cfg(feature = "hardware")]
    {
        use std::env;
        use std::fs;
        use std::path::PathBuf;

        // Put `tms570.x` in our output directory and ensure it's on the linker search path.
        let out = PathBuf::from(env::var_os("OUT_DIR").unwrap_or_default());
        fs::write(out.join("tms570.x"), include_bytes!("tms570.x")).unwrap_or_else(|err| {
            println!("cargo:warning=could not copy tms570.x: {err}");
        });
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=tms570.x");

        // HALCoGen output (core init, systemInit, vimInit, esmInit, ...)
        // compiled into a static library by the vendor toolchain.
        if let Some(dir) = env::var_os("BMS_VENDOR_LIB_DIR") {
            println!("cargo:rustc-link-search={}", dir.to_string_lossy());
            println!("cargo:rustc-link-lib=static=bms_vendor_hal");
        } else {
            println!("cargo:warning=BMS_VENDOR_LIB_DIR not set; vendor HAL symbols must come from the final link");
        }
        println!("cargo:rerun-if-env-changed=BMS_VENDOR_LIB_DIR");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
