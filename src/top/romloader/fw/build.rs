use std::env;
use std::fs;
use std::path::PathBuf;

// The loader runs out of a single block RAM.
const MEMORY: &str = r#"
MEMORY
{
    RAM : ORIGIN = 0x00000000, LENGTH = 16K
}
REGION_ALIAS("REGION_TEXT", RAM);
REGION_ALIAS("REGION_RODATA", RAM);
REGION_ALIAS("REGION_DATA", RAM);
REGION_ALIAS("REGION_BSS", RAM);
REGION_ALIAS("REGION_HEAP", RAM);
REGION_ALIAS("REGION_STACK", RAM);
"#;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("memory.x"), MEMORY).unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg=-Tmemory.x");
    println!("cargo:rustc-link-arg=-Tlink.x");

    // SD card FAT and PS/2 drivers, built by the platform firmware makefile.
    println!("cargo:rerun-if-env-changed=ROMLOADER_PLATFORM_LIB");
    if let Ok(dir) = env::var("ROMLOADER_PLATFORM_LIB") {
        println!("cargo:rustc-link-search={}", dir);
    }
    println!("cargo:rustc-link-lib=static=romloader_platform");
    println!("cargo:rerun-if-changed=build.rs");
}
