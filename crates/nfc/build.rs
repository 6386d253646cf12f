fn main() {
    // Only add a search path when linking the vendor library
    #[cfg(feature = "libpoll")]
    {
        if let Some(dir) = std::env::var_os("LIBPOLL_DIR") {
            println!(
                "cargo:rustc-link-search=native={}",
                std::path::Path::new(&dir).display()
            );
        }
        println!("cargo:rerun-if-env-changed=LIBPOLL_DIR");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
