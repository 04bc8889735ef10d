/// Build-script helper: generate `<OUT_DIR>/<schema>.rs` from a schema
/// snapshot and a query file or directory.
///
/// Must be used inside a function returning
/// `Result<_, Box<dyn std::error::Error>>`.
#[macro_export]
macro_rules! build {
    ($schema:expr, $snapshot:expr, $queries:expr) => {{
        use std::{env::var, fs, path::Path, path::PathBuf};

        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed={}", $snapshot);
        println!("cargo:rerun-if-changed={}", $queries);

        let out_dir = var("OUT_DIR")?;

        //
        // MODULE CODE
        //

        let output = ::querygen_build::generate_inline_from_paths(
            $schema,
            Path::new($snapshot),
            Some(Path::new($queries)),
        )?;

        let module_file = PathBuf::from(out_dir).join(format!("{}.rs", $schema));
        fs::write(module_file, output)?;
    }};
}
