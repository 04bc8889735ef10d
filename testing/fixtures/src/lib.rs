//! Module generated at build time from `schema.toml` and `queries/`.

include!(concat!(env!("OUT_DIR"), "/app.rs"));
