use crate::BuildError;
use proc_macro2::TokenStream;
use std::{
    io::Write,
    process::{Command, Stdio},
};
use tracing::{debug, warn};

/// First line of every generated file.
pub const BANNER: &str = "// @generated by querygen. Do not edit by hand.";

///
/// RenderOptions
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RenderOptions {
    /// Pipe output through `rustfmt`; a formatter failure keeps the raw text.
    pub rustfmt: bool,
}

/// Validate `tokens` as a Rust file and print it.
pub fn render(tokens: &TokenStream, options: RenderOptions) -> Result<String, BuildError> {
    syn::parse2::<syn::File>(tokens.clone())
        .map_err(|err| BuildError::InvalidOutput(err.to_string()))?;

    let raw = tokens.to_string();
    let body = if options.rustfmt {
        rustfmt(&raw).unwrap_or_else(|err| {
            warn!(error = %err, "rustfmt failed, keeping unformatted output");
            raw
        })
    } else {
        raw
    };

    Ok(format!("{BANNER}\n\n{body}\n"))
}

fn rustfmt(source: &str) -> Result<String, BuildError> {
    let mut child = Command::new("rustfmt")
        .args(["--edition", "2024", "--emit", "stdout", "--quiet"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| BuildError::Formatter(err.to_string()))?;

    child
        .stdin
        .take()
        .ok_or_else(|| BuildError::Formatter("rustfmt stdin unavailable".to_string()))?
        .write_all(source.as_bytes())
        .map_err(|err| BuildError::Formatter(err.to_string()))?;

    let output = child
        .wait_with_output()
        .map_err(|err| BuildError::Formatter(err.to_string()))?;
    if !output.status.success() {
        return Err(BuildError::Formatter(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    debug!(bytes = output.stdout.len(), "formatted generated source");

    String::from_utf8(output.stdout).map_err(|err| BuildError::Formatter(err.to_string()))
}
