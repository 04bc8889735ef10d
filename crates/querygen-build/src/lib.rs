//! Code generation backend.
//!
//! Turns introspected tables and compiled queries into Rust modules that link
//! against `querygen-runtime`. Generation builds a `TokenStream` per file,
//! validates it with `syn`, and prints it (optionally through `rustfmt`).

mod entity;
mod ident;
mod macros;
mod output;
mod queries;
mod render;


pub use output::write_module;
pub use render::{BANNER, RenderOptions, render};

use crate::ident::NameSet;
use proc_macro2::TokenStream;
use querygen_core::{
    query::{NamedQuery, compile_sources},
    schema::{SchemaSnapshot, Table, introspect},
    source::load_sources,
};
use quote::quote;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::info;

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error(transparent)]
    Core(#[from] querygen_core::Error),

    #[error("rustfmt failed: {0}")]
    Formatter(String),

    #[error("'{raw}' does not yield a valid identifier (got '{name}')")]
    InvalidIdentifier { raw: String, name: String },

    #[error("generated code does not parse: {0}")]
    InvalidOutput(String),

    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("name '{name}' is generated twice ({context})")]
    NameCollision { name: String, context: String },
}

///
/// GeneratedFile
///

#[derive(Debug)]
pub struct GeneratedFile {
    /// File name inside the module directory.
    pub name: String,
    pub tokens: TokenStream,
}

///
/// GeneratedModule
/// One schema's output: `mod.rs`, `queries.rs` and one file per table.
///

#[derive(Debug)]
pub struct GeneratedModule {
    pub name: String,
    pub files: Vec<GeneratedFile>,
}

///
/// ModuleBuilder
///

pub struct ModuleBuilder<'a> {
    schema: &'a str,
    tables: &'a [Table],
    queries: &'a [NamedQuery],
}

impl<'a> ModuleBuilder<'a> {
    #[must_use]
    pub const fn new(schema: &'a str, tables: &'a [Table], queries: &'a [NamedQuery]) -> Self {
        Self {
            schema,
            tables,
            queries,
        }
    }

    /// snake_case module (and directory) name of the schema.
    pub fn module_name(&self) -> Result<String, BuildError> {
        let name = ident::snake_name(self.schema);
        ident::make(self.schema, &name)?;

        Ok(name)
    }

    /// One file per table, `queries.rs` and `mod.rs`.
    pub fn generate(&self) -> Result<GeneratedModule, BuildError> {
        let parts = self.parts()?;
        let allow = allow_attrs(true);
        let mut files = Vec::with_capacity(parts.entities.len() + 2);

        for entity in parts.entities {
            let tokens = entity.tokens;
            files.push(GeneratedFile {
                name: format!("{}.rs", entity.file_stem),
                tokens: quote!(#allow #tokens),
            });
        }

        let queries = parts.queries;
        files.push(GeneratedFile {
            name: "queries.rs".to_string(),
            tokens: quote!(#allow #queries),
        });

        let index = parts.index;
        files.push(GeneratedFile {
            name: "mod.rs".to_string(),
            tokens: quote!(#index),
        });

        info!(schema = self.schema, files = files.len(), "generated module");

        Ok(GeneratedModule {
            name: self.module_name()?,
            files,
        })
    }

    /// Everything nested in a single `pub mod <schema> { .. }` item.
    pub fn generate_inline(&self) -> Result<TokenStream, BuildError> {
        let module = ident::snake_ident(self.schema)?;
        let parts = self.parts()?;
        let allow = allow_attrs(false);

        let entities = parts.entities.into_iter().map(|entity| {
            let module = entity.module;
            let tokens = entity.tokens;
            quote! {
                pub mod #module {
                    #tokens
                }
            }
        });
        let queries = parts.queries;
        let exports = parts.exports;

        Ok(quote! {
            #allow
            pub mod #module {
                #(#entities)*

                pub mod queries {
                    #queries
                }

                #exports
            }
        })
    }

    fn parts(&self) -> Result<Parts, BuildError> {
        let mut modules = NameSet::new("table modules").reserved(&["queries"]);
        let mut types = NameSet::new("entity types").reserved(&["Queries"]);
        let mut entities = Vec::with_capacity(self.tables.len());

        for table in self.tables {
            let entity = entity::generate(table)?;
            modules.claim(&entity.module, &table.name)?;
            types.claim(&entity.entity, &table.name)?;
            entities.push(entity);
        }

        let queries = queries::generate(self.queries)?;

        let declarations = entities.iter().map(|e| &e.module);
        let reexports = entities.iter().map(|e| {
            let (module, entity) = (&e.module, &e.entity);
            quote!(pub use self::#module::#entity;)
        });
        let exports = quote! {
            #(#reexports)*
            pub use self::queries::Queries;
        };
        let index = quote! {
            #(pub mod #declarations;)*
            pub mod queries;

            #exports
        };

        Ok(Parts {
            entities,
            queries,
            exports,
            index,
        })
    }
}

struct Parts {
    entities: Vec<entity::EntityModule>,
    queries: TokenStream,
    exports: TokenStream,
    index: TokenStream,
}

// allow_attrs
// generated code is not held to the consumer's pedantic lints
fn allow_attrs(inner: bool) -> TokenStream {
    if inner {
        quote!(#![allow(clippy::pedantic, clippy::nursery)])
    } else {
        quote!(#[allow(clippy::pedantic, clippy::nursery)])
    }
}

/// Generate a single-file module from a schema snapshot and a query path,
/// the form consumed by build scripts through `build!`.
pub fn generate_inline_from_paths(
    schema: &str,
    snapshot: &Path,
    queries: Option<&Path>,
) -> Result<String, BuildError> {
    let mut snapshot = SchemaSnapshot::load(snapshot).map_err(querygen_core::Error::from)?;
    let tables = introspect(&mut snapshot)?;

    let queries = match queries {
        Some(path) => {
            let sources = load_sources(path).map_err(querygen_core::Error::from)?;
            compile_sources(&sources).map_err(querygen_core::Error::from)?
        }
        None => Vec::new(),
    };

    let tokens = ModuleBuilder::new(schema, &tables, &queries).generate_inline()?;

    render(&tokens, RenderOptions::default())
}
