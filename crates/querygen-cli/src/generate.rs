use crate::{CliError, GenerateArgs, SchemaSource, introspect::MysqlIntrospector};
use querygen_build::{ModuleBuilder, RenderOptions, write_module};
use querygen_core::{
    query::{NamedQuery, compile_sources},
    schema::{SchemaSnapshot, Table, introspect},
    source::load_sources,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

///
/// Summary
///

#[derive(Debug)]
pub struct Summary {
    pub module: String,
    pub tables: usize,
    pub queries: usize,
    pub files: Vec<PathBuf>,
}

/// Introspect, compile queries, build and write one schema module.
pub fn run(args: &GenerateArgs) -> Result<Summary, CliError> {
    let tables = load_tables(&args.source)?;
    info!(schema = %args.schema_name, tables = tables.len(), "schema loaded");

    let queries = load_queries(args.queries_path.as_deref())?;

    let builder = ModuleBuilder::new(&args.schema_name, &tables, &queries);
    let module = builder.generate()?;
    let files = write_module(
        &args.output_path,
        &module,
        RenderOptions {
            rustfmt: args.rustfmt,
        },
    )?;

    Ok(Summary {
        module: module.name,
        tables: tables.len(),
        queries: queries.len(),
        files,
    })
}

fn load_tables(source: &SchemaSource) -> Result<Vec<Table>, CliError> {
    let tables = match source {
        SchemaSource::Snapshot(path) => {
            let mut snapshot = SchemaSnapshot::load(path).map_err(querygen_core::Error::from)?;
            introspect(&mut snapshot)?
        }
        SchemaSource::Live(conn) => {
            let mut live = MysqlIntrospector::connect(conn).map_err(querygen_core::Error::from)?;
            introspect(&mut live)?
        }
    };

    Ok(tables)
}

// load_queries
// A bad query path only skips the query phase; invalid queries are fatal.
fn load_queries(path: Option<&Path>) -> Result<Vec<NamedQuery>, CliError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    let sources = match load_sources(path) {
        Ok(sources) => sources,
        Err(err) => {
            warn!(error = %err, "skipping query generation");
            return Ok(Vec::new());
        }
    };

    let queries = compile_sources(&sources).map_err(querygen_core::Error::from)?;
    info!(files = sources.len(), queries = queries.len(), "queries compiled");

    Ok(queries)
}
