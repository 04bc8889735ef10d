//! Module: queries
//! Responsibility: emit the queries module of one schema.
//!
//! Every query gets a private core function and four wrappers
//! (`name`, `name_ctx`, `name_tx`, `name_ctx_tx`) that only forward to it.
//! All statement access goes through the shared `Runtime` cache.

use crate::{
    BuildError,
    ident::{self, NameSet},
};
use proc_macro2::{Ident, TokenStream};
use querygen_core::query::{NamedQuery, ResultMode, ResultShape};
use quote::quote;
use tracing::warn;

/// Method names on `Queries` that are not derived from query names.
const RESERVED_METHODS: &[&str] = &[
    "begin",
    "begin_ctx",
    "new",
    "runtime",
    "sql",
    "transaction",
    "transaction_ctx",
    "with_runtime",
];

const MISSING_FIELDS: &str =
    "no result fields: add a `-- Returns:` annotation or project named columns";

pub fn generate(queries: &[NamedQuery]) -> Result<TokenStream, BuildError> {
    let mut methods = NameSet::new("query functions").reserved(RESERVED_METHODS);
    let mut types = NameSet::new("query result types").reserved(&["Queries"]);

    let mut embedded = Vec::with_capacity(queries.len());
    let mut rows = quote!();
    let mut fns = quote!();

    for query in queries {
        let name = query.name.as_str();
        let encoded = query.query_encoded.as_str();
        embedded.push(quote! {
            ::querygen_runtime::embedded::EmbeddedQuery::new(#name, #encoded)
        });

        let shape = query.result_shape();
        let row = match &shape {
            ResultShape::Rows { fields, inferred } => {
                let (ident, tokens) = row_struct(query, fields, *inferred)?;
                types.claim(&ident, name)?;
                rows.extend(tokens);
                Some(ident)
            }
            ResultShape::Missing => {
                warn!(
                    query = name,
                    origin = %query.origin,
                    "no result fields, generated function will fail when called"
                );
                None
            }
            ResultShape::Exec => None,
        };

        fns.extend(query_fns(query, &shape, row.as_ref(), &mut methods)?);
    }

    Ok(quote! {
        const EMBEDDED_QUERIES: &[::querygen_runtime::embedded::EmbeddedQuery] = &[
            #(#embedded),*
        ];

        #rows

        /// Generated query accessors sharing one runtime and statement cache.
        #[derive(Clone, Debug)]
        pub struct Queries {
            runtime: ::querygen_runtime::runtime::Runtime,
            sql: ::querygen_runtime::embedded::QuerySet,
        }

        impl Queries {
            /// Build a handle over `driver`; fails if the embedded SQL cannot be decoded.
            pub fn new(
                driver: ::std::sync::Arc<dyn ::querygen_runtime::driver::Driver>,
            ) -> ::std::result::Result<Self, ::querygen_runtime::Error> {
                Self::with_runtime(::querygen_runtime::runtime::Runtime::new(driver))
            }

            /// Build a handle that shares an existing runtime (and its cache).
            pub fn with_runtime(
                runtime: ::querygen_runtime::runtime::Runtime,
            ) -> ::std::result::Result<Self, ::querygen_runtime::Error> {
                let sql = ::querygen_runtime::embedded::QuerySet::decode(EMBEDDED_QUERIES)?;

                ::std::result::Result::Ok(Self { runtime, sql })
            }

            #[must_use]
            pub const fn runtime(&self) -> &::querygen_runtime::runtime::Runtime {
                &self.runtime
            }

            /// Decoded SQL of the query called `name`.
            #[must_use]
            pub fn sql(&self, name: &str) -> ::std::option::Option<&str> {
                self.sql.get(name)
            }

            pub fn begin(
                &self,
            ) -> ::std::result::Result<
                ::std::boxed::Box<dyn ::querygen_runtime::driver::Transaction>,
                ::querygen_runtime::Error,
            > {
                self.runtime.begin(::std::option::Option::None)
            }

            pub fn begin_ctx(
                &self,
                ctx: &::querygen_runtime::context::Context,
            ) -> ::std::result::Result<
                ::std::boxed::Box<dyn ::querygen_runtime::driver::Transaction>,
                ::querygen_runtime::Error,
            > {
                self.runtime.begin(::std::option::Option::Some(ctx))
            }

            /// Run `f` in a transaction that commits on `Ok` and rolls back on `Err`.
            pub fn transaction<T, F>(&self, f: F) -> ::std::result::Result<T, ::querygen_runtime::Error>
            where
                F: ::std::ops::FnOnce(
                    &mut dyn ::querygen_runtime::driver::Transaction,
                ) -> ::std::result::Result<T, ::querygen_runtime::Error>,
            {
                self.runtime.transaction(::std::option::Option::None, f)
            }

            pub fn transaction_ctx<T, F>(
                &self,
                ctx: &::querygen_runtime::context::Context,
                f: F,
            ) -> ::std::result::Result<T, ::querygen_runtime::Error>
            where
                F: ::std::ops::FnOnce(
                    &mut dyn ::querygen_runtime::driver::Transaction,
                ) -> ::std::result::Result<T, ::querygen_runtime::Error>,
            {
                self.runtime.transaction(::std::option::Option::Some(ctx), f)
            }

            #fns
        }
    })
}

// row_struct
// result fields are text; NULL arrives as ""
fn row_struct(
    query: &NamedQuery,
    fields: &[String],
    inferred: bool,
) -> Result<(Ident, TokenStream), BuildError> {
    let ident = ident::make(&query.name, &format!("{}Row", query.name))?;
    let mut names = NameSet::new(&query.name);
    let mut members = quote!();
    let mut decoders = quote!();

    for (index, field) in fields.iter().enumerate() {
        let field_ident = ident::snake_ident(field)?;
        names.claim(&field_ident, field)?;

        members.extend(quote! {
            pub #field_ident: ::std::string::String,
        });
        decoders.extend(quote! {
            #field_ident: row.take(#index, #field)?,
        });
    }

    let mut doc = format!(" Row returned by `{}`.", query.name);
    if inferred {
        doc.push_str("\n\n Fields inferred from the projection list.");
    }
    let tokens = quote! {
        #[doc = #doc]
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct #ident {
            #members
        }

        impl ::querygen_runtime::row::FromRow for #ident {
            fn from_row(
                mut row: ::querygen_runtime::row::Row,
            ) -> ::std::result::Result<Self, ::querygen_runtime::Error> {
                ::std::result::Result::Ok(Self {
                    #decoders
                })
            }
        }
    };

    Ok((ident, tokens))
}

// query_fns
// the core function plus its four wrappers
fn query_fns(
    query: &NamedQuery,
    shape: &ResultShape,
    row: Option<&Ident>,
    methods: &mut NameSet<'_>,
) -> Result<TokenStream, BuildError> {
    let base = ident::snake_name(&query.name);
    let name = query.name.as_str();

    let mut fn_ident = |suffix: &str| -> Result<Ident, BuildError> {
        let ident = ident::make(name, &format!("{base}{suffix}"))?;
        methods.claim(&ident, name)?;
        Ok(ident)
    };
    let plain = fn_ident("")?;
    let with_ctx = fn_ident("_ctx")?;
    let with_tx = fn_ident("_tx")?;
    let with_ctx_tx = fn_ident("_ctx_tx")?;
    let core = fn_ident("_core")?;

    let output = output_type(query.mode, row);
    let body = core_body(query, shape, row);

    let has_params = query.has_params();
    let (params_decl, params_arg) = if has_params {
        (
            quote!(, params: &[::querygen_runtime::value::Value]),
            quote!(params),
        )
    } else {
        (quote!(), quote!())
    };
    let core_params = if has_params { quote!(params) } else { quote!(&[]) };
    let forward = if has_params { quote!(, #params_arg) } else { quote!() };

    let doc = fn_doc(query);
    let ctx_ty = quote!(&::querygen_runtime::context::Context);
    let tx_ty = quote!(&mut dyn ::querygen_runtime::driver::Transaction);
    let result = quote!(::std::result::Result<#output, ::querygen_runtime::Error>);
    let none = quote!(::std::option::Option::None);

    Ok(quote! {
        fn #core(
            &self,
            ctx: ::std::option::Option<#ctx_ty>,
            tx: ::std::option::Option<#tx_ty>
            #params_decl
        ) -> #result {
            let params: &[::querygen_runtime::value::Value] = #core_params;
            #body
        }

        #[doc = #doc]
        pub fn #plain(&self #params_decl) -> #result {
            self.#core(#none, #none #forward)
        }

        #[doc = #doc]
        pub fn #with_ctx(&self, ctx: #ctx_ty #params_decl) -> #result {
            self.#core(::std::option::Option::Some(ctx), #none #forward)
        }

        #[doc = #doc]
        pub fn #with_tx(&self, tx: #tx_ty #params_decl) -> #result {
            self.#core(#none, ::std::option::Option::Some(tx) #forward)
        }

        #[doc = #doc]
        pub fn #with_ctx_tx(&self, ctx: #ctx_ty, tx: #tx_ty #params_decl) -> #result {
            self.#core(
                ::std::option::Option::Some(ctx),
                ::std::option::Option::Some(tx)
                #forward
            )
        }
    })
}

fn output_type(mode: ResultMode, row: Option<&Ident>) -> TokenStream {
    let row = row.map_or_else(|| quote!(::querygen_runtime::row::Row), |r| quote!(#r));

    match mode {
        ResultMode::Exec => quote!(::querygen_runtime::driver::ExecResult),
        ResultMode::One => quote!(::std::option::Option<#row>),
        ResultMode::Many => quote!(::std::vec::Vec<#row>),
    }
}

fn core_body(query: &NamedQuery, shape: &ResultShape, row: Option<&Ident>) -> TokenStream {
    let name = query.name.as_str();

    if *shape == ResultShape::Missing {
        return quote! {
            let _ = (ctx, tx, params);
            ::std::result::Result::Err(::querygen_runtime::Error::config(#name, #MISSING_FIELDS))
        };
    }

    let statement = quote! {
        let stmt = self.runtime.statement(tx, self.sql.sql(#name)?)?;
    };
    let decode = row.map_or_else(
        || quote!(::std::result::Result::Ok),
        |r| quote!(<#r as ::querygen_runtime::row::FromRow>::from_row),
    );

    match query.mode {
        ResultMode::Exec => quote! {
            #statement
            stmt.exec(ctx, params)
        },
        ResultMode::One => quote! {
            #statement
            stmt.query_one(ctx, params)?.map(#decode).transpose()
        },
        ResultMode::Many => quote! {
            #statement
            stmt.query_many(ctx, params)?.into_iter().map(#decode).collect()
        },
    }
}

fn fn_doc(query: &NamedQuery) -> String {
    let mut doc = format!(" `{}` ({} mode)\n\n ```sql\n", query.name, query.mode);
    for line in query.query.lines() {
        doc.push(' ');
        doc.push_str(line);
        doc.push('\n');
    }
    doc.push_str(" ```");

    if !query.params.is_empty() {
        doc.push_str(&format!("\n\n Parameters: {}.", query.params.join(", ")));
    }
    if query.use_tx {
        doc.push_str("\n\n Intended to run inside a transaction (`*_tx`).");
    }
    if query.use_ctx {
        doc.push_str("\n\n Intended to run with a context (`*_ctx`).");
    }

    doc
}
