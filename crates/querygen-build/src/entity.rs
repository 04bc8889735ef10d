use crate::{
    BuildError,
    ident::{self, NameSet},
};
use proc_macro2::{Ident, TokenStream};
use querygen_core::schema::Table;
use quote::quote;

///
/// EntityModule
/// One table's generated module: its file/module name and item tokens.
///

#[derive(Debug)]
pub struct EntityModule {
    pub module: Ident,
    pub file_stem: String,
    pub entity: Ident,
    pub tokens: TokenStream,
}

pub fn generate(table: &Table) -> Result<EntityModule, BuildError> {
    let entity = ident::type_ident(&table.name)?;
    let module = ident::snake_ident(&table.name)?;
    let file_stem = module.to_string().trim_start_matches("r#").to_string();

    let mut names = NameSet::new(&table.name);
    let mut fields = quote!();
    let mut decoders = quote!();
    let mut columns = Vec::with_capacity(table.fields.len());

    for (index, field) in table.fields.iter().enumerate() {
        let ident = ident::snake_ident(&field.name)?;
        names.claim(&ident, &field.name)?;

        let ty = field.mapped;
        let column = field.name.as_str();
        let doc = format!(" `{}` ({})", field.name, field.column_type);

        fields.extend(quote! {
            #[doc = #doc]
            pub #ident: #ty,
        });
        decoders.extend(quote! {
            #ident: row.take(#index, #column)?,
        });
        columns.push(column);
    }

    let table_name = table.name.as_str();
    let struct_doc = format!(" Row of table `{table_name}`.");

    let tokens = quote! {
        #[doc = #struct_doc]
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct #entity {
            #fields
        }

        impl #entity {
            pub const TABLE: &'static str = #table_name;
            pub const COLUMNS: &'static [&'static str] = &[#(#columns),*];
        }

        impl ::querygen_runtime::row::FromRow for #entity {
            fn from_row(
                mut row: ::querygen_runtime::row::Row,
            ) -> ::std::result::Result<Self, ::querygen_runtime::Error> {
                ::std::result::Result::Ok(Self {
                    #decoders
                })
            }
        }
    };

    Ok(EntityModule {
        module,
        file_stem,
        entity,
        tokens,
    })
}
