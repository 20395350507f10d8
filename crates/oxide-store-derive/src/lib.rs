//! Derive macro for oxide-store class descriptors.
//!
//! This crate provides `#[derive(Model)]`, which implements
//! `oxide_store_schema::Model` for a struct so its storage layout can be
//! generated from the struct definition.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, Meta,
    Path, PathArguments, Type,
};

/// Derives `oxide_store_schema::Model` for a struct.
///
/// # Attributes
///
/// - `#[model(name = "Thread")]` - Class (and table) name, defaults to the
///   struct name
/// - `#[model(setup = "path::to_fn")]` - A `fn() -> Vec<String>` whose
///   statements are appended to the class setup
///
/// # Field Attributes
///
/// - `#[attribute(queryable)]` - The attribute can be matched against
/// - `#[attribute(json_key = "key")]` - JSON key, defaults to the field name
/// - `#[attribute(column = "name")]` - Table column, defaults to the field name
/// - `#[attribute(column_type = "text")]` - Overrides the inferred column type
///   (`text`, `integer`, `boolean`, `date_time` or `none`)
/// - `#[attribute(collection = "Folder")]` - A collection of `Folder` models
/// - `#[attribute(join_queryable_by = "a, b")]` - Attributes copied into the
///   collection's join table
/// - `#[attribute(joined_data = "Table")]` - Data kept in its own table
/// - `#[attribute(skip)]` - Not an attribute
///
/// Without `column_type`, scalar fields map `String`/`str` to text, integers
/// and floats to integer, `bool` to boolean and `*DateTime*`/`SystemTime` to
/// date-time. `Option<T>` uses the mapping of `T`. Any other type is kept in
/// the data blob only.
#[proc_macro_derive(Model, attributes(model, attribute))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_model_impl(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_model_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let model_attrs = parse_model_attrs(&input.attrs, struct_name)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Model derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Model derive only supports structs",
            ));
        }
    };

    let mut attributes = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_attribute_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        attributes.push(attribute_tokens(field_name, &field.ty, attrs)?);
    }

    let class_name = &model_attrs.name;
    let setup = model_attrs.setup.map(|path| {
        quote! { .setup_statements(#path()) }
    });
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::oxide_store_schema::Model for #struct_name #ty_generics #where_clause {
            fn class_descriptor() -> ::oxide_store_schema::ClassDescriptor {
                ::oxide_store_schema::ClassDescriptor::new(#class_name)
                    #(.with_attribute(#attributes))*
                    #setup
            }
        }
    })
}

fn attribute_tokens(
    field_name: &Ident,
    field_type: &Type,
    attrs: AttributeAttrs,
) -> syn::Result<TokenStream2> {
    let model_key = field_name.to_string();

    let mut tokens = match (attrs.collection, attrs.joined_data) {
        (Some(_), Some(_)) => {
            return Err(syn::Error::new_spanned(
                field_name,
                "an attribute cannot be both a collection and joined data",
            ));
        }
        (Some(item_class), None) => {
            let mut tokens = quote! {
                ::oxide_store_schema::Attribute::collection(#model_key, #item_class)
            };
            if !attrs.join_queryable_by.is_empty() {
                let keys = &attrs.join_queryable_by;
                tokens.extend(quote! { .join_queryable_by([#(#keys),*]) });
            }
            tokens
        }
        (None, Some(model_table)) => quote! {
            ::oxide_store_schema::Attribute::joined_data(#model_key, #model_table)
        },
        (None, None) => {
            if !attrs.join_queryable_by.is_empty() {
                return Err(syn::Error::new_spanned(
                    field_name,
                    "join_queryable_by requires a collection attribute",
                ));
            }
            let column_type = attrs
                .column_type
                .unwrap_or_else(|| infer_column_type(field_type));
            let column_type = column_type_tokens(column_type);
            quote! {
                ::oxide_store_schema::Attribute::scalar(#model_key, #column_type)
            }
        }
    };

    let queryable = attrs.queryable;
    tokens.extend(quote! { .queryable(#queryable) });
    if let Some(json_key) = attrs.json_key {
        tokens.extend(quote! { .with_json_key(#json_key) });
    }
    if let Some(column) = attrs.column {
        tokens.extend(quote! { .with_table_column(#column) });
    }
    Ok(tokens)
}

#[derive(Clone, Copy)]
enum ColumnKind {
    Text,
    Integer,
    Boolean,
    DateTime,
    None,
}

fn column_type_tokens(kind: ColumnKind) -> TokenStream2 {
    let variant = match kind {
        ColumnKind::Text => quote!(Text),
        ColumnKind::Integer => quote!(Integer),
        ColumnKind::Boolean => quote!(Boolean),
        ColumnKind::DateTime => quote!(DateTime),
        ColumnKind::None => return quote!(::core::option::Option::None),
    };
    quote! { ::core::option::Option::Some(::oxide_store_schema::ColumnType::#variant) }
}

fn infer_column_type(ty: &Type) -> ColumnKind {
    match ty {
        Type::Reference(reference) => infer_column_type(&reference.elem),
        Type::Path(type_path) => {
            let Some(segment) = type_path.path.segments.last() else {
                return ColumnKind::None;
            };
            let name = segment.ident.to_string();
            match name.as_str() {
                "Option" => match &segment.arguments {
                    PathArguments::AngleBracketed(args) => match args.args.first() {
                        Some(GenericArgument::Type(inner)) => infer_column_type(inner),
                        _ => ColumnKind::None,
                    },
                    _ => ColumnKind::None,
                },
                "String" | "str" => ColumnKind::Text,
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
                | "u128" | "usize" | "f32" | "f64" => ColumnKind::Integer,
                "bool" => ColumnKind::Boolean,
                "SystemTime" => ColumnKind::DateTime,
                s if s.contains("DateTime") => ColumnKind::DateTime,
                _ => ColumnKind::None,
            }
        }
        _ => ColumnKind::None,
    }
}

struct ModelAttrs {
    name: String,
    setup: Option<Path>,
}

#[derive(Default)]
struct AttributeAttrs {
    skip: bool,
    queryable: bool,
    json_key: Option<String>,
    column: Option<String>,
    column_type: Option<ColumnKind>,
    collection: Option<String>,
    join_queryable_by: Vec<String>,
    joined_data: Option<String>,
}

fn parse_model_attrs(attrs: &[Attribute], struct_name: &Ident) -> syn::Result<ModelAttrs> {
    let mut result = ModelAttrs {
        name: struct_name.to_string(),
        setup: None,
    };

    for attr in attrs {
        if !attr.path().is_ident("model") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                result.name = meta.value()?.parse::<LitStr>()?.value();
            } else if meta.path.is_ident("setup") {
                result.setup = Some(meta.value()?.parse::<LitStr>()?.parse::<Path>()?);
            } else {
                return Err(meta.error("unsupported model property"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_attribute_attrs(attrs: &[Attribute]) -> syn::Result<AttributeAttrs> {
    let mut result = AttributeAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("attribute") {
            continue;
        }
        // A bare #[attribute] carries no options
        if matches!(attr.meta, Meta::Path(_)) {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("queryable") {
                result.queryable = true;
            } else if meta.path.is_ident("json_key") {
                result.json_key = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("column") {
                result.column = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("column_type") {
                let lit = meta.value()?.parse::<LitStr>()?;
                result.column_type = Some(match lit.value().as_str() {
                    "text" => ColumnKind::Text,
                    "integer" => ColumnKind::Integer,
                    "boolean" => ColumnKind::Boolean,
                    "date_time" => ColumnKind::DateTime,
                    "none" => ColumnKind::None,
                    _ => {
                        return Err(syn::Error::new_spanned(
                            lit,
                            "expected one of: text, integer, boolean, date_time, none",
                        ));
                    }
                });
            } else if meta.path.is_ident("collection") {
                result.collection = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("join_queryable_by") {
                let keys = meta.value()?.parse::<LitStr>()?.value();
                result.join_queryable_by.extend(
                    keys.split(',')
                        .map(str::trim)
                        .filter(|key| !key.is_empty())
                        .map(str::to_string),
                );
            } else if meta.path.is_ident("joined_data") {
                result.joined_data = Some(meta.value()?.parse::<LitStr>()?.value());
            } else {
                return Err(meta.error("unsupported attribute property"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}
