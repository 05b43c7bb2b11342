use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, Fields, GenericArgument, Ident, Lit, LitStr,
    PathArguments, Result as SynResult, Type,
};

/// Per-field options collected from `#[hydrate(...)]`.
#[derive(Default)]
struct FieldOpts {
    rename: Option<String>,
    ty: Option<String>,
    map_to: Option<String>,
    map_each: Option<String>,
    default: Option<Lit>,
    readonly: bool,
    skip: bool,
}

fn parse_field_opts(field: &syn::Field) -> SynResult<FieldOpts> {
    let mut opts = FieldOpts::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("hydrate")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                opts.rename = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("ty") {
                opts.ty = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("map_to") {
                opts.map_to = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("map_each") {
                opts.map_each = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("default") {
                opts.default = Some(meta.value()?.parse::<Lit>()?);
            } else if meta.path.is_ident("readonly") {
                opts.readonly = true;
            } else if meta.path.is_ident("skip") {
                opts.skip = true;
            } else {
                return Err(meta.error("unsupported hydrate field attribute"));
            }
            Ok(())
        })?;
    }
    Ok(opts)
}

fn parse_container_name(input: &DeriveInput) -> SynResult<Option<String>> {
    let mut name = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("hydrate")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("unsupported hydrate container attribute"))
            }
        })?;
    }
    Ok(name)
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(p) if p.qself.is_none() => p.path.segments.last(),
        _ => None,
    }
}

fn first_type_arg(seg: &syn::PathSegment) -> Option<&Type> {
    if let PathArguments::AngleBracketed(args) = &seg.arguments {
        args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        })
    } else {
        None
    }
}

/// Declared type inferred from the Rust type; `None` means mixed.
///
/// `Box` is transparent. Any other generic wrapper is rejected, since its
/// last path segment names no registered type.
fn infer_declared(ty: &Type) -> SynResult<Option<String>> {
    let Some(seg) = last_segment(ty) else {
        return Ok(None);
    };
    let ident = seg.ident.to_string();
    let declared = match ident.as_str() {
        "Option" => match first_type_arg(seg) {
            Some(inner) => infer_declared(inner)?.map(|inner| format!("?{}", inner)),
            None => None,
        },
        "Box" => match first_type_arg(seg) {
            Some(inner) => infer_declared(inner)?,
            None => None,
        },
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
            Some("int".to_string())
        }
        "f32" | "f64" => Some("float".to_string()),
        "bool" => Some("bool".to_string()),
        "String" => Some("string".to_string()),
        "Vec" | "BTreeMap" | "HashMap" => Some("array".to_string()),
        "Value" => None,
        other if matches!(seg.arguments, PathArguments::None) => Some(other.to_string()),
        other => {
            return Err(syn::Error::new_spanned(
                ty,
                format!(
                    "cannot infer a declared type for `{}<..>`; add #[hydrate(ty = \"...\")]",
                    other
                ),
            ))
        }
    };
    Ok(declared)
}

fn field_registration(
    field: &syn::Field,
    ident: &Ident,
    opts: &FieldOpts,
) -> SynResult<TokenStream2> {
    let key = opts.rename.clone().unwrap_or_else(|| ident.to_string());
    let ty = &field.ty;

    let declared = match &opts.ty {
        Some(declared) => Some(declared.clone()),
        None => infer_declared(ty)?,
    };

    let mut def = quote! { ::hydrator::FieldDef::new(#key) };
    if let Some(declared) = declared {
        def = quote! { #def.typed(#declared) };
    }
    if let Some(lit) = &opts.default {
        def = quote! { #def.default(::hydrator::__private::JsonValue::from(#lit)) };
    }
    if let Some(target) = &opts.map_to {
        def = quote! { #def.map_to(#target) };
    }
    if let Some(target) = &opts.map_each {
        def = quote! { #def.map_each(#target) };
    }
    if opts.readonly {
        def = quote! { #def.readonly() };
    }

    Ok(quote! {
        .field(#def, |target: &mut Self, value: #ty| target.#ident = value)
    })
}

fn expand(input: DeriveInput) -> SynResult<TokenStream2> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Hydrate cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => {
                return Ok(impls(name, parse_container_name(&input)?, Vec::new()));
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Hydrate requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Hydrate can only be derived for structs",
            ))
        }
    };

    let mut registrations = Vec::new();
    for field in fields {
        let opts = parse_field_opts(field)?;
        if opts.skip {
            continue;
        }
        if opts.map_to.is_some() && opts.map_each.is_some() {
            return Err(syn::Error::new_spanned(
                field,
                "map_to and map_each are mutually exclusive",
            ));
        }
        if let Some(ident) = &field.ident {
            registrations.push(field_registration(field, ident, &opts)?);
        }
    }

    Ok(impls(name, parse_container_name(&input)?, registrations))
}

fn impls(name: &Ident, registered: Option<String>, registrations: Vec<TokenStream2>) -> TokenStream2 {
    let registered = registered.unwrap_or_else(|| name.to_string());
    quote! {
        impl ::hydrator::Hydrate for #name {
            const NAME: &'static str = #registered;

            fn type_def() -> ::hydrator::TypeDef {
                ::hydrator::ClassDef::<Self>::new(Self::NAME)
                    #(#registrations)*
                    .build()
            }
        }

        impl ::hydrator::FromValue for #name {
            fn from_value(
                value: ::hydrator::Value,
            ) -> ::std::result::Result<Self, ::hydrator::ValueError> {
                value.into_object::<Self>()
            }
        }
    }
}

/// Derive `hydrator::Hydrate` and `hydrator::FromValue` for a named-field struct
/// that implements `Default`.
///
/// ```ignore
/// #[derive(Debug, Default, Hydrate)]
/// #[hydrate(name = "Order")]
/// struct Order {
///     id: i64,
///     #[hydrate(map_each = "Line")]
///     lines: Vec<Line>,
///     #[hydrate(rename = "note", default = "none")]
///     comment: String,
/// }
/// ```
#[proc_macro_derive(Hydrate, attributes(hydrate))]
pub fn derive_hydrate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
