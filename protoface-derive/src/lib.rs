//! Facade generator for protoface.
//!
//! Provides the `#[message(...)]` attribute, which turns a field declaration
//! list into a typed facade over a prost storage message.

use darling::ast::NestedMeta;
use darling::FromMeta;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{DeriveInput, Ident, Path, Result, Type, Visibility};

mod support;

use support::{FieldKind, FieldMetadata, MessageArgs};

/// Generates a facade over a prost message.
///
/// The annotated struct lists the fields the facade exposes; it is replaced
/// by a struct holding a single `protoface::Handle` onto the storage message.
///
/// # Example
///
/// ```ignore
/// #[protoface::message(storage = "pb::Test")]
/// pub struct Test {
///     field: i64,
///     #[proto(optional)]
///     optional_field: Option<i64>,
///     #[proto(enumeration)]
///     enum_field: TestEnum,
///     #[proto(oneof = "variant", case = "pb::test::Variant::IntVariant")]
///     int_variant: i64,
///     #[proto(oneof = "variant", case = "pb::test::Variant::StringVariant")]
///     string_variant: String,
///     #[proto(message)]
///     sibling: Sibling,
///     #[proto(repeated)]
///     repeated_field: Vec<i64>,
/// }
/// ```
///
/// Every field gets a getter, a `set_` setter and a consuming `with_`
/// builder. Depending on the kind, `has_`, `clear_` and `_raw` accessors are
/// generated as well, and each oneof group gets a getter returning the
/// storage's group enum and a `clear_` accessor.
///
/// `Default`, `Debug`, `PartialEq` and `From<Storage>` are implemented for
/// the facade, so don't derive them on the declaration.
#[proc_macro_attribute]
pub fn message(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = match NestedMeta::parse_meta_list(args.into()) {
        Ok(args) => args,
        Err(err) => return darling::Error::from(err).write_errors().into(),
    };
    let args = match MessageArgs::from_list(&args) {
        Ok(args) => args,
        Err(err) => return err.write_errors().into(),
    };
    let input = syn::parse_macro_input!(input as DeriveInput);

    match impl_message(&args, &input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// All the cases of one oneof group declared on a facade.
struct OneofGroup<'a> {
    /// Storage field holding the group.
    field: &'a Ident,
    /// The prost enum of the group, e.g. `pb::test::Variant`.
    enumeration: Path,
}

fn impl_message(args: &MessageArgs, input: &DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "facades cannot be generic",
        ));
    }

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "only named fields supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(input, "only structs supported")),
    };

    let field_info = fields
        .iter()
        .map(support::parse_field_metadata)
        .collect::<Result<Vec<_>>>()?;
    let groups = collect_oneof_groups(&field_info)?;

    let storage = &args.storage;
    let facade_name = args.name.clone().unwrap_or_else(|| name.unraw().to_string());
    let attrs = &input.attrs;

    let accessors = field_info
        .iter()
        .map(|field| generate_accessors(storage, vis, field));
    let group_accessors = groups
        .iter()
        .map(|group| generate_group_accessors(vis, group));

    Ok(quote! {
        #(#attrs)*
        #vis struct #name {
            handle: ::protoface::Handle<#storage>,
        }

        impl ::protoface::Facade for #name {
            type Storage = #storage;
            const NAME: &'static str = #facade_name;

            #[inline]
            fn from_handle(handle: ::protoface::Handle<#storage>) -> Self {
                #name { handle }
            }

            #[inline]
            fn handle(&self) -> &::protoface::Handle<#storage> {
                &self.handle
            }
        }

        impl #name {
            /// Creates a message with every field at its default.
            #vis fn new() -> Self {
                <Self as ::protoface::Facade>::wrap(<#storage as ::core::default::Default>::default())
            }

            #(#accessors)*
            #(#group_accessors)*
        }

        impl ::core::default::Default for #name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::core::convert::From<#storage> for #name {
            fn from(storage: #storage) -> Self {
                <Self as ::protoface::Facade>::wrap(storage)
            }
        }

        impl ::core::fmt::Debug for #name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                self.handle
                    .read(|storage| f.debug_tuple(#facade_name).field(storage).finish())
            }
        }

        impl ::core::cmp::PartialEq for #name {
            fn eq(&self, other: &Self) -> bool {
                self.handle.read(|a| other.handle.read(|b| a == b))
            }
        }
    })
}

/// Groups oneof cases by storage field, checking every case of a group
/// names the same enum.
fn collect_oneof_groups<'a>(fields: &'a [FieldMetadata<'_>]) -> Result<Vec<OneofGroup<'a>>> {
    let mut groups: Vec<OneofGroup<'a>> = Vec::new();

    for field in fields {
        let Some((group_field, case)) = field.kind.as_oneof_case() else {
            continue;
        };
        let enumeration = support::oneof_enum_path(case);

        match groups.iter().find(|group| group.field == group_field) {
            Some(group) if !support::same_path(&group.enumeration, &enumeration) => {
                return Err(syn::Error::new_spanned(
                    case,
                    format!("all cases of oneof '{group_field}' must belong to the same enum"),
                ));
            }
            Some(_) => (),
            None => groups.push(OneofGroup {
                field: group_field,
                enumeration,
            }),
        }
    }

    Ok(groups)
}

/// Parameter type of a setter and the expression converting it to the stored type.
///
/// String fields accept anything convertible into a `String`.
fn setter_param(ty: &Type) -> (TokenStream2, TokenStream2) {
    if support::type_name(ty).as_deref() == Some("String") {
        (
            quote! { impl ::core::convert::Into<#ty> },
            quote! { ::core::convert::Into::into(value) },
        )
    } else {
        (quote! { #ty }, quote! { value })
    }
}

fn generate_accessors(storage: &Path, vis: &Visibility, field: &FieldMetadata) -> TokenStream2 {
    let getter = field.name;
    let accessor = field.name.unraw();
    let setter = format_ident!("set_{}", accessor);
    let builder = format_ident!("with_{}", accessor);
    let has = format_ident!("has_{}", accessor);
    let clear = format_ident!("clear_{}", accessor);
    let sf = &field.storage_field;
    let ty = field.ty;

    match &field.kind {
        FieldKind::Scalar => {
            let (param, convert) = setter_param(ty);
            quote! {
                #vis fn #getter(&self) -> #ty {
                    self.handle.read(|storage| ::core::clone::Clone::clone(&storage.#sf))
                }

                #vis fn #setter(&self, value: #param) {
                    let value = #convert;
                    self.handle.write(move |storage| storage.#sf = value);
                }

                #vis fn #builder(self, value: #param) -> Self {
                    self.#setter(value);
                    self
                }
            }
        }
        FieldKind::Optional { inner } => {
            let (param, convert) = setter_param(inner);
            quote! {
                #vis fn #getter(&self) -> ::core::option::Option<#inner> {
                    self.handle.read(|storage| ::core::clone::Clone::clone(&storage.#sf))
                }

                #vis fn #has(&self) -> bool {
                    self.handle.read(|storage| storage.#sf.is_some())
                }

                #vis fn #setter(&self, value: #param) {
                    let value = #convert;
                    self.handle
                        .write(move |storage| storage.#sf = ::core::option::Option::Some(value));
                }

                #vis fn #clear(&self) {
                    self.handle.write(|storage| storage.#sf = ::core::option::Option::None);
                }

                #vis fn #builder(self, value: #param) -> Self {
                    self.#setter(value);
                    self
                }
            }
        }
        FieldKind::Enumeration => {
            let raw = format_ident!("{}_raw", accessor);
            let enumeration = support::type_name(ty).unwrap_or_else(|| accessor.to_string());
            quote! {
                #vis fn #getter(&self) -> ::core::result::Result<#ty, ::protoface::UnknownEnumValue> {
                    let value = self.handle.read(|storage| storage.#sf);
                    ::protoface::enum_from_wire(#enumeration, value)
                }

                #vis fn #raw(&self) -> i32 {
                    self.handle.read(|storage| storage.#sf)
                }

                #vis fn #setter(&self, value: #ty) {
                    let value: i32 = ::core::convert::Into::into(value);
                    self.handle.write(move |storage| storage.#sf = value);
                }

                #vis fn #builder(self, value: #ty) -> Self {
                    self.#setter(value);
                    self
                }
            }
        }
        FieldKind::OneofCase { group, case } => {
            let (param, convert) = setter_param(ty);
            quote! {
                #vis fn #getter(&self) -> ::core::option::Option<#ty> {
                    self.handle.read(|storage| match &storage.#group {
                        ::core::option::Option::Some(#case(value)) => {
                            ::core::option::Option::Some(::core::clone::Clone::clone(value))
                        }
                        _ => ::core::option::Option::None,
                    })
                }

                #vis fn #setter(&self, value: #param) {
                    let value = #convert;
                    self.handle.write(move |storage| {
                        storage.#group = ::core::option::Option::Some(#case(value));
                    });
                }

                #vis fn #builder(self, value: #param) -> Self {
                    self.#setter(value);
                    self
                }
            }
        }
        FieldKind::Message => {
            let field_name = sf.unraw().to_string();
            quote! {
                #vis fn #getter(&self) -> #ty {
                    fn get(storage: &#storage) -> ::core::option::Option<&<#ty as ::protoface::Facade>::Storage> {
                        storage.#sf.as_ref()
                    }
                    fn get_mut(storage: &mut #storage) -> &mut <#ty as ::protoface::Facade>::Storage {
                        storage.#sf.get_or_insert_with(::core::default::Default::default)
                    }
                    <#ty as ::protoface::Facade>::from_handle(self.handle.project(#field_name, get, get_mut))
                }

                #vis fn #has(&self) -> bool {
                    self.handle.read(|storage| storage.#sf.is_some())
                }

                #vis fn #setter(&self, value: &#ty) {
                    let value = ::protoface::Facade::to_storage(value);
                    self.handle
                        .write(move |storage| storage.#sf = ::core::option::Option::Some(value));
                }

                #vis fn #clear(&self) {
                    self.handle.write(|storage| storage.#sf = ::core::option::Option::None);
                }

                #vis fn #builder(self, value: #ty) -> Self {
                    self.#setter(&value);
                    self
                }
            }
        }
        FieldKind::Repeated { element } => {
            let field_name = sf.unraw().to_string();
            quote! {
                #vis fn #getter(&self) -> ::protoface::RepeatedField<#element> {
                    fn get(storage: &#storage) -> ::core::option::Option<&::std::vec::Vec<#element>> {
                        ::core::option::Option::Some(&storage.#sf)
                    }
                    fn get_mut(storage: &mut #storage) -> &mut ::std::vec::Vec<#element> {
                        &mut storage.#sf
                    }
                    ::protoface::RepeatedField::from_handle(self.handle.project(#field_name, get, get_mut))
                }

                #vis fn #setter<I>(&self, values: I)
                where
                    I: ::core::iter::IntoIterator<Item = #element>,
                {
                    self.#getter().assign(values);
                }

                #vis fn #builder<I>(self, values: I) -> Self
                where
                    I: ::core::iter::IntoIterator<Item = #element>,
                {
                    self.#setter(values);
                    self
                }
            }
        }
    }
}

fn generate_group_accessors(vis: &Visibility, group: &OneofGroup) -> TokenStream2 {
    let getter = group.field;
    let clear = format_ident!("clear_{}", group.field.unraw());
    let enumeration = &group.enumeration;

    quote! {
        #vis fn #getter(&self) -> ::core::option::Option<#enumeration> {
            self.handle.read(|storage| ::core::clone::Clone::clone(&storage.#getter))
        }

        #vis fn #clear(&self) {
            self.handle.write(|storage| storage.#getter = ::core::option::Option::None);
        }
    }
}
