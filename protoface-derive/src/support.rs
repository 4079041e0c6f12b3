//! Types and functions related to parsing the input from our proc-macro.

use darling::FromMeta;
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::{Field, GenericArgument, Ident, Path, PathArguments, Result, Type};

/// Arguments of `#[protoface::message(...)]`.
#[derive(Debug, FromMeta)]
pub struct MessageArgs {
    /// Path to the prost message the facade wraps.
    pub storage: Path,
    /// Name reported in errors and logs, defaults to the struct name.
    #[darling(default)]
    pub name: Option<String>,
}

/// Metadata for a single declared field of a facade.
pub struct FieldMetadata<'a> {
    /// Name of the accessor.
    pub name: &'a Ident,
    /// Name of the field on the storage message.
    pub storage_field: Ident,
    /// Declared type of the field.
    pub ty: &'a Type,
    /// The kind of field parsed from `#[proto(...)]` attributes.
    pub kind: FieldKind<'a>,
}

/// What kind of accessors a declared field gets.
pub enum FieldKind<'a> {
    /// Plain value, reads the wire default when unset.
    Scalar,
    /// `optional` field, declared as `Option<T>`; `inner` is `T`.
    Optional { inner: &'a Type },
    /// Enum stored as `i32`, declared with its symbolic type.
    Enumeration,
    /// Sub-message, declared with the facade type of the sub-message.
    Message,
    /// Repeated field, declared as `Vec<T>`; `element` is `T`.
    Repeated { element: &'a Type },
    /// One case of a oneof group.
    OneofCase {
        /// Storage field holding the group, `Option<GroupEnum>`.
        group: Ident,
        /// Path to the variant, e.g. `pb::test::Variant::IntVariant`.
        case: Path,
    },
}

impl FieldKind<'_> {
    /// The oneof group this field belongs to, if any.
    pub fn as_oneof_case(&self) -> Option<(&Ident, &Path)> {
        match self {
            FieldKind::OneofCase { group, case } => Some((group, case)),
            _ => None,
        }
    }
}

/// Flags and strings of a field's `#[proto(...)]` attribute, before the
/// kind is resolved by [`parse_field_metadata`].
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct RawProtoFieldAttrs {
    optional: bool,
    enumeration: bool,
    message: bool,
    repeated: bool,
    oneof: Option<String>,
    case: Option<Path>,
    field: Option<String>,
}

/// Resolves the accessor kind of one declared facade field.
pub fn parse_field_metadata(field: &Field) -> Result<FieldMetadata<'_>> {
    let Some(name) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "facade fields must be named"));
    };

    // Fields without `#[proto]` are scalars.
    let raw = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("proto"))
        .map(|attr| RawProtoFieldAttrs::from_meta(&attr.meta))
        .transpose()
        .map_err(|e| syn::Error::new_spanned(field, e.to_string()))?
        .unwrap_or_default();

    if raw.case.is_some() && raw.oneof.is_none() {
        return Err(syn::Error::new_spanned(
            field,
            "'case' attribute is only valid for oneof fields",
        ));
    }

    let flags = [
        raw.optional,
        raw.enumeration,
        raw.message,
        raw.repeated,
        raw.oneof.is_some(),
    ];
    if flags.iter().filter(|set| **set).count() > 1 {
        return Err(syn::Error::new_spanned(
            field,
            "conflicting field attributes",
        ));
    }

    let storage_field = match raw.field {
        Some(storage_field) => parse_ident(&storage_field, field)?,
        None => name.clone(),
    };

    let kind = if raw.optional {
        let inner = extract_generic_inner_type(&field.ty, "Option").ok_or_else(|| {
            syn::Error::new_spanned(&field.ty, "optional fields must be declared as Option<T>")
        })?;
        FieldKind::Optional { inner }
    } else if raw.repeated {
        let element = extract_generic_inner_type(&field.ty, "Vec").ok_or_else(|| {
            syn::Error::new_spanned(&field.ty, "repeated fields must be declared as Vec<T>")
        })?;
        FieldKind::Repeated { element }
    } else if raw.enumeration {
        FieldKind::Enumeration
    } else if raw.message {
        FieldKind::Message
    } else if let Some(group) = raw.oneof {
        let group = parse_ident(&group, field)?;
        let Some(case) = raw.case else {
            return Err(syn::Error::new_spanned(
                field,
                "oneof field requires case = \"path::to::Group::Variant\" attribute",
            ));
        };
        if case.segments.len() < 2 {
            return Err(syn::Error::new_spanned(
                &case,
                "oneof case must name the variant through its enum, e.g. \"Group::Variant\"",
            ));
        }
        FieldKind::OneofCase { group, case }
    } else {
        FieldKind::Scalar
    };

    Ok(FieldMetadata {
        name,
        storage_field,
        ty: &field.ty,
        kind,
    })
}

fn parse_ident(value: &str, field: &Field) -> Result<Ident> {
    syn::parse_str::<Ident>(value)
        .map(|ident| ident.unraw())
        .map_err(|_| syn::Error::new_spanned(field, format!("'{value}' is not a valid field name")))
}

/// Path of the enum a oneof case belongs to, i.e. `case` without its last segment.
pub fn oneof_enum_path(case: &Path) -> Path {
    let keep = case.segments.len().saturating_sub(1);
    Path {
        leading_colon: case.leading_colon,
        segments: case.segments.iter().take(keep).cloned().collect(),
    }
}

/// Returns `true` if both paths are spelled the same way.
pub fn same_path(a: &Path, b: &Path) -> bool {
    a.to_token_stream().to_string() == b.to_token_stream().to_string()
}

/// Returns the last path segment of a type, e.g. `TestEnum` for `pb::TestEnum`.
pub fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.unraw().to_string()),
        _ => None,
    }
}

/// Element type of an `Option<T>` or `Vec<T>` field declaration.
///
/// `None` means the declared type does not match its `#[proto(...)]` kind,
/// e.g. `#[proto(repeated)] values: i64`, and the caller reports that.
fn extract_generic_inner_type<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last().filter(|s| s.ident == wrapper)?;
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(element)) => Some(element),
        _ => None,
    }
}
