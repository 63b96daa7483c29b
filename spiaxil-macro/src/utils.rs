use syn::{Attribute, Ident, Lit, LitInt};

/// Returns ceiling log2.
pub(super) fn clog2(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        (::std::mem::size_of::<usize>() * 8) - (value - 1).leading_zeros() as usize
    }
}

fn get_list_int(attrs: &[Attribute], ident: &str) -> Option<LitInt> {
    for attr in attrs {
        if let Ok(syn::Meta::List(nvs)) = attr.parse_meta() {
            if nvs.path.is_ident(ident) {
                return nvs.nested.iter().find_map(|nv| match nv {
                    syn::NestedMeta::Lit(syn::Lit::Int(value)) => Some(value.clone()),
                    _ => None,
                });
            }
        }
    }
    None
}

pub(super) fn get_enum_width(attrs: &[Attribute]) -> Option<LitInt> { get_list_int(attrs, "width") }

pub(super) fn get_enum_encode_value(attrs: &[Attribute]) -> Option<LitInt> { get_list_int(attrs, "encode") }

/// Returns the port name of a struct member.
///
/// `#[member(name = "")]` hides the member's name so that its ports are flattened into the
/// parent; a missing attribute keeps the field name.
pub(super) fn get_member_symbol(attrs: &[Attribute], name: &Ident) -> Option<Lit> {
    for attr in attrs {
        let meta = match attr.parse_meta() {
            Ok(syn::Meta::List(nvs)) if nvs.path.is_ident("member") => nvs.nested.iter().find_map(|nv| match nv {
                syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) if nv.path.is_ident("name") => Some(nv.lit.clone()),
                _ => None,
            }),
            _ => continue,
        };

        let meta = match meta {
            Some(meta) => meta,
            None => return Some(Lit::new(proc_macro2::Literal::string(&format!("{}", name)))),
        };

        return match meta {
            Lit::Str(ref s) => {
                if s.value().is_empty() {
                    None
                } else {
                    Some(meta)
                }
            }
            lit => panic!("expected string, found {:?}", lit),
        };
    }
    Some(Lit::new(proc_macro2::Literal::string(&format!("{}", name))))
}
