mod attribute;
mod param;
mod table;

use crate::model::IntermediateAttributes;

pub(self) fn incompatible_error(
    field_name: &syn::Ident,
    left: impl Into<String>,
    right: impl Into<String>,
) -> syn::Error {
    syn::Error::new(
        field_name.span(),
        format!(
            "Invalid - parameter cannot be both `{}` and `{}`.",
            left.into(),
            right.into(),
        ),
    )
}

/// Merge every `#[xparam(..)]` attribute.
pub(self) fn load_attributes(
    attrs: &[syn::Attribute],
) -> Result<IntermediateAttributes, syn::Error> {
    let mut attributes = IntermediateAttributes::default();

    for attribute in attrs {
        if attribute.path().is_ident("xparam") {
            let IntermediateAttributes { singletons, pairs } =
                IntermediateAttributes::try_from(attribute)?;
            attributes.singletons.extend(singletons);

            for (key, values) in pairs {
                attributes.pairs.entry(key).or_default().extend(values);
            }
        }
    }

    Ok(attributes)
}
