use graphql_parser::query::Type;

pub fn extract_inner_name(ty: &Type) -> &str {
    use graphql_parser::query::Type::*;

    match ty {
        NamedType(name) => name,
        ListType(inner) => extract_inner_name(inner),
        NonNullType(inner) => extract_inner_name(inner),
    }
}

/// Strips any non-null markers; nullability never changes the generated shape.
pub fn strip_non_null(ty: &Type) -> &Type {
    match ty {
        Type::NonNullType(inner) => strip_non_null(inner),
        other => other,
    }
}

/// The element type if `ty` is a (possibly non-null) list.
pub fn list_element(ty: &Type) -> Option<&Type> {
    match strip_non_null(ty) {
        Type::ListType(inner) => Some(inner),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Type {
        Type::NamedType(name.to_string())
    }

    #[test]
    fn inner_name_goes_through_wrappers() {
        let ty = Type::NonNullType(Box::new(Type::ListType(Box::new(Type::NonNullType(
            Box::new(named("Dog")),
        )))));
        assert_eq!(extract_inner_name(&ty), "Dog");
    }

    #[test]
    fn list_element_ignores_non_null() {
        let ty = Type::NonNullType(Box::new(Type::ListType(Box::new(named("Int")))));
        assert_eq!(list_element(&ty), Some(&named("Int")));
        assert_eq!(list_element(&named("Int")), None);
    }
}
