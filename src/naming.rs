use schema::TypeKind;

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cases the first letter of `s` like the first letter of `pattern`.
pub fn match_first(s: &str, pattern: &str) -> String {
    let mut chars = s.chars();
    let first = match chars.next() {
        Some(first) => first,
        None => return String::new(),
    };

    match pattern.chars().next() {
        Some(p) if p.is_lowercase() => first.to_lowercase().chain(chars).collect(),
        Some(p) if p.is_uppercase() => first.to_uppercase().chain(chars).collect(),
        _ => s.to_string(),
    }
}

/// Computes the generated name for a schema type entered under `prefix`, and the prefix to
/// hand to the types nested in it.
///
/// Enums and input objects have exactly one generated shape, so they ignore the prefix.
/// Everything else is named after its position in the operation: the prefix, then the type
/// name unless the prefix already ends with it (a `user` field of type `User` gives
/// `QUser`, not `QUserUser`).
///
/// Interfaces and unions hand their *incoming* prefix to their children, so that the
/// implementations are named `<Context><Impl>` rather than `<Context><Interface><Impl>`.
pub fn type_name(prefix: &str, graphql_name: &str, kind: TypeKind) -> (String, String) {
    let type_name = upper_first(graphql_name);

    if kind == TypeKind::Enum || kind == TypeKind::InputObject {
        return (type_name.clone(), type_name);
    }

    let mut name = prefix.to_string();
    if !prefix.ends_with(&type_name) {
        name.push_str(&type_name);
    }

    if kind.is_abstract() {
        return (name, prefix.to_string());
    }

    (name.clone(), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(prefix: &str, graphql_name: &str, kind: TypeKind) -> (String, String) {
        type_name(prefix, graphql_name, kind)
    }

    fn pair(name: &str, next: &str) -> (String, String) {
        (name.to_string(), next.to_string())
    }

    #[test]
    fn upper_first_only_touches_the_first_letter() {
        assert_eq!(upper_first("emailsWithNulls"), "EmailsWithNulls");
        assert_eq!(upper_first("ID"), "ID");
        assert_eq!(upper_first(""), "");
    }

    #[test]
    fn match_first_follows_the_pattern() {
        assert_eq!(match_first("UserQueryInput", "getUser"), "userQueryInput");
        assert_eq!(match_first("userQueryInput", "GetUser"), "UserQueryInput");
        assert_eq!(match_first("UserQueryInput", "_user"), "UserQueryInput");
    }

    #[test]
    fn objects_append_the_type_name() {
        assert_eq!(names("GetUserMe", "User", TypeKind::Object), pair("GetUserMeUser", "GetUserMeUser"));
    }

    #[test]
    fn suffix_is_not_repeated() {
        assert_eq!(names("GetUserUser", "User", TypeKind::Object), pair("GetUserUser", "GetUserUser"));
    }

    #[test]
    fn enums_and_inputs_ignore_the_prefix() {
        assert_eq!(names("GetUserRole", "Role", TypeKind::Enum), pair("Role", "Role"));
        assert_eq!(
            names("Whatever", "userQueryInput", TypeKind::InputObject),
            pair("UserQueryInput", "UserQueryInput")
        );
    }

    #[test]
    fn abstract_types_keep_the_incoming_prefix() {
        assert_eq!(
            names("QRandomLeaf", "LeafContent", TypeKind::Interface),
            pair("QRandomLeafLeafContent", "QRandomLeaf")
        );
        assert_eq!(
            names("QRandomLeaf", "Leaf", TypeKind::Union),
            pair("QRandomLeaf", "QRandomLeaf")
        );
        assert_eq!(
            names("QRandomLeaf", "Article", TypeKind::Object),
            pair("QRandomLeafArticle", "QRandomLeafArticle")
        );
    }
}
