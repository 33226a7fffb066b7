//! Naming helpers for label scopes.
//!
//! A label scope defaults to `"<snake_case host type>.<attribute>"`, e.g. a
//! `BlogPost` host with a `state` attribute resolves labels under
//! `blog_post.state`.

/// Last path segment of `T`'s type name, without generic arguments.
///
/// ```
/// struct BlogPost;
/// assert_eq!(em_types::naming::short_type_name::<BlogPost>(), "BlogPost");
/// ```
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

/// Convert a CamelCase identifier to snake_case.
///
/// Acronyms stay together: `HTTPRequest` becomes `http_request`.
pub fn underscore(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower)
                {
                    out.push('_');
                }
            }
            out.extend(ch.to_lowercase());
        } else if ch == '-' || ch == ' ' {
            out.push('_');
        } else {
            out.push(ch);
        }
    }

    out
}

/// Default label scope for an attribute of a host type.
pub fn default_label_scope(host_type: &str, attribute: &str) -> String {
    let host = host_type.rsplit("::").next().unwrap_or(host_type);
    format!("{}.{attribute}", underscore(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BlogPost;
    struct Wrapper<T>(T);

    #[test]
    fn underscore_cases() {
        assert_eq!(underscore("Post"), "post");
        assert_eq!(underscore("BlogPost"), "blog_post");
        assert_eq!(underscore("HTTPRequest"), "http_request");
        assert_eq!(underscore("Version2Draft"), "version2_draft");
        assert_eq!(underscore("already_snake"), "already_snake");
    }

    #[test]
    fn short_type_name_strips_path_and_generics() {
        assert_eq!(short_type_name::<BlogPost>(), "BlogPost");
        assert_eq!(short_type_name::<Wrapper<BlogPost>>(), "Wrapper");
    }

    #[test]
    fn default_scope_uses_last_segment() {
        assert_eq!(default_label_scope("BlogPost", "state"), "blog_post.state");
        assert_eq!(
            default_label_scope("app::models::Order", "status"),
            "order.status"
        );
    }
}
