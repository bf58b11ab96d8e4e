//! Request-parameter handling for collection endpoints: typed filter
//! parameter objects, order-key allow-lists, and page/limit resolution.
//! Owner scoping itself is anchored by the services before any of these
//! predicates are appended, so a filter can only ever narrow a result set.

pub mod error;
pub mod order;
pub mod pagination;
pub mod params;

/// Render a substring filter into an ILIKE pattern, escaping LIKE
/// metacharacters so user input always matches literally.
pub(crate) fn contains_pattern(fragment: &str) -> String {
    format!("%{}%", escape_like(fragment))
}

fn escape_like(fragment: &str) -> String {
    fragment.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fragment_is_wrapped() {
        assert_eq!(contains_pattern("tank"), "%tank%");
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("back\\slash"), "%back\\\\slash%");
    }
}
