use sqlx::{Postgres, QueryBuilder};

/// A resolved ordering: an allow-listed SQL column and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub column: &'static str,
    pub descending: bool,
}

/// Parse a caller-supplied order string ("name", "-created_at", comma
/// separated for multi-key) against an allow-list of (key, column) pairs.
/// Unrecognized keys are dropped silently; if nothing usable remains the
/// resource's default ordering applies.
pub fn parse(
    raw: Option<&str>,
    allowed: &[(&'static str, &'static str)],
    default_spec: &str,
) -> Vec<OrderSpec> {
    let explicit = raw.map(|s| parse_tokens(s, allowed)).unwrap_or_default();
    if !explicit.is_empty() {
        return explicit;
    }
    parse_tokens(default_spec, allowed)
}

fn parse_tokens(spec: &str, allowed: &[(&'static str, &'static str)]) -> Vec<OrderSpec> {
    spec.split(',')
        .filter_map(|token| {
            let token = token.trim();
            if token.is_empty() {
                return None;
            }
            let (key, descending) = match token.strip_prefix('-') {
                Some(stripped) => (stripped, true),
                None => (token, false),
            };
            allowed
                .iter()
                .find(|(candidate, _)| *candidate == key)
                .map(|(_, column)| OrderSpec { column, descending })
        })
        .collect()
}

/// Append an ORDER BY clause. Columns come from the allow-list only, so they
/// are pushed as raw SQL rather than bound parameters.
pub fn push_order(qb: &mut QueryBuilder<'_, Postgres>, specs: &[OrderSpec]) {
    if specs.is_empty() {
        return;
    }
    qb.push(" ORDER BY ");
    for (i, spec) in specs.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(spec.column);
        qb.push(if spec.descending { " DESC" } else { " ASC" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOWED: &[(&str, &str)] = &[("name", "s.name"), ("created_at", "s.created_at")];

    #[test]
    fn descending_prefix_is_recognized() {
        let specs = parse(Some("-created_at"), ALLOWED, "name");
        assert_eq!(specs, vec![OrderSpec { column: "s.created_at", descending: true }]);
    }

    #[test]
    fn unknown_keys_fall_back_to_default() {
        let specs = parse(Some("bogus"), ALLOWED, "-created_at");
        assert_eq!(specs, vec![OrderSpec { column: "s.created_at", descending: true }]);
    }

    #[test]
    fn known_keys_survive_next_to_unknown_ones() {
        let specs = parse(Some("bogus,name"), ALLOWED, "-created_at");
        assert_eq!(specs, vec![OrderSpec { column: "s.name", descending: false }]);
    }

    #[test]
    fn multi_key_order_is_preserved() {
        let specs = parse(Some("name,-created_at"), ALLOWED, "name");
        assert_eq!(
            specs,
            vec![
                OrderSpec { column: "s.name", descending: false },
                OrderSpec { column: "s.created_at", descending: true },
            ]
        );
    }

    #[test]
    fn missing_order_uses_default() {
        let specs = parse(None, ALLOWED, "-created_at");
        assert_eq!(specs, vec![OrderSpec { column: "s.created_at", descending: true }]);
    }

    #[test]
    fn rendered_clause_lists_each_key() {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM systems s");
        push_order(&mut qb, &parse(Some("name,-created_at"), ALLOWED, "name"));
        assert_eq!(
            qb.into_sql(),
            "SELECT * FROM systems s ORDER BY s.name ASC, s.created_at DESC"
        );
    }

    #[test]
    fn empty_specs_render_nothing() {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1");
        push_order(&mut qb, &[]);
        assert_eq!(qb.into_sql(), "SELECT 1");
    }
}
