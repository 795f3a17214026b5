//! Lossy, bounded rendering of argument values.
//!
//! At most four entries of any list are rendered, the fifth becomes `...`
//! and the rest are dropped. Strings are cut at 64 characters and objects
//! render as their type name. None of these functions can fail.

use super::value::{ArgKey, ArgValue};

/// Entries rendered per list before the `...` marker.
pub const MAX_ENTRIES: usize = 4;

/// Characters of a string value kept before truncation.
pub const MAX_STRING_CHARS: usize = 64;

/// Renders an argument list or nested array as one comma separated string.
pub fn simplify_arguments(args: &[(ArgKey, ArgValue)]) -> String {
    let is_assoc = !is_sequential(args);

    let mut parts = Vec::with_capacity(args.len().min(MAX_ENTRIES + 1));
    for (count, (key, value)) in args.iter().enumerate().map(|(i, entry)| (i + 1, entry)) {
        if count > MAX_ENTRIES {
            parts.push("...".to_string());
            break;
        }

        let value = simplify_argument(value);
        let part = match key {
            ArgKey::Name(name) => format!("'{}' => {}", name, value),
            ArgKey::Index(index) if is_assoc => format!("{} => {}", index, value),
            ArgKey::Index(_) => value,
        };
        parts.push(part);
    }

    parts.join(", ")
}

/// Renders a single value.
pub fn simplify_argument(value: &ArgValue) -> String {
    match value {
        ArgValue::Object { type_name } => type_name.clone(),
        ArgValue::Bool(true) => "true".to_string(),
        ArgValue::Bool(false) => "false".to_string(),
        ArgValue::Str(s) => match s.char_indices().nth(MAX_STRING_CHARS) {
            Some((cut, _)) => format!("'{}...'", &s[..cut]),
            None => format!("'{}'", s),
        },
        ArgValue::Array(entries) => format!("[{}]", simplify_arguments(entries)),
        ArgValue::Null => "null".to_string(),
        ArgValue::Resource => "resource".to_string(),
        ArgValue::Int(n) => n.to_string(),
        ArgValue::UInt(n) => n.to_string(),
        ArgValue::Float(n) => n.to_string(),
    }
}

/// Keys are exactly `0..n-1` in order.
fn is_sequential(args: &[(ArgKey, ArgValue)]) -> bool {
    args.iter()
        .enumerate()
        .all(|(position, (key, _))| matches!(key, ArgKey::Index(index) if *index == position as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positional(values: Vec<ArgValue>) -> Vec<(ArgKey, ArgValue)> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| (ArgKey::from(i), value))
            .collect()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(simplify_argument(&ArgValue::Bool(true)), "true");
        assert_eq!(simplify_argument(&ArgValue::Bool(false)), "false");
        assert_eq!(simplify_argument(&ArgValue::Null), "null");
        assert_eq!(simplify_argument(&ArgValue::Resource), "resource");
        assert_eq!(simplify_argument(&ArgValue::Int(-7)), "-7");
        assert_eq!(simplify_argument(&ArgValue::Float(1.5)), "1.5");
        assert_eq!(simplify_argument(&ArgValue::Float(2.0)), "2");
        assert_eq!(simplify_argument(&ArgValue::object("Session")), "Session");
        assert_eq!(simplify_argument(&ArgValue::Str("a string".into())), "'a string'");
    }

    #[test]
    fn test_unsigned_extremes_keep_their_value() {
        use crate::trace::TraceArg;

        let args = positional(vec![u64::MAX.to_arg_value(), usize::MAX.to_arg_value()]);
        assert_eq!(
            simplify_arguments(&args),
            format!("{}, {}", u64::MAX, usize::MAX)
        );
        assert_eq!(simplify_argument(&ArgValue::UInt(u64::MAX)), "18446744073709551615");
    }

    #[test]
    fn test_string_truncation_boundary() {
        let exact = "a".repeat(64);
        assert_eq!(
            simplify_argument(&ArgValue::Str(exact.clone())),
            format!("'{}'", exact)
        );

        let long = "a".repeat(100);
        assert_eq!(
            simplify_argument(&ArgValue::Str(long)),
            format!("'{}...'", "a".repeat(64))
        );
    }

    #[test]
    fn test_string_truncation_counts_characters() {
        let long = "é".repeat(65);
        assert_eq!(
            simplify_argument(&ArgValue::Str(long)),
            format!("'{}...'", "é".repeat(64))
        );
    }

    #[test]
    fn test_positional_list_caps_at_five_entries() {
        let args = positional((1..=7).map(ArgValue::Int).collect());
        let rendered = simplify_arguments(&args);
        assert_eq!(rendered, "1, 2, 3, 4, ...");
        assert_eq!(rendered.split(", ").count(), 5);
    }

    #[test]
    fn test_exactly_four_entries_has_no_marker() {
        let args = positional((1..=4).map(ArgValue::Int).collect());
        assert_eq!(simplify_arguments(&args), "1, 2, 3, 4");
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(simplify_arguments(&[]), "");
        assert_eq!(simplify_argument(&ArgValue::Array(vec![])), "[]");
    }

    #[test]
    fn test_named_keys_are_quoted() {
        let args = vec![
            (ArgKey::from("object"), ArgValue::object("Session")),
            (ArgKey::from("bool"), ArgValue::Bool(true)),
        ];
        assert_eq!(simplify_arguments(&args), "'object' => Session, 'bool' => true");
    }

    #[test]
    fn test_sparse_and_mixed_keys() {
        let holes = ArgValue::map([(ArgKey::Index(9), "nine"), (ArgKey::Index(5), "five")]);
        assert_eq!(simplify_argument(&holes), "[9 => 'nine', 5 => 'five']");

        let mixed = ArgValue::map([(ArgKey::Index(0), "foo"), (ArgKey::from("name"), "bar")]);
        assert_eq!(simplify_argument(&mixed), "[0 => 'foo', 'name' => 'bar']");

        let list = ArgValue::list(["foo", "bar"]);
        assert_eq!(simplify_argument(&list), "['foo', 'bar']");
    }

    #[test]
    fn test_fifth_named_entry_is_bare_marker() {
        let args: Vec<(ArgKey, ArgValue)> = ["a", "b", "c", "d", "e", "f"]
            .into_iter()
            .map(|key| (ArgKey::from(key), ArgValue::Int(1)))
            .collect();
        assert_eq!(
            simplify_arguments(&args),
            "'a' => 1, 'b' => 1, 'c' => 1, 'd' => 1, ..."
        );
    }

    #[test]
    fn test_nested_arrays_recurse() {
        let nested = ArgValue::map([(
            "sub",
            ArgValue::map([
                ("null", ArgValue::Null),
                ("resource", ArgValue::Resource),
            ]),
        )]);
        assert_eq!(
            simplify_argument(&nested),
            "['sub' => ['null' => null, 'resource' => resource]]"
        );
    }
}
