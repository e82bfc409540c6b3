use std::collections::BTreeMap;

use itertools::Itertools;

use crate::error::Error;

/// Parse a list of `key=value` items into a flat map.
///
/// The first `=` splits key from value; later ones belong to the value.
/// An item without `=` is a key with an empty value. An empty list is
/// an error.
pub fn parse_params<S: AsRef<str>>(items: &[S]) -> Result<BTreeMap<String, String>, Error> {
    if items.is_empty() {
        return Err(Error::NotAQuery("empty list".into()));
    }

    let mut params = BTreeMap::new();
    for item in items {
        match item.as_ref().split_once('=') {
            None => {
                params.insert(item.as_ref().to_string(), String::new());
            }
            Some((key, value)) => {
                params.insert(key.to_string(), value.to_string());
            }
        }
    }

    Ok(params)
}

/// Parse the query part of a request path into a flat string map.
///
/// Everything before and including the first `?` is dropped (later `?`s
/// are treated as part of the query). Percent-encoding is decoded. When
/// the same key appears more than once, its values are collected into a
/// single bracketed, space-separated string such as `[a b]`.
///
/// Inputs too short to hold a path, a `?` and a query, or without any
/// `?` at all, are errors.
pub fn parse_query(query: &str) -> Result<BTreeMap<String, String>, Error> {
    // At minimum a slash, a '?' and one character of query.
    if query.len() < 3 {
        return Err(Error::NotAQuery(format!("too short: `{query}`")));
    }

    let query_str = match query.split_once('?') {
        None => return Err(Error::NotAQuery(format!("no query in `{query}`"))),
        Some((_, rest)) => rest,
    };

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in form_urlencoded::parse(query_str.as_bytes()) {
        grouped
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }

    let params = grouped
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() > 1 {
                format!("[{}]", values.iter().join(" "))
            } else {
                values.pop().unwrap_or_default()
            };
            (key, value)
        })
        .collect();

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn params_split_at_first_equals() {
        let params = parse_params(&["mode=condensed", "note=a=b"]).unwrap();

        assert_eq!(params["mode"], "condensed");
        assert_eq!(params["note"], "a=b");
    }

    #[test]
    fn param_without_value_is_empty() {
        let params = parse_params(&["verbose"]).unwrap();

        assert_eq!(params["verbose"], "");
    }

    #[test]
    fn empty_param_list_is_an_error() {
        let items: [&str; 0] = [];

        assert!(parse_params(&items).is_err());
    }

    #[test]
    fn query_is_taken_after_question_mark() {
        let params = parse_query("/print?mode=condensed&columns=132").unwrap();

        assert_eq!(params["mode"], "condensed");
        assert_eq!(params["columns"], "132");
    }

    #[test]
    fn later_question_marks_stay_in_the_query() {
        let params = parse_query("/p?note=what?&mode=normal").unwrap();

        assert_eq!(params["note"], "what?");
        assert_eq!(params["mode"], "normal");
    }

    #[test]
    fn repeated_keys_collect_into_brackets() {
        let params = parse_query("/p?tag=a&tag=b&tag=c").unwrap();

        assert_eq!(params["tag"], "[a b c]");
    }

    #[test]
    fn percent_encoding_is_decoded() {
        let params = parse_query("/p?text=hello%20world").unwrap();

        assert_eq!(params["text"], "hello world");
    }

    #[test]
    fn no_question_mark_is_an_error() {
        assert!(parse_query("/print/page").is_err());
    }

    #[test]
    fn too_short_is_an_error() {
        assert!(parse_query("?a").is_err());
    }
}
