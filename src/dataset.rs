use indexmap::IndexMap;
use serde_json::Value;

/// An ordered column -> scalar mapping, exactly as the JSON object arrived.
pub type Row = IndexMap<String, Value>;
pub type Dataset = Vec<Row>;

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// String coercion for a cell value. Strings render bare, everything else
/// through its JSON form; an absent column renders the literal "undefined".
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) => "null".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Byte range of the first case-insensitive occurrence of `term` in `word`,
/// expressed in `word`'s own bytes. Lowercasing can change a char's byte
/// length, so the lowered haystack carries a byte-by-byte map back to the
/// original char boundaries.
pub fn find_match(word: &str, term: &str) -> Option<(usize, usize)> {
    if term.is_empty() {
        return None;
    }
    let needle = term.to_lowercase();

    let mut lowered = String::with_capacity(word.len());
    let mut starts = Vec::with_capacity(word.len());
    let mut ends = Vec::with_capacity(word.len());
    for (pos, ch) in word.char_indices() {
        let char_end = pos + ch.len_utf8();
        for lc in ch.to_lowercase() {
            for _ in 0..lc.len_utf8() {
                starts.push(pos);
                ends.push(char_end);
            }
            lowered.push(lc);
        }
    }

    let at = lowered.find(&needle)?;
    Some((starts[at], ends[at + needle.len() - 1]))
}

/// Ordered, deduplicated column names: one left-to-right scan over the rows,
/// first occurrence wins. Computed once per dataset load and never from a
/// filtered subset, so the header stays stable across re-filters.
pub fn enumerate_columns(data: &[Row]) -> Vec<String> {
    let mut cols: Vec<String> = Vec::new();
    for row in data {
        for key in row.keys() {
            if !cols.iter().any(|c| c == key) {
                cols.push(key.clone());
            }
        }
    }
    cols
}

/// Uppercase the first letter of every whitespace-delimited word.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch.is_whitespace();
    }
    out
}

fn row_matches(row: &Row, term: &str) -> bool {
    row.values()
        .any(|v| find_match(&cell_text(Some(v)), term).is_some())
}

fn emphasize(row: &Row, term: &str) -> Row {
    row.iter()
        .map(|(key, value)| {
            let word = cell_text(Some(value));
            match find_match(&word, term) {
                Some((start, end)) => {
                    let marked = format!(
                        "{}{MARK_OPEN}{}{MARK_CLOSE}{}",
                        &word[..start],
                        &word[start..end],
                        &word[end..]
                    );
                    (key.clone(), Value::String(marked))
                }
                // Columns without a match stay byte-identical to the source.
                None => (key.clone(), value.clone()),
            }
        })
        .collect()
}

/// The filtered view: rows of the FULL dataset whose any column contains the
/// term case-insensitively, each matching column's first occurrence wrapped
/// in a highlight marker. The empty term is the identity filter. Each call
/// starts from the unfiltered dataset, so filters never accumulate.
pub fn compute_filtered_view(data: &[Row], term: &str) -> Vec<Row> {
    if term.is_empty() {
        return data.to_vec();
    }
    data.iter()
        .filter(|row| row_matches(row, term))
        .map(|row| emphasize(row, term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn beers() -> Dataset {
        let rows = json!([
            {"name": "IPA", "abv": "6.5"},
            {"name": "Stout", "abv": "7.0"}
        ]);
        serde_json::from_value(rows).unwrap()
    }

    #[test]
    fn empty_term_is_identity() {
        let data = beers();
        let view = compute_filtered_view(&data, "");
        assert_eq!(view, data);
        for row in &view {
            for value in row.values() {
                assert!(!cell_text(Some(value)).contains(MARK_OPEN));
            }
        }
    }

    #[test]
    fn matching_row_gets_marked() {
        let data = beers();
        let view = compute_filtered_view(&data, "ipa");
        assert_eq!(view.len(), 1);
        assert_eq!(view[0]["name"], json!("<mark>IPA</mark>"));
        // Non-matching column is untouched.
        assert_eq!(view[0]["abv"], data[0]["abv"]);
    }

    #[test]
    fn filtering_preserves_relative_order() {
        let data: Dataset = serde_json::from_value(json!([
            {"name": "a1", "tag": "x"},
            {"name": "b", "tag": "y"},
            {"name": "a2", "tag": "x"}
        ]))
        .unwrap();
        let view = compute_filtered_view(&data, "x");
        let names: Vec<String> = view
            .iter()
            .map(|r| cell_text(r.get("name")))
            .collect();
        assert_eq!(names, vec!["a1", "a2"]);
    }

    #[test]
    fn exactly_one_occurrence_is_wrapped_per_column() {
        let data: Dataset =
            serde_json::from_value(json!([{"name": "abcabc"}])).unwrap();
        let view = compute_filtered_view(&data, "abc");
        assert_eq!(view[0]["name"], json!("<mark>abc</mark>abc"));
    }

    #[test]
    fn refiltering_depends_only_on_last_term() {
        let data = beers();
        let _ = compute_filtered_view(&data, "stout");
        let view = compute_filtered_view(&data, "ipa");
        assert_eq!(view.len(), 1);
        assert_eq!(view[0]["name"], json!("<mark>IPA</mark>"));
    }

    #[test]
    fn registry_is_invariant_under_filtering() {
        let data = beers();
        let cols = enumerate_columns(&data);
        let view = compute_filtered_view(&data, "ipa");
        let filtered_cols = enumerate_columns(&view);
        assert!(filtered_cols.iter().all(|c| cols.contains(c)));
        assert_eq!(enumerate_columns(&data), cols);
    }

    #[test]
    fn rows_parsed_from_json_keep_document_key_order() {
        // Needs serde_json's preserve_order map; without it keys come back
        // alphabetized and the first-seen column order is lost.
        let row: Row =
            serde_json::from_value(json!({"name": "IPA", "abv": "6.5", "ibu": 60})).unwrap();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "abv", "ibu"]);
    }

    #[test]
    fn columns_in_first_seen_order_across_rows() {
        let data: Dataset = serde_json::from_value(json!([
            {"b": 1, "a": 2},
            {"a": 3, "c": 4}
        ]))
        .unwrap();
        assert_eq!(enumerate_columns(&data), vec!["b", "a", "c"]);
    }

    #[test]
    fn numeric_and_bool_cells_match_by_text() {
        let data: Dataset =
            serde_json::from_value(json!([{"abv": 6.5, "organic": true}])).unwrap();
        let view = compute_filtered_view(&data, "6.5");
        assert_eq!(view.len(), 1);
        assert_eq!(view[0]["abv"], json!("<mark>6.5</mark>"));

        let view = compute_filtered_view(&data, "tru");
        assert_eq!(view[0]["organic"], json!("<mark>tru</mark>e"));
    }

    #[test]
    fn missing_column_renders_undefined() {
        assert_eq!(cell_text(None), "undefined");
    }

    #[test]
    fn find_match_is_case_insensitive() {
        assert_eq!(find_match("Stout", "TOU"), Some((1, 4)));
        assert_eq!(find_match("Stout", "pils"), None);
        assert_eq!(find_match("Stout", ""), None);
    }

    #[test]
    fn find_match_survives_multibyte_text() {
        // The lowered haystack has different byte lengths than the source.
        let (start, end) = find_match("Käsebier", "SEB").unwrap();
        assert_eq!(&"Käsebier"[start..end], "seb");
    }

    #[test]
    fn title_case_per_word() {
        assert_eq!(title_case("first brewed"), "First Brewed");
        assert_eq!(title_case("abv"), "Abv");
        assert_eq!(title_case(""), "");
    }
}
