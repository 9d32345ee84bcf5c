//! Decides whether a request payload is a SPARQL Update.
//!
//! The gateway only ever rejects payloads that *confirm* as updates. Text
//! that fails to parse under the Update grammar is passed through without
//! validating it as a query, a malformed read query should still reach the
//! backend and get a protocol-level error there.

use spargebra::Update;

/// Outcome of classifying a request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The payload parses under the SPARQL Update grammar.
    Update,
    /// Anything else, carrying the comment-stripped text to forward.
    Query(String),
}

/// Removes comment lines and blank lines from a SPARQL payload.
///
/// A line counts as a comment when its first non-whitespace character is
/// `#`. Comments could otherwise hide an `INSERT`/`DELETE` keyword from the
/// grammar check, or reach the backend unpredictably.
pub fn strip_comments(raw: &str) -> String {
    raw.lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Classifies a raw SPARQL payload.
pub fn classify(raw: &str) -> Classification {
    let sanitized = strip_comments(raw);

    // The Update grammar admits the empty string (a prologue with no
    // operation), but an empty payload means "no query supplied" here.
    if sanitized.trim().is_empty() {
        return Classification::Query(String::new());
    }

    match Update::parse(&sanitized, None) {
        Ok(_) => Classification::Update,
        Err(_) => Classification::Query(sanitized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_data_is_an_update() {
        let text = "INSERT DATA { <urn:a> <urn:b> <urn:c> }";
        assert_eq!(classify(text), Classification::Update);
    }

    #[test]
    fn delete_where_is_an_update() {
        let text = "DELETE WHERE { ?s ?p ?o }";
        assert_eq!(classify(text), Classification::Update);
    }

    #[test]
    fn update_with_prologue_is_an_update() {
        let text = "PREFIX ex: <http://example.org/>\nINSERT DATA { ex:a ex:b ex:c }";
        assert_eq!(classify(text), Classification::Update);
    }

    #[test]
    fn comments_and_blank_lines_do_not_hide_an_update() {
        let text = "# harmless looking comment\n\n  # another\nINSERT DATA { <urn:a> <urn:b> <urn:c> }\n";
        assert_eq!(classify(text), Classification::Update);
    }

    #[test]
    fn select_query_passes_through_verbatim() {
        let text = "SELECT * WHERE { ?s ?p ?o } LIMIT 1";
        assert_eq!(classify(text), Classification::Query(text.to_owned()));
    }

    #[test]
    fn select_query_passes_through_without_comments() {
        let text = "# fetch everything\nSELECT * WHERE { ?s ?p ?o }";
        assert_eq!(
            classify(text),
            Classification::Query("SELECT * WHERE { ?s ?p ?o }".to_owned())
        );
    }

    #[test]
    fn malformed_text_is_not_an_update() {
        // Not valid SPARQL at all; the backend decides what to do with it.
        assert_eq!(
            classify("SELEC * FROM t"),
            Classification::Query("SELEC * FROM t".to_owned())
        );
    }

    #[test]
    fn empty_payload_is_an_empty_query() {
        assert_eq!(classify(""), Classification::Query(String::new()));
        assert_eq!(classify("   \n\t\n"), Classification::Query(String::new()));
        assert_eq!(classify("# only comments\n"), Classification::Query(String::new()));
    }

    #[test]
    fn comment_stripping_is_idempotent() {
        let text = "# comment\nSELECT ?s\n\nWHERE { ?s ?p ?o }";
        let once = strip_comments(text);
        assert_eq!(strip_comments(&once), once);
    }
}
