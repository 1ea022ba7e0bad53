// SPDX-License-Identifier: PMPL-1.0-or-later

//! Candidate resolution: turns ranked language hints into the ordered list
//! of legal language codes to probe.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static LANGUAGE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]*$").expect("language code pattern is valid")
});

/// Whether `code` may be substituted into a file path template.
pub fn is_legal_code(code: &str) -> bool {
    LANGUAGE_CODE.is_match(code)
}

/// Build the candidate list, highest priority first.
///
/// Sources are taken in fixed order: forced language, request parameter,
/// session, every `Accept-Language` segment (first two characters,
/// lowercased), then the fallback. Duplicates are removed before illegal
/// codes are dropped, so an illegal forced language never shadows a legal
/// lower-priority one.
pub fn resolve_candidates(
    forced: Option<&str>,
    request_lang: Option<&str>,
    session_lang: Option<&str>,
    accept_language: Option<&str>,
    fallback: &str,
) -> Vec<String> {
    let mut raw: Vec<String> = Vec::new();
    raw.extend(forced.map(str::to_string));
    raw.extend(request_lang.map(str::to_string));
    raw.extend(session_lang.map(str::to_string));
    if let Some(header) = accept_language {
        raw.extend(header.split(',').map(accept_language_prefix));
    }
    raw.push(fallback.to_string());

    let mut candidates: Vec<String> = Vec::with_capacity(raw.len());
    for code in raw {
        if !candidates.contains(&code) {
            candidates.push(code);
        }
    }
    candidates.retain(|code| is_legal_code(code));

    debug!(?candidates, "resolved language candidates");
    candidates
}

fn accept_language_prefix(segment: &str) -> String {
    segment
        .trim_start()
        .chars()
        .take(2)
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fixed_priority_order() {
        let list = resolve_candidates(Some("fr"), Some("de"), Some("it"), Some("es"), "en");
        assert_eq!(list, vec!["fr", "de", "it", "es", "en"]);
    }

    #[test]
    fn fallback_alone_when_nothing_else_given() {
        assert_eq!(resolve_candidates(None, None, None, None, "en"), vec!["en"]);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let list = resolve_candidates(None, Some("en"), Some("en"), Some("de"), "en");
        assert_eq!(list, vec!["en", "de"]);
    }

    #[test]
    fn header_segments_are_truncated_and_lowercased() {
        let list = resolve_candidates(None, None, None, Some("de-DE,FR;q=0.8, en-US;q=0.5"), "en");
        assert_eq!(list, vec!["de", "fr", "en"]);
    }

    #[test]
    fn illegal_codes_are_dropped() {
        let list = resolve_candidates(Some("en; q=0.9"), Some("de"), None, None, "en");
        assert_eq!(list, vec!["de", "en"]);
    }

    #[test]
    fn illegal_forced_language_does_not_block_request_language() {
        let list = resolve_candidates(Some("../etc"), Some("pt_BR"), None, None, "en");
        assert_eq!(list, vec!["pt_BR", "en"]);
    }

    #[test]
    fn case_is_preserved_outside_the_header() {
        let list = resolve_candidates(Some("DE"), None, None, Some("DE"), "en");
        assert_eq!(list, vec!["DE", "de", "en"]);
    }

    #[test]
    fn multibyte_header_segments_do_not_panic() {
        let list = resolve_candidates(None, None, None, Some("日本語,de"), "en");
        assert_eq!(list, vec!["de", "en"]);
    }

    fn legal_code() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_-]{1,6}"
    }

    proptest! {
        #[test]
        fn fallback_is_always_present(
            forced in proptest::option::of(".{0,8}"),
            request in proptest::option::of(".{0,8}"),
            session in proptest::option::of(".{0,8}"),
            header in proptest::option::of(".{0,24}"),
            fallback in legal_code(),
        ) {
            let list = resolve_candidates(
                forced.as_deref(),
                request.as_deref(),
                session.as_deref(),
                header.as_deref(),
                &fallback,
            );
            prop_assert!(list.contains(&fallback));
        }

        #[test]
        fn distinct_fallback_is_always_last(
            forced in proptest::option::of(".{0,8}"),
            request in proptest::option::of(".{0,8}"),
            session in proptest::option::of(".{0,8}"),
            header in proptest::option::of(".{0,24}"),
            // Header segments contribute at most two characters.
            fallback in "[A-Z]{3,6}",
        ) {
            prop_assume!(forced.as_deref() != Some(fallback.as_str()));
            prop_assume!(request.as_deref() != Some(fallback.as_str()));
            prop_assume!(session.as_deref() != Some(fallback.as_str()));
            let list = resolve_candidates(
                forced.as_deref(),
                request.as_deref(),
                session.as_deref(),
                header.as_deref(),
                &fallback,
            );
            prop_assert_eq!(list.last(), Some(&fallback));
        }

        #[test]
        fn output_is_legal_and_unique(
            forced in proptest::option::of(".{0,8}"),
            request in proptest::option::of(".{0,8}"),
            header in proptest::option::of(".{0,24}"),
            fallback in legal_code(),
        ) {
            let list = resolve_candidates(forced.as_deref(), request.as_deref(), None, header.as_deref(), &fallback);
            for (index, code) in list.iter().enumerate() {
                prop_assert!(is_legal_code(code));
                prop_assert!(!list[..index].contains(code));
            }
        }
    }
}
