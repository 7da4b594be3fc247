//! Fuzzy matching shared by live and offline sources
//!
//! Single-word queries match a field when the query is a case-insensitive
//! substring of it, or when every query character appears in the field in
//! the same relative order. Multi-word queries instead require every
//! whitespace-delimited term to be a substring of the candidate's fields
//! joined together, so "brain mri" finds "MRI - Brain".

/// Substring or ordered-subsequence match against one field
pub fn fuzzy_match(field: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }

    let field = field.to_lowercase();
    field.contains(&query) || is_subsequence(&query, &field)
}

/// Every term of `query` is a substring of the joined `fields`
pub fn terms_match(fields: &[&str], query: &str) -> bool {
    let haystack = fields.join(" ").to_lowercase();
    let mut terms = query.split_whitespace().map(str::to_lowercase).peekable();

    if terms.peek().is_none() {
        return false;
    }

    terms.all(|term| haystack.contains(&term))
}

/// Candidate match used by live adapters filtering local lists
pub fn candidate_matches(fields: &[&str], query: &str) -> bool {
    if query.split_whitespace().count() > 1 {
        return terms_match(fields, query);
    }

    fields.iter().any(|field| fuzzy_match(field, query))
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut needle_chars = needle.chars().peekable();

    for c in haystack.chars() {
        match needle_chars.peek() {
            Some(&n) if n == c => {
                needle_chars.next();
            }
            Some(_) => {}
            None => break,
        }
    }

    needle_chars.peek().is_none()
}
