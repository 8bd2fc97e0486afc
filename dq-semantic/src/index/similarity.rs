//! Edit-distance based string similarity.

/// Levenshtein distance counted in `char`s.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// `1 - distance / max_len`, in `[0, 1]`. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f32 / max_len as f32
}

/// Similarity of a tokenized input against a tokenized reference value.
///
/// Combines the best token-to-token similarity with the similarity of the
/// joined strings, weighting whichever is higher at nine tenths.
pub fn overall_similarity(input_tokens: &[String], reference_tokens: &[String]) -> f32 {
    let best_token = input_tokens
        .iter()
        .flat_map(|i| reference_tokens.iter().map(move |r| similarity(i, r)))
        .fold(0.0_f32, f32::max);
    let full = similarity(&input_tokens.join(" "), &reference_tokens.join(" "));

    ((9.0 * best_token + full) / 10.0).max((best_token + 9.0 * full) / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(value: &str) -> Vec<String> {
        value.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("paris", "parsi"), 2);
        assert_eq!(levenshtein("élan", "elan"), 1);
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("same", "same"), 1.0);
        assert_eq!(similarity("abcd", "wxyz"), 0.0);
        assert!((similarity("london", "londn") - 5.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_overall_similarity_prefers_stronger_signal() {
        let exact = overall_similarity(&tokens("new york"), &tokens("new york"));
        assert!((exact - 1.0).abs() < 1e-6);

        // One identical token out of two still scores high
        let partial = overall_similarity(&tokens("york"), &tokens("new york"));
        assert!(partial > 0.9);

        let unrelated = overall_similarity(&tokens("zzzz"), &tokens("paris"));
        assert!(unrelated < 0.2);
    }
}
