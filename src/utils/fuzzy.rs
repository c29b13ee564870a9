// Fuzzy matching utilities for "did you mean" suggestions

/// Calculate Levenshtein distance between two strings
/// Returns the minimum number of single-character edits (insertions, deletions, substitutions)
/// needed to transform one string into another
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    // Single rolling row instead of the full matrix
    let mut prev: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut cur = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        cur[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            cur[j + 1] = (prev[j + 1] + 1)      // deletion
                .min(cur[j] + 1)                // insertion
                .min(prev[j] + cost);           // substitution
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[s2_chars.len()]
}

/// Closest candidate within `max_distance` (case-insensitive), if any
pub fn closest_match<'a>(input: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    candidates
        .iter()
        .map(|c| (*c, levenshtein_distance(&input_lower, &c.to_lowercase())))
        .filter(|(_, d)| *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

/// Find near matches for a category name among existing ones
/// Returns up to 5 matches sorted by distance (closest first), exact matches excluded
pub fn find_near_category_matches(
    search_name: &str,
    categories: &[String],
    max_distance: usize,
) -> Vec<(String, usize)> {
    let search_lower = search_name.to_lowercase();
    let mut matches: Vec<(String, usize)> = categories
        .iter()
        .filter(|c| c.to_lowercase() != search_lower)
        .filter_map(|c| {
            let distance = levenshtein_distance(&search_lower, &c.to_lowercase());
            (distance <= max_distance).then(|| (c.clone(), distance))
        })
        .collect();

    matches.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    matches.dedup_by(|a, b| a.0 == b.0);
    matches.truncate(5);
    matches
}
