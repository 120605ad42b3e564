//! Edit distance between identifiers

/// Levenshtein distance between `a` and `b`, giving up once it exceeds `max_dist`
///
/// Any value above `max_dist` means "too far", the exact number is not computed.
pub(crate) fn levenshtein_with_max(a: &str, b: &str, max_dist: usize) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();
    let a_len = a.chars().count();
    if a_len.abs_diff(n) > max_dist {
        return max_dist + 1;
    }
    if n == 0 {
        return a_len;
    }

    // DP rows: distances between `a[..i]` and `b[..j]`
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr: Vec<usize> = vec![0; n + 1];

    for (i, c) in a.chars().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];

        for j in 1..=n {
            let cost = if c == b_chars[j - 1] { 0 } else { 1 };
            let deletion = prev[j] + 1;
            let insertion = curr[j - 1] + 1;
            let substitution = prev[j - 1] + cost;
            curr[j] = deletion.min(insertion).min(substitution);
            row_min = row_min.min(curr[j]);
        }

        if row_min > max_dist {
            return max_dist + 1;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
