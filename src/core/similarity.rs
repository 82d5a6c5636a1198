use std::collections::HashSet;

/// 兩組標籤 (視為集合) 的 Jaccard 係數
///
/// 任一邊為空時回傳 `0.0`
pub fn score<A, B>(tags_a: &[A], tags_b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let set_a: HashSet<&str> = tags_a.iter().map(AsRef::as_ref).collect();
    let set_b: HashSet<&str> = tags_b.iter().map(AsRef::as_ref).collect();

    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: [&str; 0] = [];

    #[test]
    fn test_partial_overlap() {
        assert_eq!(score(&["ai", "crm"], &["ai", "workflow"]), 1.0 / 3.0);
    }

    #[test]
    fn test_symmetry() {
        let a = ["clickup", "crm", "workflow", "automation"];
        let b = ["ai", "automation", "workflow", "n8n", "make"];
        assert_eq!(score(&a, &b), score(&b, &a));
    }

    #[test]
    fn test_identical_sets_score_one() {
        let a = ["security", "data", "privacy"];
        assert_eq!(score(&a, &a), 1.0);
    }

    #[test]
    fn test_empty_side_scores_zero() {
        assert_eq!(score(&EMPTY, &["ai"]), 0.0);
        assert_eq!(score(&["ai"], &EMPTY), 0.0);
        assert_eq!(score(&EMPTY, &EMPTY), 0.0);
    }

    #[test]
    fn test_duplicates_collapse() {
        // {ai, ai, crm} 視為集合 {ai, crm}
        assert_eq!(score(&["ai", "ai", "crm"], &["ai", "workflow"]), 1.0 / 3.0);
        assert_eq!(score(&["ai", "ai"], &["ai"]), 1.0);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(score(&["AI"], &["ai"]), 0.0);
    }
}
