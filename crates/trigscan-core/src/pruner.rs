//! Candidate tag pruning.
//!
//! Adjacent scan offsets frequently vote for the same trigger, so raw
//! candidates arrive clustered in time. Each cluster collapses to one
//! representative.

use crate::tag::TriggerTag;

/// Collapse candidates whose positions fall within `radius_ms` of the start
/// of a cluster.
///
/// Within a cluster the tag with the highest similarity wins; ties keep the
/// earliest position. Input must be sorted by ascending `data_position`.
pub fn prune_tags(candidates: &[TriggerTag], radius_ms: i64) -> Vec<TriggerTag> {
    let mut kept = Vec::new();
    let mut i = 0;
    while i < candidates.len() {
        let cluster_start = candidates[i].data_position;
        let mut best = i;
        let mut j = i + 1;
        while j < candidates.len()
            && candidates[j].data_position - cluster_start <= radius_ms
        {
            if candidates[j].similarity > candidates[best].similarity {
                best = j;
            }
            j += 1;
        }
        if j - i > 1 {
            log::debug!(
                "pruned {} clustered tags near {}ms, kept {}ms",
                j - i - 1,
                cluster_start,
                candidates[best].data_position
            );
        }
        kept.push(candidates[best].clone());
        i = j;
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(data_position: i64, similarity: f64) -> TriggerTag {
        TriggerTag {
            data_position,
            most_similar_frame_position: data_position as i32,
            score: 40.0,
            similarity,
            description: None,
        }
    }

    #[test]
    fn distant_tags_are_untouched() {
        let tags = vec![tag(1000, 0.9), tag(2000, 0.9), tag(3000, 0.9)];
        let pruned = prune_tags(&tags, 500);
        assert_eq!(pruned.len(), 3);
    }

    #[test]
    fn cluster_keeps_the_most_similar_tag() {
        let tags = vec![tag(2880, 0.90), tag(2980, 0.95), tag(3080, 0.91)];
        let pruned = prune_tags(&tags, 500);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].data_position, 2980);
    }

    #[test]
    fn similarity_ties_keep_the_earliest_tag() {
        let tags = vec![tag(2880, 0.9), tag(2980, 0.9)];
        let pruned = prune_tags(&tags, 500);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].data_position, 2880);
    }

    #[test]
    fn separate_clusters_keep_one_representative_each() {
        let tags = vec![
            tag(1000, 0.9),
            tag(1100, 0.95),
            tag(4000, 0.8),
            tag(4100, 0.7),
        ];
        let pruned = prune_tags(&tags, 500);
        assert_eq!(pruned.len(), 2);
        assert_eq!(pruned[0].data_position, 1100);
        assert_eq!(pruned[1].data_position, 4000);
    }

    #[test]
    fn pruned_output_stays_sorted() {
        let tags = vec![
            tag(1000, 0.8),
            tag(1400, 0.95),
            tag(1600, 0.99),
            tag(2400, 0.7),
        ];
        let pruned = prune_tags(&tags, 500);
        let positions: Vec<i64> = pruned.iter().map(|t| t.data_position).collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(prune_tags(&[], 500).is_empty());
    }
}
