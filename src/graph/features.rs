//! Ordered feature sequences with deletion gaps

use std::fmt;

/// An ordered sequence of features that tolerates deletions.
///
/// Filters remove entries in place; removed positions become gaps so the
/// remaining entries keep their original positions until [`compact`] yields
/// the dense sequence used for graph construction.
///
/// [`compact`]: FeatureSequence::compact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSequence {
    slots: Vec<Option<String>>,
}

impl FeatureSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: impl Into<String>) {
        self.slots.push(Some(feature.into()));
    }

    /// Number of live features (gaps excluded).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of positions, gaps included.
    pub fn positions(&self) -> usize {
        self.slots.len()
    }

    /// True when the sequence has no gaps.
    pub fn is_dense(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Feature at an original position, `None` for gaps and out-of-range.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.slots.get(position).and_then(|slot| slot.as_deref())
    }

    /// Delete the feature at `position`, leaving a gap.
    pub fn remove(&mut self, position: usize) -> Option<String> {
        self.slots.get_mut(position).and_then(Option::take)
    }

    /// Keep only the features for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        for slot in &mut self.slots {
            if slot.as_deref().is_some_and(|feature| !keep(feature)) {
                *slot = None;
            }
        }
    }

    /// Live features with their original positions.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(position, slot)| slot.as_deref().map(|feature| (position, feature)))
    }

    /// Drop the gaps and reassign contiguous positions.
    pub fn compact(self) -> Vec<String> {
        self.slots.into_iter().flatten().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSequence {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(|s| Some(s.into())).collect(),
        }
    }
}

impl From<Vec<String>> for FeatureSequence {
    fn from(features: Vec<String>) -> Self {
        features.into_iter().collect()
    }
}

impl fmt::Display for FeatureSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let live: Vec<&str> = self.iter().map(|(_, feature)| feature).collect();
        write!(f, "[{}]", live.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_leaves_gap_until_compacted() {
        let mut features: FeatureSequence = ["el", "gato", "corre"].into_iter().collect();
        assert_eq!(features.remove(0), Some("el".to_string()));

        assert_eq!(features.len(), 2);
        assert_eq!(features.positions(), 3);
        assert!(!features.is_dense());
        assert_eq!(features.get(0), None);
        assert_eq!(features.get(1), Some("gato"));

        assert_eq!(features.compact(), vec!["gato", "corre"]);
    }

    #[test]
    fn retain_keeps_original_positions() {
        let mut features: FeatureSequence = ["a", "bb", "c", "dd"].into_iter().collect();
        features.retain(|f| f.len() > 1);

        let live: Vec<_> = features.iter().collect();
        assert_eq!(live, vec![(1, "bb"), (3, "dd")]);
    }

    #[test]
    fn removing_a_gap_is_a_noop() {
        let mut features: FeatureSequence = ["a"].into_iter().collect();
        features.remove(0);
        assert_eq!(features.remove(0), None);
        assert_eq!(features.remove(7), None);
        assert!(features.is_empty());
    }

    #[test]
    fn display_lists_live_features() {
        let mut features: FeatureSequence = ["x", "y", "z"].into_iter().collect();
        features.remove(1);
        assert_eq!(features.to_string(), "[x, z]");
    }
}
