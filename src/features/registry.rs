//! Mechanism identifiers and the feature-group index registry

use crate::error::{Error, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Reaction mechanism variant
///
/// The two acylation routes produce datasets with different feature counts
/// and semantics, so group-to-column tables are maintained per mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mechanism {
    /// First acylation route ("r1ae"), 14 feature columns
    #[serde(rename = "r1ae")]
    Acylation1,
    /// Second acylation route ("r2ae"), 11 feature columns
    #[serde(rename = "r2ae")]
    Acylation2,
}

impl Mechanism {
    /// Short dataset tag used in file names
    pub fn tag(&self) -> &'static str {
        match self {
            Mechanism::Acylation1 => "r1ae",
            Mechanism::Acylation2 => "r2ae",
        }
    }

    /// Number of feature columns in this mechanism's datasets
    pub fn feature_width(&self) -> usize {
        match self {
            Mechanism::Acylation1 => 14,
            Mechanism::Acylation2 => 11,
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Mechanism {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "r1ae" => Ok(Mechanism::Acylation1),
            "r2ae" => Ok(Mechanism::Acylation2),
            other => Err(Error::UnknownMechanism(other.to_string())),
        }
    }
}

/// Registry of feature groups per mechanism
///
/// Maps group name to the ordered list of feature-column indices belonging
/// to that group. Group semantics:
///
/// - `fg1`: nucleophile-ligand bond forming
/// - `fg2`: ligand bond breaking
/// - `fg3`: nucleophile-water proton transfer (route 1 only)
/// - `fg4`: water-glutamate proton transfer (route 1 only)
/// - `fg5`: nucleophile-lysine proton transfer (route 2 only)
/// - `fg6`: lysine-serine proton transfer
/// - `fg7`: serine-ligand proton transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureGroupRegistry {
    groups: BTreeMap<Mechanism, Vec<(String, Vec<usize>)>>,
}

impl FeatureGroupRegistry {
    /// Build an empty registry
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    /// Register a group's column indices for one mechanism
    pub fn insert(
        &mut self,
        mechanism: Mechanism,
        name: impl Into<String>,
        indices: Vec<usize>,
    ) {
        self.groups
            .entry(mechanism)
            .or_default()
            .push((name.into(), indices));
    }

    /// Ordered group names registered for a mechanism
    pub fn group_names(&self, mechanism: Mechanism) -> Vec<String> {
        self.groups
            .get(&mechanism)
            .map(|g| g.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    /// Column indices of one group
    pub fn indices(&self, mechanism: Mechanism, group: &str) -> Result<&[usize]> {
        self.groups
            .get(&mechanism)
            .and_then(|g| g.iter().find(|(name, _)| name == group))
            .map(|(_, idx)| idx.as_slice())
            .ok_or_else(|| Error::UnknownFeatureGroup {
                mechanism: mechanism.tag().to_string(),
                group: group.to_string(),
            })
    }

    /// 0/1 column mask for one group, of length `width`
    ///
    /// Selected columns are 1, all others 0. Fails if any registered index
    /// falls outside the feature width.
    pub fn mask(&self, mechanism: Mechanism, group: &str, width: usize) -> Result<Array1<f64>> {
        let indices = self.indices(mechanism, group)?;
        let mut mask = Array1::zeros(width);
        for &idx in indices {
            if idx >= width {
                return Err(Error::ShapeMismatch(format!(
                    "feature group '{group}' index {idx} out of range for width {width}"
                )));
            }
            mask[idx] = 1.0;
        }
        Ok(mask)
    }

    /// Labels of the columns selected by one group
    pub fn masked_labels(
        &self,
        mechanism: Mechanism,
        group: &str,
        labels: &[String],
    ) -> Result<Vec<String>> {
        let indices = self.indices(mechanism, group)?;
        indices
            .iter()
            .map(|&idx| {
                labels.get(idx).cloned().ok_or_else(|| {
                    Error::ShapeMismatch(format!(
                        "feature group '{group}' index {idx} out of range for {} labels",
                        labels.len()
                    ))
                })
            })
            .collect()
    }

    /// Validate every registered index against the mechanism feature widths
    ///
    /// Called once after construction or deserialization; out-of-range
    /// indices indicate a stale table and fail fast.
    pub fn validate(&self) -> Result<()> {
        for (&mechanism, groups) in &self.groups {
            let width = mechanism.feature_width();
            for (name, indices) in groups {
                for &idx in indices {
                    if idx >= width {
                        return Err(Error::ShapeMismatch(format!(
                            "{mechanism} group '{name}' index {idx} out of range for width {width}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for FeatureGroupRegistry {
    /// The curated per-mechanism tables for the acylation datasets
    fn default() -> Self {
        let mut registry = Self::new();

        registry.insert(Mechanism::Acylation1, "fg1", vec![10]);
        registry.insert(Mechanism::Acylation1, "fg2", vec![9]);
        registry.insert(Mechanism::Acylation1, "fg3", vec![0, 1]);
        registry.insert(Mechanism::Acylation1, "fg4", vec![2, 3]);
        registry.insert(Mechanism::Acylation1, "fg6", vec![4, 5, 12]);
        registry.insert(Mechanism::Acylation1, "fg7", vec![6, 7, 8, 11, 13]);

        registry.insert(Mechanism::Acylation2, "fg1", vec![8]);
        registry.insert(Mechanism::Acylation2, "fg2", vec![7]);
        registry.insert(Mechanism::Acylation2, "fg5", vec![0, 1]);
        registry.insert(Mechanism::Acylation2, "fg6", vec![2, 3]);
        registry.insert(Mechanism::Acylation2, "fg7", vec![4, 5, 6, 9, 10]);

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mechanism_parse() {
        assert_eq!("r1ae".parse::<Mechanism>().unwrap(), Mechanism::Acylation1);
        assert_eq!("r2ae".parse::<Mechanism>().unwrap(), Mechanism::Acylation2);
        assert!(matches!(
            "r3ae".parse::<Mechanism>(),
            Err(Error::UnknownMechanism(_))
        ));
    }

    #[test]
    fn test_default_registry_group_order() {
        let registry = FeatureGroupRegistry::default();
        assert_eq!(
            registry.group_names(Mechanism::Acylation1),
            vec!["fg1", "fg2", "fg3", "fg4", "fg6", "fg7"]
        );
        assert_eq!(
            registry.group_names(Mechanism::Acylation2),
            vec!["fg1", "fg2", "fg5", "fg6", "fg7"]
        );
    }

    #[test]
    fn test_mask_selects_registered_columns() {
        let registry = FeatureGroupRegistry::default();
        let mask = registry.mask(Mechanism::Acylation1, "fg6", 14).unwrap();

        assert_eq!(mask.len(), 14);
        assert_eq!(mask.sum(), 3.0);
        assert_eq!(mask[4], 1.0);
        assert_eq!(mask[5], 1.0);
        assert_eq!(mask[12], 1.0);
        assert_eq!(mask[0], 0.0);
    }

    #[test]
    fn test_mask_unknown_group() {
        let registry = FeatureGroupRegistry::default();
        // fg3 exists only in the first route
        let err = registry.mask(Mechanism::Acylation2, "fg3", 11).unwrap_err();
        assert!(matches!(err, Error::UnknownFeatureGroup { .. }));
    }

    #[test]
    fn test_mask_index_out_of_range() {
        let registry = FeatureGroupRegistry::default();
        let err = registry.mask(Mechanism::Acylation1, "fg7", 10).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }

    #[test]
    fn test_validate_default_tables() {
        FeatureGroupRegistry::default().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_stale_index() {
        let mut registry = FeatureGroupRegistry::new();
        registry.insert(Mechanism::Acylation2, "fg1", vec![11]);
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_masked_labels() {
        let registry = FeatureGroupRegistry::default();
        let labels: Vec<String> = (0..11).map(|i| format!("d{i}")).collect();
        let selected = registry
            .masked_labels(Mechanism::Acylation2, "fg5", &labels)
            .unwrap();
        assert_eq!(selected, vec!["d0", "d1"]);
    }

    #[test]
    fn test_registry_serde_round_trip() {
        let registry = FeatureGroupRegistry::default();
        let json = serde_json::to_string(&registry).unwrap();
        let back: FeatureGroupRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back.indices(Mechanism::Acylation1, "fg7").unwrap(),
            registry.indices(Mechanism::Acylation1, "fg7").unwrap()
        );
    }
}
