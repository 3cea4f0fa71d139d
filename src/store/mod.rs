//! Keyed cache for derived arrays
//!
//! Gradient sequences, integrated gradients and bootstrap outcomes are
//! derived once and reused by later stages. The store addresses them by an
//! explicit key instead of a file-naming convention, with a Present/Absent
//! contract: a missing artifact means "not yet computed", never zero. A
//! failing producer simply never writes its artifact.

use crate::error::{Error, Result};
use crate::features::Mechanism;
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What kind of derived array an artifact holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Per-path gradient sequences, shape (paths, R - 2)
    Gradients,
    /// Per-path integrated gradients, shape (paths,)
    Integrated,
    /// Bootstrap outcomes, shape (groups, trials)
    Bootstrap,
}

impl ArtifactKind {
    fn tag(&self) -> &'static str {
        match self {
            ArtifactKind::Gradients => "gradients",
            ArtifactKind::Integrated => "integrated",
            ArtifactKind::Bootstrap => "bootstrap",
        }
    }
}

/// Full identity of one stored artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKey {
    /// System name, e.g. the ligand complex
    pub system: String,
    /// Reaction mechanism
    pub mechanism: Mechanism,
    /// Feature group, where the artifact is group-specific
    pub group: Option<String>,
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Bootstrap subsample size, for convergence artifacts
    pub subsample: Option<usize>,
}

impl ArtifactKey {
    /// Key for a (system, mechanism, group) gradient-sequence artifact
    pub fn gradients(system: &str, mechanism: Mechanism, group: &str) -> Self {
        Self {
            system: system.to_string(),
            mechanism,
            group: Some(group.to_string()),
            kind: ArtifactKind::Gradients,
            subsample: None,
        }
    }

    /// Key for a (system, mechanism, group) integrated-gradient artifact
    pub fn integrated(system: &str, mechanism: Mechanism, group: &str) -> Self {
        Self {
            system: system.to_string(),
            mechanism,
            group: Some(group.to_string()),
            kind: ArtifactKind::Integrated,
            subsample: None,
        }
    }

    /// Key for a (system, mechanism, subsample-size) bootstrap artifact
    pub fn bootstrap(system: &str, mechanism: Mechanism, subsample: usize) -> Self {
        Self {
            system: system.to_string(),
            mechanism,
            group: None,
            kind: ArtifactKind::Bootstrap,
            subsample: Some(subsample),
        }
    }

    fn file_name(&self) -> String {
        let mut name = format!("{}.{}", self.system, self.mechanism.tag());
        if let Some(group) = &self.group {
            name.push('.');
            name.push_str(group);
        }
        name.push('.');
        name.push_str(self.kind.tag());
        if let Some(n) = self.subsample {
            name.push_str(&format!("_{n}"));
        }
        name.push_str(".json");
        name
    }
}

/// Whether an artifact has been computed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The artifact exists and is loadable
    Present,
    /// Not yet computed (or its producer failed before writing)
    Absent,
}

#[derive(Serialize, Deserialize)]
struct Record<T> {
    created_at: DateTime<Utc>,
    data: T,
}

/// Directory-backed artifact store
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &ArtifactKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Present/Absent status of one key
    pub fn status(&self, key: &ArtifactKey) -> Presence {
        if self.path_for(key).is_file() {
            Presence::Present
        } else {
            Presence::Absent
        }
    }

    fn save<T: Serialize>(&self, key: &ArtifactKey, data: T) -> Result<()> {
        let record = Record {
            created_at: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| Error::Serialization(format!("{}: {e}", key.file_name())))?;
        fs::write(self.path_for(key), json)?;
        Ok(())
    }

    fn load<T: serde::de::DeserializeOwned>(&self, key: &ArtifactKey) -> Result<T> {
        let path = self.path_for(key);
        let content = fs::read_to_string(&path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", path.display()),
            ))
        })?;
        let record: Record<T> = serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;
        Ok(record.data)
    }

    /// Store a matrix artifact
    pub fn save_matrix(&self, key: &ArtifactKey, matrix: &Array2<f64>) -> Result<()> {
        let rows: Vec<Vec<f64>> = matrix.rows().into_iter().map(|r| r.to_vec()).collect();
        self.save(key, rows)
    }

    /// Load a matrix artifact
    pub fn load_matrix(&self, key: &ArtifactKey) -> Result<Array2<f64>> {
        let rows: Vec<Vec<f64>> = self.load(key)?;
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(Error::ShapeMismatch(format!(
                    "{}: row {i} has {} columns, expected {ncols}",
                    key.file_name(),
                    row.len()
                )));
            }
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec((nrows, ncols), flat)
            .map_err(|e| Error::ShapeMismatch(format!("{}: {e}", key.file_name())))
    }

    /// Store a vector artifact
    pub fn save_vector(&self, key: &ArtifactKey, vector: &Array1<f64>) -> Result<()> {
        self.save(key, vector.to_vec())
    }

    /// Load a vector artifact
    pub fn load_vector(&self, key: &ArtifactKey) -> Result<Array1<f64>> {
        let vals: Vec<f64> = self.load(key)?;
        Ok(Array1::from_vec(vals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};
    use tempfile::TempDir;

    #[test]
    fn test_absent_until_saved() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path()).unwrap();
        let key = ArtifactKey::gradients("sysa", Mechanism::Acylation1, "fg1");

        assert_eq!(store.status(&key), Presence::Absent);
        store.save_matrix(&key, &arr2(&[[1.0, 2.0]])).unwrap();
        assert_eq!(store.status(&key), Presence::Present);
    }

    #[test]
    fn test_matrix_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path()).unwrap();
        let key = ArtifactKey::gradients("sysa", Mechanism::Acylation2, "fg7");
        let matrix = arr2(&[[1.0, -2.0, 3.0], [0.5, 0.0, -0.5]]);

        store.save_matrix(&key, &matrix).unwrap();
        let back = store.load_matrix(&key).unwrap();
        assert_eq!(back, matrix);
    }

    #[test]
    fn test_vector_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path()).unwrap();
        let key = ArtifactKey::integrated("sysa", Mechanism::Acylation1, "fg2");
        let vector = arr1(&[4.0, 5.0, 6.0]);

        store.save_vector(&key, &vector).unwrap();
        let back = store.load_vector(&key).unwrap();
        assert_eq!(back, vector);
    }

    #[test]
    fn test_keys_do_not_collide() {
        let grad = ArtifactKey::gradients("sysa", Mechanism::Acylation1, "fg1");
        let integ = ArtifactKey::integrated("sysa", Mechanism::Acylation1, "fg1");
        let boot_100 = ArtifactKey::bootstrap("sysa", Mechanism::Acylation1, 100);
        let boot_110 = ArtifactKey::bootstrap("sysa", Mechanism::Acylation1, 110);

        let names = [
            grad.file_name(),
            integ.file_name(),
            boot_100.file_name(),
            boot_110.file_name(),
        ];
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_load_absent_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::new(tmp.path()).unwrap();
        let key = ArtifactKey::bootstrap("sysa", Mechanism::Acylation2, 50);
        assert!(matches!(store.load_matrix(&key), Err(Error::Io(_))));
    }
}
