use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use super::{Wizard, WizardForm};

const DRAFTS_VERSION: u32 = 1;

/// A half-finished wizard, keyed by a generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub kind: String,
    pub step: u32,
    pub saved_at: DateTime<Utc>,
    pub data: serde_json::Value,
}

impl Draft {
    /// Rebuild the wizard this draft was saved from.
    pub fn resume<F>(&self) -> Result<Wizard<F>>
    where
        F: WizardForm + DeserializeOwned,
    {
        if self.kind != F::KIND {
            anyhow::bail!("Draft {} is a {} form, not {}", self.id, self.kind, F::KIND);
        }
        let form: F = serde_json::from_value(self.data.clone())
            .with_context(|| format!("Draft {} does not match the {} form", self.id, F::KIND))?;
        Ok(Wizard::resume(form, self.step))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DraftFile {
    version: u32,
    #[serde(default)]
    drafts: BTreeMap<String, Draft>,
}

impl Default for DraftFile {
    fn default() -> Self {
        Self {
            version: DRAFTS_VERSION,
            drafts: BTreeMap::new(),
        }
    }
}

/// Wizard drafts in one JSON file. Every write replaces the file atomically.
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

/// Default draft file path (~/.config/propertifi/drafts.json)
pub fn get_drafts_path() -> PathBuf {
    crate::config::get_config_dir().join("drafts.json")
}

impl DraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<DraftFile> {
        if !self.path.exists() {
            return Ok(DraftFile::default());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open drafts file at {}", self.path.display()))?;
        let state: DraftFile = serde_json::from_reader(file).context("Failed to load drafts")?;

        if state.version != DRAFTS_VERSION {
            anyhow::bail!("Unsupported drafts file version: {}", state.version);
        }
        Ok(state)
    }

    fn write(&self, state: &DraftFile) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }

        let mut file = AtomicWriteFile::open(&self.path)
            .with_context(|| format!("Failed to open atomic write file at {}", self.path.display()))?;
        serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize drafts")?;
        file.commit().context("Failed to save drafts")?;
        Ok(())
    }

    /// Save a new draft and return its id.
    pub fn save<F>(&self, wizard: &Wizard<F>) -> Result<String>
    where
        F: WizardForm + Serialize,
    {
        let mut state = self.read()?;
        let now = Utc::now();
        let base = format!("{}-{}", F::KIND, now.format("%Y%m%d%H%M%S%3f"));
        let mut id = base.clone();
        let mut n = 1;
        while state.drafts.contains_key(&id) {
            n += 1;
            id = format!("{}-{}", base, n);
        }

        let draft = Draft {
            id: id.clone(),
            kind: F::KIND.to_string(),
            step: wizard.step(),
            saved_at: now,
            data: serde_json::to_value(wizard.form()).context("Failed to serialize form")?,
        };
        state.drafts.insert(id.clone(), draft);
        self.write(&state)?;
        log::debug!("saved draft {} to {}", id, self.path.display());
        Ok(id)
    }

    /// Overwrite an existing draft with the wizard's current state.
    pub fn update<F>(&self, id: &str, wizard: &Wizard<F>) -> Result<()>
    where
        F: WizardForm + Serialize,
    {
        let mut state = self.read()?;
        let draft = state
            .drafts
            .get_mut(id)
            .with_context(|| format!("No draft with id {}", id))?;
        draft.step = wizard.step();
        draft.saved_at = Utc::now();
        draft.data = serde_json::to_value(wizard.form()).context("Failed to serialize form")?;
        self.write(&state)
    }

    pub fn load(&self, id: &str) -> Result<Option<Draft>> {
        Ok(self.read()?.drafts.remove(id))
    }

    /// Returns whether a draft was removed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut state = self.read()?;
        if state.drafts.remove(id).is_none() {
            return Ok(false);
        }
        self.write(&state)?;
        Ok(true)
    }

    /// All drafts, newest first.
    pub fn list(&self) -> Result<Vec<Draft>> {
        let mut drafts: Vec<Draft> = self.read()?.drafts.into_values().collect();
        drafts.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(drafts)
    }
}
