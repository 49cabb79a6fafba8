//! Record store
//!
//! Holds machine and machine profile records in memory, optionally backed by
//! a JSON file. Updates can request a forced reload, which persists the store
//! right away and tells listeners on the event bus to refresh their lists.

use crate::error::{DeviceError, DeviceResult};
use crate::model::{MachineProfileRecord, MachineProfileUpdate, MachineRecord, MachineUpdate};
use cncflow_core::{AppEvent, EventBus, RecordKind, SettingsEvent};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// On-disk layout of the record file
#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordFile {
    #[serde(default)]
    machines: Vec<MachineRecord>,
    #[serde(default)]
    machine_profiles: Vec<MachineProfileRecord>,
}

trait Named {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

impl Named for MachineRecord {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for MachineProfileRecord {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

fn sorted_by_name<T: Named + Clone>(map: &HashMap<String, T>) -> Vec<T> {
    let mut records: Vec<T> = map.values().cloned().collect();
    records.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
    records
}

/// All records with `record` in place of the entry sharing its ID
fn with_replaced<T: Named + Clone>(map: &HashMap<String, T>, record: &T) -> Vec<T> {
    let mut records: Vec<T> = map
        .values()
        .filter(|r| r.id() != record.id())
        .cloned()
        .collect();
    records.push(record.clone());
    records.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())));
    records
}

fn write_file(path: &Path, file: &RecordFile) -> DeviceResult<()> {
    let content = serde_json::to_string_pretty(file)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| DeviceError::SaveError(format!("{}: {}", parent.display(), e)))?;
    }
    std::fs::write(path, content)
        .map_err(|e| DeviceError::SaveError(format!("{}: {}", path.display(), e)))?;

    tracing::debug!("Saved records to {}", path.display());
    Ok(())
}

fn insert_unique<T: Named>(map: &mut HashMap<String, T>, record: T) -> DeviceResult<String> {
    let id = record.id().to_string();
    if map.contains_key(&id) {
        return Err(DeviceError::RecordAlreadyExists(id));
    }
    map.insert(id.clone(), record);
    Ok(id)
}

/// In-memory store for machine and machine profile records
#[derive(Default)]
pub struct RecordStore {
    machines: RwLock<HashMap<String, MachineRecord>>,
    profiles: RwLock<HashMap<String, MachineProfileRecord>>,
    path: Option<PathBuf>,
    bus: Option<Arc<EventBus>>,
    reloads: AtomicU64,
}

impl RecordStore {
    /// Create an empty store with no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish record updates on the given bus
    pub fn with_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Load records from a JSON file and keep it as the backing file.
    ///
    /// A missing file yields an empty store that will create it on first save.
    pub fn load_from_file(path: impl Into<PathBuf>) -> DeviceResult<Self> {
        let path = path.into();
        let store = Self {
            path: Some(path.clone()),
            ..Self::default()
        };

        if !path.exists() {
            tracing::debug!("Record file {} not found, starting empty", path.display());
            return Ok(store);
        }

        let content = std::fs::read_to_string(&path)?;
        let file: RecordFile = serde_json::from_str(&content)
            .map_err(|e| DeviceError::LoadError(format!("{}: {}", path.display(), e)))?;

        {
            let mut machines = store.machines.write();
            for record in file.machines {
                insert_unique(&mut *machines, record)?;
            }
            let mut profiles = store.profiles.write();
            for record in file.machine_profiles {
                insert_unique(&mut *profiles, record)?;
            }
        }

        tracing::info!(
            "Loaded {} machines and {} machine profiles from {}",
            store.machines.read().len(),
            store.profiles.read().len(),
            path.display()
        );
        Ok(store)
    }

    /// Write all records to a JSON file
    pub fn save_to_file(&self, path: &Path) -> DeviceResult<()> {
        let file = RecordFile {
            machines: self.machines(),
            machine_profiles: self.machine_profiles(),
        };
        write_file(path, &file)
    }

    /// Write all records to the backing file, if there is one
    pub fn save(&self) -> DeviceResult<()> {
        match &self.path {
            Some(path) => self.save_to_file(path),
            None => Ok(()),
        }
    }

    /// Backing file path
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of forced reloads performed so far
    pub fn reload_count(&self) -> u64 {
        self.reloads.load(Ordering::Relaxed)
    }

    pub fn machine(&self, id: &str) -> Option<MachineRecord> {
        self.machines.read().get(id).cloned()
    }

    /// All machines sorted by name
    pub fn machines(&self) -> Vec<MachineRecord> {
        sorted_by_name(&*self.machines.read())
    }

    pub fn insert_machine(&self, record: MachineRecord) -> DeviceResult<String> {
        let id = insert_unique(&mut *self.machines.write(), record)?;
        tracing::debug!("Added machine {}", id);
        Ok(id)
    }

    /// Replace a machine's fields, keeping its ID.
    ///
    /// With `force_reload` the new record is written to the backing file
    /// first; the store only changes once that write succeeded.
    pub fn update_machine(
        &self,
        id: &str,
        update: MachineUpdate,
        force_reload: bool,
    ) -> DeviceResult<MachineRecord> {
        let mut record = self
            .machine(id)
            .ok_or_else(|| DeviceError::RecordNotFound(id.to_string()))?;
        record.apply(update);

        if let (true, Some(path)) = (force_reload, &self.path) {
            let file = RecordFile {
                machines: with_replaced(&*self.machines.read(), &record),
                machine_profiles: self.machine_profiles(),
            };
            write_file(path, &file)?;
        }

        self.machines.write().insert(id.to_string(), record.clone());
        self.after_update(RecordKind::Machine, id, force_reload);
        Ok(record)
    }

    pub fn remove_machine(&self, id: &str) -> DeviceResult<MachineRecord> {
        self.machines
            .write()
            .remove(id)
            .ok_or_else(|| DeviceError::RecordNotFound(id.to_string()))
    }

    pub fn machine_profile(&self, id: &str) -> Option<MachineProfileRecord> {
        self.profiles.read().get(id).cloned()
    }

    /// All machine profiles sorted by name
    pub fn machine_profiles(&self) -> Vec<MachineProfileRecord> {
        sorted_by_name(&*self.profiles.read())
    }

    pub fn insert_machine_profile(&self, record: MachineProfileRecord) -> DeviceResult<String> {
        let id = insert_unique(&mut *self.profiles.write(), record)?;
        tracing::debug!("Added machine profile {}", id);
        Ok(id)
    }

    /// Replace a machine profile's fields, keeping its ID
    pub fn update_machine_profile(
        &self,
        id: &str,
        update: MachineProfileUpdate,
        force_reload: bool,
    ) -> DeviceResult<MachineProfileRecord> {
        let mut record = self
            .machine_profile(id)
            .ok_or_else(|| DeviceError::RecordNotFound(id.to_string()))?;
        record.apply(update);

        if let (true, Some(path)) = (force_reload, &self.path) {
            let file = RecordFile {
                machines: self.machines(),
                machine_profiles: with_replaced(&*self.profiles.read(), &record),
            };
            write_file(path, &file)?;
        }

        self.profiles.write().insert(id.to_string(), record.clone());
        self.after_update(RecordKind::MachineProfile, id, force_reload);
        Ok(record)
    }

    pub fn remove_machine_profile(&self, id: &str) -> DeviceResult<MachineProfileRecord> {
        self.profiles
            .write()
            .remove(id)
            .ok_or_else(|| DeviceError::RecordNotFound(id.to_string()))
    }

    fn after_update(&self, kind: RecordKind, id: &str, force_reload: bool) {
        if force_reload {
            let count = self.reloads.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::info!("Updated {} {}, reload #{}", kind, id, count);
        } else {
            tracing::debug!("Updated {} {}", kind, id);
        }

        if let Some(bus) = &self.bus {
            let _ = bus.publish(AppEvent::Settings(SettingsEvent::RecordUpdated {
                kind,
                id: id.to_string(),
                reload: force_reload,
            }));
        }
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("machines", &self.machines.read().len())
            .field("machine_profiles", &self.profiles.read().len())
            .field("path", &self.path)
            .field("reloads", &self.reload_count())
            .finish()
    }
}
