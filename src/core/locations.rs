// src/core/locations.rs
// Named destinations: the saved set offered to the operator, and an editing
// buffer that only reaches the saved set on commit.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::{Point2D, Pose2D};

/// A named pose the robot can be sent to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Unique for the lifetime of the parameter store
    pub id: u64,
    /// Display name, unique within a set
    pub name: String,
    /// World x (metres)
    pub x: f64,
    /// World y (metres)
    pub y: f64,
    /// Heading (radians)
    pub theta: f64,
}

impl Destination {
    /// Target pose
    pub fn pose(&self) -> Pose2D {
        Pose2D::new(self.x, self.y, self.theta)
    }

    /// Target position
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Rejected destination edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty or whitespace
    EmptyName,
    /// Name already present in the editing buffer
    DuplicateName(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "Name cannot be empty."),
            ValidationError::DuplicateName(_) => write!(f, "That name is already in use."),
        }
    }
}

impl std::error::Error for ValidationError {}

/// What a commit hands over to the parameter store
#[derive(Clone, Debug, PartialEq)]
pub struct PersistSnapshot {
    /// Counter to store
    pub next_id: u64,
    /// Saved set in creation order
    pub locations: Vec<Destination>,
}

/// Saved and in-edit destinations keyed by name, with a session-spanning id
/// counter. Ids are never reused, even after removal.
#[derive(Debug, Default)]
pub struct LocationRegistry {
    saved: HashMap<String, Destination>,
    editing: HashMap<String, Destination>,
    next_id: u64,
}

fn sorted_by_id(map: &HashMap<String, Destination>) -> Vec<&Destination> {
    let mut entries: Vec<&Destination> = map.values().collect();
    entries.sort_by_key(|d| d.id);
    entries
}

impl LocationRegistry {
    /// Empty registry starting at id 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next added destination will get
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Add a destination at `pose` to the editing buffer
    pub fn add(&mut self, name: &str, pose: Pose2D) -> Result<&Destination, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.editing.contains_key(name) {
            return Err(ValidationError::DuplicateName(name.to_string()));
        }
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        log::info!("Adding location {} (id {}) at {:?}", name, id, pose);
        let destination = Destination {
            id,
            name: name.to_string(),
            x: pose.x,
            y: pose.y,
            theta: pose.theta,
        };
        Ok(self.editing.entry(name.to_string()).or_insert(destination))
    }

    /// Remove from the editing buffer; returns whether anything was removed
    pub fn remove(&mut self, name: &str) -> bool {
        self.editing.remove(name).is_some()
    }

    /// Start a fresh editing session from the saved set, discarding any
    /// uncommitted edits
    pub fn open_editor(&mut self) {
        self.editing = self.saved.clone();
    }

    /// Promote the editing buffer to the saved set
    pub fn commit(&mut self) -> PersistSnapshot {
        self.saved = self.editing.clone();
        log::info!("Committed {} locations, next id {}", self.saved.len(), self.next_id);
        PersistSnapshot {
            next_id: self.next_id,
            locations: sorted_by_id(&self.saved).into_iter().cloned().collect(),
        }
    }

    /// Apply the persisted id counter. Never moves the counter backwards.
    pub fn load_next_id(&mut self, next_id: u64) {
        self.next_id = self.next_id.max(next_id);
    }

    /// Merge persisted destinations into the saved set; later entries win on
    /// duplicate names
    pub fn load_saved(&mut self, entries: Vec<Destination>) {
        for entry in entries {
            self.next_id = self.next_id.max(entry.id.saturating_add(1));
            self.saved.insert(entry.name.clone(), entry);
        }
        log::info!("Loaded {} saved locations", self.saved.len());
    }

    /// Saved destination called `name`
    pub fn saved(&self, name: &str) -> Option<&Destination> {
        self.saved.get(name)
    }

    /// Destination called `name` in the editing buffer
    pub fn editing(&self, name: &str) -> Option<&Destination> {
        self.editing.get(name)
    }

    /// Saved destinations in creation order
    pub fn saved_list(&self) -> Vec<&Destination> {
        sorted_by_id(&self.saved)
    }

    /// Editing buffer in creation order
    pub fn editing_list(&self) -> Vec<&Destination> {
        sorted_by_id(&self.editing)
    }

    /// Number of saved destinations
    pub fn saved_len(&self) -> usize {
        self.saved.len()
    }

    /// Number of destinations being edited
    pub fn editing_len(&self) -> usize {
        self.editing.len()
    }
}
