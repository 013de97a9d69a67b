//! Workers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::skill::SkillVector;

/// Opaque worker identifier, as carried by the snapshot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WorkerId(pub u64);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A worker with its base skills.
///
/// Base skills never change during a run. Equipment bonuses are layered on
/// top through [`AssignmentPlan::effective_skills`](crate::AssignmentPlan::effective_skills).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    #[serde(default)]
    pub name: Option<String>,
    pub skills: SkillVector,
    /// Compatibility tag matched against equipment restrictions.
    #[serde(default)]
    pub tag: Option<String>,
}

impl Worker {
    pub fn new(id: u64, skills: SkillVector) -> Self {
        Self {
            id: WorkerId(id),
            name: None,
            skills,
            tag: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Display label: the name if known, otherwise the id.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.id.to_string(),
        }
    }
}
