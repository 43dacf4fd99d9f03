//! Saved playground projects: the three buffers plus the open tab, as JSON.

use devsync_playground::{Buffers, Language};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(flatten)]
    pub buffers: Buffers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<Language>,
}

impl Project {
    pub fn load(path: &Path) -> ClientResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| project_error(path, e))?;
        serde_json::from_str(&content).map_err(|e| project_error(path, e))
    }

    pub fn save(&self, path: &Path) -> ClientResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| project_error(path, e))?;
        fs::write(path, json).map_err(|e| project_error(path, e))
    }
}

fn project_error(path: &Path, err: impl std::fmt::Display) -> ClientError {
    ClientError::Project {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devsync_playground::buffer::{DEFAULT_MARKUP, DEFAULT_SCRIPT};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_project_keeps_starter_buffers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        fs::write(&path, r#"{ "style": "h1 { color: red; }", "active": "style" }"#).unwrap();

        let project = Project::load(&path).unwrap();
        assert_eq!(project.buffers.style, "h1 { color: red; }");
        assert_eq!(project.buffers.markup, DEFAULT_MARKUP);
        assert_eq!(project.buffers.script, DEFAULT_SCRIPT);
        assert_eq!(project.active, Some(Language::Style));
    }

    #[test]
    fn test_saved_project_is_flat_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        let project = Project {
            buffers: Buffers::new("<p>m</p>", "p{}", "go()"),
            active: Some(Language::Script),
        };
        project.save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["markup"], "<p>m</p>");
        assert_eq!(value["active"], "script");
        assert_eq!(Project::load(&path).unwrap(), project);
    }

    #[test]
    fn test_malformed_project_is_project_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        fs::write(&path, "{ \"markup\": 3 }").unwrap();
        let err = Project::load(&path).unwrap_err();
        assert!(matches!(err, ClientError::Project { .. }));
    }
}
