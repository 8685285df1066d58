//! Privilege level tracking and navigation.

use indexmap::IndexMap;
use regex::bytes::Regex;

use crate::error::{DriverError, Result};
use crate::platform::PrivilegeLevel;

/// Tracks the current privilege level and plans moves between levels.
///
/// Levels form a tree through `previous_priv`; a move goes up to the
/// closest common ancestor and then down to the target.
#[derive(Debug)]
pub struct PrivilegeManager {
    levels: IndexMap<String, PrivilegeLevel>,
    current: Option<String>,
}

/// One step between adjacent privilege levels.
#[derive(Debug, Clone)]
pub struct TransitionInfo {
    /// Level reached after this step.
    pub target: String,

    /// Command to execute for the transition.
    pub command: String,

    /// Pattern to match for auth prompt. If `Some`, a password is sent.
    pub auth_prompt: Option<Regex>,
}

impl PrivilegeManager {
    /// Create a manager; the current level starts unknown.
    pub fn new(levels: IndexMap<String, PrivilegeLevel>) -> Self {
        Self {
            levels,
            current: None,
        }
    }

    /// Determine the privilege level a prompt belongs to.
    pub fn determine_from_prompt(&self, prompt: &str) -> Result<&PrivilegeLevel> {
        self.levels
            .values()
            .find(|level| level.matches(prompt))
            .ok_or_else(|| {
                DriverError::UnknownPrivilege {
                    prompt: prompt.to_string(),
                }
                .into()
            })
    }

    /// Update the current level from a prompt, returning its name.
    pub fn observe_prompt(&mut self, prompt: &str) -> Option<&str> {
        let name = self.determine_from_prompt(prompt).ok()?.name.clone();
        self.current = Some(name);
        self.current.as_deref()
    }

    /// Get the current privilege level.
    pub fn current(&self) -> Option<&PrivilegeLevel> {
        self.current.as_ref().and_then(|name| self.levels.get(name))
    }

    /// Chain of level names from `name` up to the root, inclusive.
    fn ancestry(&self, name: &str) -> Result<Vec<String>> {
        let mut chain = Vec::new();
        let mut node = Some(name.to_string());
        while let Some(level_name) = node {
            let level = self
                .levels
                .get(&level_name)
                .ok_or_else(|| DriverError::UnknownPrivilege {
                    prompt: level_name.clone(),
                })?;
            if chain.contains(&level_name) {
                break;
            }
            node = level.previous_priv.clone();
            chain.push(level_name);
        }
        Ok(chain)
    }

    /// Find the path from one privilege level to another.
    ///
    /// The returned list includes both the start and end levels.
    pub fn find_path(&self, from: &str, to: &str) -> Result<Vec<String>> {
        let up = self.ancestry(from)?;
        let down = self.ancestry(to)?;

        let (up_idx, down_idx) = up
            .iter()
            .enumerate()
            .find_map(|(i, name)| down.iter().position(|d| d == name).map(|j| (i, j)))
            .ok_or_else(|| DriverError::NoPrivilegePath {
                from: from.to_string(),
                to: to.to_string(),
            })?;

        let mut path: Vec<String> = up[..=up_idx].to_vec();
        path.extend(down[..down_idx].iter().rev().cloned());
        Ok(path)
    }

    /// Get the transition between two adjacent levels.
    pub fn get_transition(&self, from: &str, to: &str) -> Option<TransitionInfo> {
        let from_level = self.levels.get(from)?;
        let to_level = self.levels.get(to)?;

        if to_level.previous_priv.as_deref() == Some(from) {
            return Some(TransitionInfo {
                target: to.to_string(),
                command: to_level.escalate_command.clone()?,
                auth_prompt: to_level.escalate_prompt.clone(),
            });
        }

        if from_level.previous_priv.as_deref() == Some(to) {
            return Some(TransitionInfo {
                target: to.to_string(),
                command: from_level.deescalate_command.clone()?,
                auth_prompt: None,
            });
        }

        None
    }

    /// Plan the steps from the current level to `target`.
    pub fn plan(&self, target: &str) -> Result<Vec<TransitionInfo>> {
        let current = self
            .current
            .clone()
            .ok_or_else(|| DriverError::PrivilegeAcquisitionFailed {
                target: target.to_string(),
            })?;

        let path = self.find_path(&current, target)?;
        path.windows(2)
            .map(|pair| {
                self.get_transition(&pair[0], &pair[1]).ok_or_else(|| {
                    DriverError::NoPrivilegePath {
                        from: pair[0].clone(),
                        to: pair[1].clone(),
                    }
                    .into()
                })
            })
            .collect()
    }
}
