//! Lens and chat-mode selectors for the AI agent subsystem.
//!
//! A request to the LLM is routed to one of four prompt classes keyed by
//! (`Lens`, `ChatMode`). The wire form (lowercase strings) matches the
//! `lens` / `mode` columns on `ai_improvement_jobs`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which entity type an AI request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lens {
    Initiatives,
    Tasks,
}

impl Lens {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Lens::Initiatives => "initiatives",
            Lens::Tasks => "tasks",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "initiatives" => Ok(Lens::Initiatives),
            "tasks" => Ok(Lens::Tasks),
            other => Err(CoreError::Validation(format!("Unknown lens: {other}"))),
        }
    }
}

/// Whether the AI should directly edit entities or merely discuss them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    /// The model returns a typed list of create/update/delete operations.
    Edit,
    /// The model returns advisory prose only; no entity changes.
    Discuss,
}

impl ChatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatMode::Edit => "edit",
            ChatMode::Discuss => "discuss",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "edit" => Ok(ChatMode::Edit),
            "discuss" => Ok(ChatMode::Discuss),
            other => Err(CoreError::Validation(format!("Unknown chat mode: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lens_round_trips_through_wire_form() {
        for lens in [Lens::Initiatives, Lens::Tasks] {
            assert_eq!(Lens::parse(lens.as_str()).unwrap(), lens);
        }
    }

    #[test]
    fn mode_round_trips_through_wire_form() {
        for mode in [ChatMode::Edit, ChatMode::Discuss] {
            assert_eq!(ChatMode::parse(mode.as_str()).unwrap(), mode);
        }
    }

    #[test]
    fn unknown_values_are_validation_errors() {
        assert!(Lens::parse("epics").is_err());
        assert!(ChatMode::parse("plan").is_err());
    }

    #[test]
    fn serde_uses_snake_case_strings() {
        assert_eq!(
            serde_json::to_string(&Lens::Initiatives).unwrap(),
            "\"initiatives\""
        );
        assert_eq!(serde_json::to_string(&ChatMode::Edit).unwrap(), "\"edit\"");
    }
}
