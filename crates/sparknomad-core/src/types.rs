//! UI-agnostic data types
//!
//! These are shared by every front end and don't depend on any UI framework.

use serde::{Deserialize, Serialize};

/// A single generated startup name with its tagline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupName {
    pub name: String,
    pub tagline: String,
}

/// The structured payload the model is asked to produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub names: Vec<StartupName>,
}

/// Status of the generation cycle, governs which region of the UI is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_must_have_both_fields() {
        let ok: GenerationResponse = serde_json::from_str(
            r#"{"names":[{"name":"Ledgerly","tagline":"Books that balance themselves."}]}"#,
        )
        .unwrap();
        assert_eq!(ok.names.len(), 1);
        assert_eq!(ok.names[0].name, "Ledgerly");

        let missing_tagline = serde_json::from_str::<GenerationResponse>(r#"{"names":[{"name":"Ledgerly"}]}"#);
        assert!(missing_tagline.is_err());

        let missing_names = serde_json::from_str::<GenerationResponse>(r#"{}"#);
        assert!(missing_names.is_err());
    }

    #[test]
    fn test_loading_state_defaults_to_idle() {
        assert_eq!(LoadingState::default(), LoadingState::Idle);
    }
}
