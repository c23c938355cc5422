use serde::{Deserialize, Serialize};

/// One recommendation model version offered by `getmodel?action=list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub version: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_current: bool,
}

/// The backend reports the current model either as a bare version name or as
/// an object carrying a display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CurrentModel {
    Version(String),
    Detail {
        #[serde(default)]
        version: Option<String>,
        #[serde(default, rename = "displayName")]
        display_name: Option<String>,
    },
}

impl CurrentModel {
    pub fn display_name(&self) -> Option<&str> {
        match self {
            CurrentModel::Version(_) => None,
            CurrentModel::Detail { display_name, .. } => display_name.as_deref(),
        }
    }
}

/// Response of `getmodel?action=list`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelList {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    #[serde(default)]
    pub current_model: Option<CurrentModel>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of a `getmodel` switch POST
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub current: Option<String>,
    #[serde(default)]
    pub current_model: Option<String>,
}

impl SwitchAck {
    /// Name of the model now active, as far as the backend told us
    pub fn active_model(&self) -> Option<&str> {
        self.current.as_deref().or(self.current_model.as_deref())
    }
}
