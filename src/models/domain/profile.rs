use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One synthesized political-orientation analysis. Exactly one record per
/// user carries `is_current == true`; older records are kept for the
/// opinion-evolution comparison across quiz retakes. Records are never
/// mutated after creation except for the current flag.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ProfileRecord {
    pub id: String,
    pub user_id: String,
    pub analysis_text: String,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub fields: ProfileFields,
}

/// Scalar fields extracted from the raw analysis text, stored alongside it
/// so retakes can be compared without re-parsing.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ProfileFields {
    pub party: Option<String>,
    pub orientation: Option<String>,
    #[serde(default)]
    pub scores: IdeologyScores,
}

/// Ideology percentages (0-100) read out of the analysis' graphical block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IdeologyScores {
    pub conservatism: Option<i32>,
    pub socialism: Option<i32>,
    pub liberalism: Option<i32>,
    pub economic_liberalism: Option<i32>,
    pub communism: Option<i32>,
    pub fascism: Option<i32>,
    pub progressivism: Option<i32>,
    pub nationalism: Option<i32>,
    pub anarchism: Option<i32>,
    pub ecologism: Option<i32>,
    pub populism: Option<i32>,
    pub centrism: Option<i32>,
}

impl ProfileRecord {
    pub fn new_current(user_id: &str, analysis_text: &str, fields: ProfileFields) -> Self {
        ProfileRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            analysis_text: analysis_text.to_string(),
            is_current: true,
            created_at: Utc::now(),
            fields,
        }
    }
}

impl IdeologyScores {
    /// Assigns a percentage to the field named by `label` (already
    /// lowercased). Accented and unaccented spellings are both accepted;
    /// "libéralisme économique" must be checked before plain "libéralisme".
    pub fn assign(&mut self, label: &str, percentage: i32) {
        if label.contains("conservatisme") {
            self.conservatism = Some(percentage);
        } else if label.contains("socialisme") {
            self.socialism = Some(percentage);
        } else if label.contains("libéralisme économique")
            || label.contains("liberalisme economique")
        {
            self.economic_liberalism = Some(percentage);
        } else if label.contains("libéralisme") || label.contains("liberalisme") {
            self.liberalism = Some(percentage);
        } else if label.contains("communisme") {
            self.communism = Some(percentage);
        } else if label.contains("fascisme") {
            self.fascism = Some(percentage);
        } else if label.contains("progressisme") {
            self.progressivism = Some(percentage);
        } else if label.contains("nationalisme") {
            self.nationalism = Some(percentage);
        } else if label.contains("anarchisme") {
            self.anarchism = Some(percentage);
        } else if label.contains("écologisme") || label.contains("ecologisme") {
            self.ecologism = Some(percentage);
        } else if label.contains("populisme") {
            self.populism = Some(percentage);
        } else if label.contains("centrisme") {
            self.centrism = Some(percentage);
        }
    }
}
