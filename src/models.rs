// src/models.rs

use crate::errors::{CareError, CareResult};
use crate::utils::detect_media_type;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A health condition the user can select. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKey {
    Pregnant,
    RecentSurgery,
    Pcos,
    KidneyStones,
    Diabetes,
    Hypertension,
    Cholesterol,
    Weight,
    Thyroid,
    Digestive,
    Skin,
    Joints,
    Postpartum,
    MentalHealth,
    Menstrual,
    HeartRecovery,
    CancerRecovery,
    CommonIllness,
}

impl ConditionKey {
    pub const ALL: [ConditionKey; 18] = [
        ConditionKey::Pregnant,
        ConditionKey::RecentSurgery,
        ConditionKey::Pcos,
        ConditionKey::KidneyStones,
        ConditionKey::Diabetes,
        ConditionKey::Hypertension,
        ConditionKey::Cholesterol,
        ConditionKey::Weight,
        ConditionKey::Thyroid,
        ConditionKey::Digestive,
        ConditionKey::Skin,
        ConditionKey::Joints,
        ConditionKey::Postpartum,
        ConditionKey::MentalHealth,
        ConditionKey::Menstrual,
        ConditionKey::HeartRecovery,
        ConditionKey::CancerRecovery,
        ConditionKey::CommonIllness,
    ];

    /// Machine key, e.g. `recent_surgery`.
    pub fn key(&self) -> &'static str {
        match self {
            ConditionKey::Pregnant => "pregnant",
            ConditionKey::RecentSurgery => "recent_surgery",
            ConditionKey::Pcos => "pcos",
            ConditionKey::KidneyStones => "kidney_stones",
            ConditionKey::Diabetes => "diabetes",
            ConditionKey::Hypertension => "hypertension",
            ConditionKey::Cholesterol => "cholesterol",
            ConditionKey::Weight => "weight",
            ConditionKey::Thyroid => "thyroid",
            ConditionKey::Digestive => "digestive",
            ConditionKey::Skin => "skin",
            ConditionKey::Joints => "joints",
            ConditionKey::Postpartum => "postpartum",
            ConditionKey::MentalHealth => "mental_health",
            ConditionKey::Menstrual => "menstrual",
            ConditionKey::HeartRecovery => "heart_recovery",
            ConditionKey::CancerRecovery => "cancer_recovery",
            ConditionKey::CommonIllness => "common_illness",
        }
    }

    /// Human-readable name used inside advice text, e.g. `recent surgery`.
    pub fn name(&self) -> String {
        self.key().replace('_', " ")
    }

    /// Title shown in the condition picker.
    pub fn title(&self) -> &'static str {
        match self {
            ConditionKey::Pregnant => "Pregnant",
            ConditionKey::RecentSurgery => "Recently had surgery",
            ConditionKey::Pcos => "Girl with PCOD / PCOS",
            ConditionKey::KidneyStones => "Person with kidney stones",
            ConditionKey::Diabetes => "Diabetes (Type 1 & 2)",
            ConditionKey::Hypertension => "Hypertension / High BP",
            ConditionKey::Cholesterol => "High cholesterol",
            ConditionKey::Weight => "Weight management",
            ConditionKey::Thyroid => "Thyroid problems",
            ConditionKey::Digestive => "Digestive issues",
            ConditionKey::Skin => "Skin problems",
            ConditionKey::Joints => "Joint pain / arthritis",
            ConditionKey::Postpartum => "Postpartum recovery",
            ConditionKey::MentalHealth => "Mental health support",
            ConditionKey::Menstrual => "Menstrual health",
            ConditionKey::HeartRecovery => "Heart disease recovery",
            ConditionKey::CancerRecovery => "Cancer recovery & chemo",
            ConditionKey::CommonIllness => "Common illnesses",
        }
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ConditionKey {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConditionKey::ALL
            .iter()
            .copied()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| CareError::validation_error(format!("Unknown condition: {}", s)))
    }
}

/// Non-empty, duplicate-free selection of conditions in the order they were picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionSet {
    conditions: Vec<ConditionKey>,
}

impl ConditionSet {
    pub fn new(conditions: impl IntoIterator<Item = ConditionKey>) -> CareResult<Self> {
        let mut unique: Vec<ConditionKey> = Vec::new();
        for condition in conditions {
            if !unique.contains(&condition) {
                unique.push(condition);
            }
        }

        if unique.is_empty() {
            return Err(CareError::validation_error(
                "At least one condition must be selected",
            ));
        }

        Ok(Self { conditions: unique })
    }

    /// The first selected condition; drives the offline answers.
    pub fn primary(&self) -> ConditionKey {
        self.conditions[0]
    }

    pub fn contains(&self, condition: ConditionKey) -> bool {
        self.conditions.contains(&condition)
    }

    pub fn insert(&mut self, condition: ConditionKey) {
        if !self.contains(condition) {
            self.conditions.push(condition);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionKey> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Names joined with `", "`, e.g. `recent surgery, diabetes`.
    pub fn joined_names(&self) -> String {
        self.conditions
            .iter()
            .map(ConditionKey::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum AttachmentContent {
    Text(String),
    /// Base64 of a binary file.
    Encoded(String),
}

/// A document the user attached to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub media_type: String,
    pub content: AttachmentContent,
}

impl Attachment {
    pub fn text(name: impl Into<String>, media_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            content: AttachmentContent::Text(text.into()),
        }
    }

    /// Reads a file from disk. UTF-8 files are kept as text, anything else is base64 encoded.
    pub fn from_path(path: &Path) -> CareResult<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CareError::attachment_error(format!("Invalid file name: {}", path.display()))
            })?
            .to_string();

        let bytes = fs::read(path).map_err(|e| {
            CareError::attachment_error(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let content = match String::from_utf8(bytes) {
            Ok(text) => AttachmentContent::Text(text),
            Err(e) => AttachmentContent::Encoded(general_purpose::STANDARD.encode(e.into_bytes())),
        };

        Ok(Self {
            media_type: detect_media_type(&name),
            name,
            content,
        })
    }

    /// The content exactly as it goes into the prompt.
    pub fn content_str(&self) -> &str {
        match &self.content {
            AttachmentContent::Text(text) => text,
            AttachmentContent::Encoded(encoded) => encoded,
        }
    }
}

/// Everything the assistant knows for one chat turn.
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub conditions: ConditionSet,
    pub surgery_type: Option<String>,
    pub previous_questions: Vec<String>,
    pub current_question: String,
    pub attachments: Vec<Attachment>,
}

impl ChatContext {
    pub fn new(conditions: ConditionSet, current_question: impl Into<String>) -> Self {
        Self {
            conditions,
            surgery_type: None,
            previous_questions: Vec::new(),
            current_question: current_question.into(),
            attachments: Vec::new(),
        }
    }

    /// The surgery type, only when it is meaningful for the selected conditions.
    pub fn relevant_surgery_type(&self) -> Option<&str> {
        if !self.conditions.contains(ConditionKey::RecentSurgery) {
            return None;
        }
        self.surgery_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Represents a message in the conversation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            attachments,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            attachments: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

/// Logs details of each API call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiCallLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    pub response_status: u16,
    pub response_time_ms: u128,
}
