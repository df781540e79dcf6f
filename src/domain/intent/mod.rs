//! Intent - the closed set of things a user message can ask for.
//!
//! Classification itself happens against the text-completion gateway; this
//! module owns the label vocabulary and the pure normalization step that maps
//! whatever text the gateway returned onto exactly one [`Intent`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversational intent assigned to a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Find an existing space.
    #[default]
    SearchSpace,
    /// Register a new space (multi-turn slot filling).
    AddSpace,
    /// Create a user profile.
    CreateUserProfile,
}

impl Intent {
    /// Labels in the order they are checked when normalizing gateway output.
    pub const PRIORITY: [Intent; 3] = [
        Intent::SearchSpace,
        Intent::AddSpace,
        Intent::CreateUserProfile,
    ];

    /// Wire label, as the gateway is asked to answer it.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::SearchSpace => "SEARCH_SPACE",
            Intent::AddSpace => "ADD_SPACE",
            Intent::CreateUserProfile => "CREATE_USER_PROFILE",
        }
    }

    /// One-line description used in the classification taxonomy.
    pub fn description(&self) -> &'static str {
        match self {
            Intent::SearchSpace => "사용자가 조건에 맞는 공간을 찾거나 추천받고 싶어함",
            Intent::AddSpace => "사용자가 자신의 공간(카페, 스튜디오 등)을 새로 등록하고 싶어함",
            Intent::CreateUserProfile => "사용자가 자신의 프로필을 만들거나 회원 정보를 등록하고 싶어함",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalizes raw gateway output into an intent.
///
/// The text is trimmed and uppercased, then tested for containment of each
/// label in [`Intent::PRIORITY`] order. Anything unrecognized falls back to
/// [`Intent::SearchSpace`].
pub fn parse_intent_label(raw: &str) -> Intent {
    let normalized = raw.trim().to_uppercase();

    Intent::PRIORITY
        .into_iter()
        .find(|intent| normalized.contains(intent.label()))
        .unwrap_or_default()
}
