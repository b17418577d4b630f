use serde::{Deserialize, Serialize};

/// Problem difficulty as reported by the coding platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemInfo {
    pub title: String,
    pub description: String,
    pub difficulty: Option<Difficulty>,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserCode {
    pub code: String,
    /// Language tag, lowercase ("python", "rust", ...).
    pub language: String,
    pub is_working: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageContext {
    pub time_spent_minutes: u64,
    pub attempts: u32,
    pub focus_area: Option<String>,
}

/// One prior interaction, most recent last in `SessionContext::user_history`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionEntry {
    /// Interaction kind ("hint", "complexity", ...).
    pub kind: String,
    pub content: String,
}

/// Immutable per-request snapshot of the user's session. Owned by the caller,
/// read-only inside the core.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionContext {
    pub user_id: Option<String>,
    pub problem: Option<ProblemInfo>,
    pub user_code: Option<UserCode>,
    pub page_context: Option<PageContext>,
    pub user_history: Vec<InteractionEntry>,
}

impl SessionContext {
    /// The user's code text, if any non-empty code was captured.
    pub fn code_text(&self) -> Option<&str> {
        self.user_code
            .as_ref()
            .map(|code| code.code.as_str())
            .filter(|text| !text.trim().is_empty())
    }

    pub fn has_code(&self) -> bool {
        self.code_text().is_some()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.problem.as_ref().and_then(|problem| problem.difficulty)
    }

    pub fn problem_title(&self) -> Option<&str> {
        self.problem.as_ref().map(|problem| problem.title.as_str()).filter(|t| !t.is_empty())
    }

    pub fn code_language(&self) -> Option<&str> {
        self.user_code
            .as_ref()
            .filter(|code| !code.code.trim().is_empty())
            .map(|code| code.language.as_str())
            .filter(|language| !language.is_empty())
    }

    pub fn time_spent_minutes(&self) -> u64 {
        self.page_context.as_ref().map(|page| page.time_spent_minutes).unwrap_or(0)
    }

    /// Most recent `count` history entries, oldest first.
    pub fn recent_history(&self, count: usize) -> &[InteractionEntry] {
        let start = self.user_history.len().saturating_sub(count);
        &self.user_history[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::{Difficulty, InteractionEntry, SessionContext, UserCode};

    #[test]
    fn empty_code_does_not_count_as_code() {
        let context = SessionContext {
            user_code: Some(UserCode {
                code: "   \n".to_string(),
                language: "python".to_string(),
                is_working: false,
            }),
            ..SessionContext::default()
        };

        assert!(!context.has_code());
        assert!(context.code_language().is_none());
    }

    #[test]
    fn recent_history_returns_most_recent_entries_in_order() {
        let context = SessionContext {
            user_history: (0..7)
                .map(|index| InteractionEntry {
                    kind: "hint".to_string(),
                    content: format!("entry {index}"),
                })
                .collect(),
            ..SessionContext::default()
        };

        let recent = context.recent_history(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].content, "entry 2");
        assert_eq!(recent[4].content, "entry 6");
    }

    #[test]
    fn recent_history_handles_short_histories() {
        let context = SessionContext::default();
        assert!(context.recent_history(5).is_empty());
    }

    #[test]
    fn difficulty_serializes_with_capitalized_labels() {
        let json = serde_json::to_string(&Difficulty::Medium).expect("serialize");
        assert_eq!(json, "\"Medium\"");
    }
}
