// src/entity/question.rs
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShowquizError};

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

const REQUIRED_FIELDS_MESSAGE: &str =
    "Question, answer, category & difficulty score are required fields.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: u8,
}

/// A validated question that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: u8,
}

/// Question fields as submitted by a client; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionDraft {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

impl QuestionDraft {
    pub fn validate(self) -> Result<NewQuestion> {
        let question = non_blank(self.question);
        let answer = non_blank(self.answer);
        let category = self.category.filter(|c| *c > 0);

        let (Some(question), Some(answer), Some(category), Some(difficulty)) =
            (question, answer, category, self.difficulty)
        else {
            return Err(ShowquizError::validation(REQUIRED_FIELDS_MESSAGE));
        };

        let difficulty = u8::try_from(difficulty)
            .ok()
            .filter(|d| (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(d))
            .ok_or_else(|| {
                ShowquizError::validation(format!(
                    "Difficulty must be between {} and {}.",
                    MIN_DIFFICULTY, MAX_DIFFICULTY
                ))
            })?;

        Ok(NewQuestion {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_draft() -> QuestionDraft {
        QuestionDraft {
            question: Some("Who painted the Mona Lisa?".to_string()),
            answer: Some("Leonardo da Vinci".to_string()),
            category: Some(2),
            difficulty: Some(3),
        }
    }

    #[test]
    fn test_complete_draft_validates() {
        let new = full_draft().validate().unwrap();
        assert_eq!(new.category, 2);
        assert_eq!(new.difficulty, 3);
    }

    #[test]
    fn test_missing_difficulty_rejected() {
        let draft = QuestionDraft {
            difficulty: None,
            ..full_draft()
        };
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, ShowquizError::Validation(msg) if msg == REQUIRED_FIELDS_MESSAGE));
    }

    #[test]
    fn test_blank_answer_rejected() {
        let draft = QuestionDraft {
            answer: Some("   ".to_string()),
            ..full_draft()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_difficulty_out_of_range_rejected() {
        for difficulty in [0, 6, -1, 300] {
            let draft = QuestionDraft {
                difficulty: Some(difficulty),
                ..full_draft()
            };
            assert!(draft.validate().is_err(), "difficulty {} accepted", difficulty);
        }
    }

    #[test]
    fn test_category_serializes_as_type() {
        let category = Category {
            id: 1,
            kind: "Science".to_string(),
        };
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["type"], "Science");
    }
}
