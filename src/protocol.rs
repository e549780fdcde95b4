//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{QuestionSource, Round, RoundKind};

/// DTO for a round handed to the player.
#[derive(Debug, Serialize)]
pub struct RoundOut {
    pub id: String,
    pub kind: RoundKind,
    pub question: String,
    /// Empty for free-form rounds.
    pub options: Vec<String>,
    pub source: QuestionSource,
}

/// Convert a stored `Round` to the public DTO. The answer never leaves the server here.
pub fn to_out(id: &str, round: &Round, source: QuestionSource) -> RoundOut {
    let (question, options) = match round {
        Round::Freeform(q) => (q.question.clone(), Vec::new()),
        Round::MultipleChoice(q) => (q.question.clone(), q.options.clone()),
    };
    RoundOut { id: id.to_string(), kind: round.kind(), question, options, source }
}

#[derive(Deserialize)]
pub struct AnswerIn {
    #[serde(rename = "roundId")]
    pub round_id: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub correct: bool,
    pub expected: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    /// Questions waiting in the free-form API cache.
    pub cached_freeform: usize,
    pub cached_multiple_choice: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FreeformQuestion, MultipleChoiceQuestion};

    #[test]
    fn freeform_round_has_no_options_and_hides_answer() {
        let round = Round::Freeform(FreeformQuestion { question: "Q?".into(), answer: "secret".into() });
        let json = serde_json::to_value(to_out("r1", &round, QuestionSource::Seed)).unwrap();
        assert_eq!(json["kind"], "freeform");
        assert_eq!(json["source"], "seed");
        assert_eq!(json["options"], serde_json::json!([]));
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn multiple_choice_round_lists_options() {
        let round = Round::MultipleChoice(MultipleChoiceQuestion {
            question: "Q?".into(),
            options: vec!["A. x".into(), "B. y".into()],
            correct_label: "B".into(),
        });
        let json = serde_json::to_value(to_out("r2", &round, QuestionSource::OpenTrivia)).unwrap();
        assert_eq!(json["kind"], "multiple_choice");
        assert_eq!(json["source"], "open_trivia");
        assert_eq!(json["options"][1], "B. y");
    }

    #[test]
    fn answer_in_uses_camel_case_id() {
        let a: AnswerIn = serde_json::from_str(r#"{"roundId":"abc","answer":"Paris"}"#).unwrap();
        assert_eq!(a.round_id, "abc");
        assert_eq!(a.answer, "Paris");
    }
}
