//! Application state: config, the trivia cache service, local question banks,
//! and the rounds currently in play.
//!
//! This module owns:
//!   - the single `TriviaService` instance (prefetched API questions)
//!   - the local free-form and multiple-choice banks (TOML config + seeds)
//!   - issued rounds by id, so answers can be graded later
//!
//! Selection policy: serve from the trivia API cache when enabled and stocked.
//! Otherwise fall back to the local bank, then to built-in seeds.

use std::{collections::HashMap, sync::Arc};

use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::{FreeformQuestion, MultipleChoiceQuestion, QuestionSource, Round};
use crate::seeds::{seed_freeform_questions, seed_multiple_choice_questions};
use crate::trivia::TriviaService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub trivia: Arc<TriviaService>,
    pub rounds: Arc<RwLock<HashMap<String, Round>>>,
    freeform_bank: Arc<Vec<(FreeformQuestion, QuestionSource)>>,
    multiple_choice_bank: Arc<Vec<(MultipleChoiceQuestion, QuestionSource)>>,
}

impl AppState {
    /// Build state from config and an already constructed trivia service.
    #[instrument(level = "info", skip_all)]
    pub fn new(config: AppConfig, trivia: Arc<TriviaService>) -> Self {
        let mut freeform_bank: Vec<(FreeformQuestion, QuestionSource)> = config
            .questions
            .iter()
            .map(|(question, answer)| {
                (FreeformQuestion { question: question.clone(), answer: answer.clone() }, QuestionSource::LocalBank)
            })
            .collect();
        if freeform_bank.is_empty() {
            freeform_bank.extend(seed_freeform_questions().into_iter().map(|q| (q, QuestionSource::Seed)));
        }

        let mut multiple_choice_bank: Vec<(MultipleChoiceQuestion, QuestionSource)> = config
            .multiple_choice
            .iter()
            .map(|c| {
                let q = MultipleChoiceQuestion {
                    question: c.question.clone(),
                    options: c.answers.clone(),
                    correct_label: c.correct_answer.clone(),
                };
                (q, QuestionSource::LocalBank)
            })
            .collect();
        if multiple_choice_bank.is_empty() {
            multiple_choice_bank
                .extend(seed_multiple_choice_questions().into_iter().map(|q| (q, QuestionSource::Seed)));
        }

        info!(
            target: "trivia_backend",
            api_enabled = config.open_trivia.enabled,
            freeform_bank = freeform_bank.len(),
            multiple_choice_bank = multiple_choice_bank.len(),
            "Startup question inventory"
        );

        Self {
            config: Arc::new(config),
            trivia,
            rounds: Arc::new(RwLock::new(HashMap::new())),
            freeform_bank: Arc::new(freeform_bank),
            multiple_choice_bank: Arc::new(multiple_choice_bank),
        }
    }

    /// Pick a free-form question: API cache first, then local bank/seeds.
    #[instrument(level = "debug", skip(self))]
    pub fn choose_freeform(&self) -> (FreeformQuestion, QuestionSource) {
        if let Some(q) = self.trivia.get_freeform_question(&self.config.open_trivia) {
            return (q, QuestionSource::OpenTrivia);
        }
        if self.config.open_trivia.enabled {
            warn!(target: "trivia_backend", "Free-form cache empty; using local bank");
        }
        // The bank always holds at least the seeds.
        self.freeform_bank
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| (seed_freeform_questions().remove(0), QuestionSource::Seed))
    }

    /// Pick a multiple-choice question: API cache first, then local bank/seeds.
    #[instrument(level = "debug", skip(self))]
    pub fn choose_multiple_choice(&self) -> (MultipleChoiceQuestion, QuestionSource) {
        if let Some(q) = self.trivia.get_multiple_choice_question(&self.config.open_trivia) {
            return (q, QuestionSource::OpenTrivia);
        }
        if self.config.open_trivia.enabled {
            warn!(target: "trivia_backend", "Multiple-choice cache empty; using local bank");
        }
        self.multiple_choice_bank
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| (seed_multiple_choice_questions().remove(0), QuestionSource::Seed))
    }

    /// Store a round and return its id.
    #[instrument(level = "debug", skip(self, round))]
    pub async fn insert_round(&self, round: Round) -> String {
        let id = Uuid::new_v4().to_string();
        self.rounds.write().await.insert(id.clone(), round);
        id
    }

    /// Remove and return a round; each round can be answered once.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn take_round(&self, id: &str) -> Option<Round> {
        self.rounds.write().await.remove(id)
    }
}
