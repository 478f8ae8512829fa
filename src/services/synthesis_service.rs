use std::sync::Arc;

use serde::Serialize;

use crate::{
    constants::prompts,
    errors::AppResult,
    models::domain::{ProfileFields, ProfileRecord},
    repositories::{ProfileRepository, QuestionCatalog, ResponseRepository},
    services::{
        extraction, fallback,
        generation_client::TextGenerator,
        section_schema::{self, StructureVerdict},
    },
};

pub const HISTORY_SEPARATOR: &str = "--- HISTORIQUE DES RÉPONSES PRÉCÉDENTES ---";
const HISTORY_LIMIT: i64 = 30;
/// Below this many answered lines, skipped questions pad the input.
const MIN_ANSWERED_LINES: usize = 3;
/// At least this many valid lines are needed to call the external service.
const MIN_VALID_LINES: usize = 2;
/// A formatted line shorter than this carries no analyzable signal.
const MIN_LINE_CHARS: usize = 10;

/// Which generator ultimately produced the stored analysis text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// External reply, structurally intact.
    Generated,
    /// External reply patched with placeholder sections.
    Repaired,
    /// Keyword-scored template; the external text was discarded or never
    /// obtained.
    Heuristic,
    /// Generic "answer more questions" text; no usable input existed.
    Insufficient,
}

#[derive(Clone, Debug)]
pub struct SynthesisOutcome {
    pub analysis: String,
    pub fields: ProfileFields,
    pub source: AnalysisSource,
    /// False when the profile store rejected the write; the analysis is
    /// still usable, the caller is just told it was not saved.
    pub persisted: bool,
}

/// The Profile Synthesis Pipeline. Every failure path (missing input,
/// unreachable generation service, malformed reply, failing store) ends in
/// a usable, schema-valid analysis; `synthesize` itself never fails.
pub struct SynthesisService {
    responses: Arc<dyn ResponseRepository>,
    questions: Arc<dyn QuestionCatalog>,
    profiles: Arc<dyn ProfileRepository>,
    generator: Arc<dyn TextGenerator>,
}

impl SynthesisService {
    pub fn new(
        responses: Arc<dyn ResponseRepository>,
        questions: Arc<dyn QuestionCatalog>,
        profiles: Arc<dyn ProfileRepository>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            responses,
            questions,
            profiles,
            generator,
        }
    }

    pub async fn synthesize(&self, user_id: &str, follow_up: bool) -> SynthesisOutcome {
        log::info!("Starting profile synthesis for user {}", user_id);

        let lines = match self.gather_inputs(user_id, follow_up).await {
            Ok(lines) => lines,
            Err(err) => {
                log::error!("Failed to gather responses for {}: {}", user_id, err);
                return self
                    .finish(
                        user_id,
                        fallback::generic_analysis("Réponses indisponibles"),
                        AnalysisSource::Insufficient,
                    )
                    .await;
            }
        };

        if lines.is_empty() {
            return self
                .finish(
                    user_id,
                    fallback::generic_analysis("Aucune réponse fournie"),
                    AnalysisSource::Insufficient,
                )
                .await;
        }

        let valid: Vec<String> = lines.iter().filter(|l| is_valid_line(l)).cloned().collect();
        if valid.len() < MIN_VALID_LINES {
            log::error!(
                "Only {} valid line(s) out of {} gathered for {}",
                valid.len(),
                lines.len(),
                user_id
            );
            return self
                .finish(
                    user_id,
                    fallback::generic_analysis("Réponses insuffisantes ou invalides"),
                    AnalysisSource::Insufficient,
                )
                .await;
        }

        let comparison = follow_up
            && self
                .profiles
                .has_historical(user_id)
                .await
                .unwrap_or(false);
        let prompt = prompts::analysis_prompt(&valid, comparison);

        let (analysis, source) = match self.generator.generate(&prompt).await {
            Err(err) => {
                log::error!("Generation call failed, using heuristic fallback: {}", err);
                (fallback::heuristic_analysis(&valid), AnalysisSource::Heuristic)
            }
            Ok(reply) => match section_schema::assess(&reply) {
                StructureVerdict::Intact => {
                    (section_schema::normalize(&reply), AnalysisSource::Generated)
                }
                StructureVerdict::Repairable(missing) => {
                    log::warn!(
                        "Generated reply missing {} section(s), repairing",
                        missing.len()
                    );
                    (
                        section_schema::repair(&reply, &missing),
                        AnalysisSource::Repaired,
                    )
                }
                StructureVerdict::Unusable => {
                    log::error!(
                        "Unusable generated reply ({} chars), using heuristic fallback",
                        reply.chars().count()
                    );
                    (fallback::heuristic_analysis(&valid), AnalysisSource::Heuristic)
                }
            },
        };

        self.finish(user_id, analysis, source).await
    }

    pub async fn current_profile(&self, user_id: &str) -> AppResult<Option<ProfileRecord>> {
        self.profiles.get_current(user_id).await
    }

    pub async fn profile_history(&self, user_id: &str) -> AppResult<Vec<ProfileRecord>> {
        self.profiles.list_all(user_id).await
    }

    /// Demotes the current profile before a retake so the next synthesis
    /// sees it as comparison material.
    pub async fn retire_current_profile(&self, user_id: &str) -> AppResult<u64> {
        self.profiles.mark_all_historical(user_id).await
    }

    /// Extracts the structured fields and persists the record. A store
    /// failure is logged and surfaced through the `persisted` flag only;
    /// the analysis text always reaches the caller.
    async fn finish(
        &self,
        user_id: &str,
        analysis: String,
        source: AnalysisSource,
    ) -> SynthesisOutcome {
        let fields = extraction::extract_fields(&analysis);
        let record = ProfileRecord::new_current(user_id, &analysis, fields.clone());

        let persisted = match self.profiles.save_new_current(record).await {
            Ok(_) => true,
            Err(err) => {
                log::error!("Failed to persist profile for {}: {}", user_id, err);
                false
            }
        };

        log::info!(
            "Synthesis for {} finished: source={:?}, {} chars, persisted={}",
            user_id,
            source,
            analysis.chars().count(),
            persisted
        );

        SynthesisOutcome {
            analysis,
            fields,
            source,
            persisted,
        }
    }

    /// Formats the user's answers as "question : answer" lines. Active
    /// answered responses come first; when fewer than three exist, active
    /// skips pad the input as placeholder lines. Follow-up attempts append
    /// the most recent historical answers after a separator, newest first,
    /// even when no active answer survives.
    async fn gather_inputs(&self, user_id: &str, follow_up: bool) -> AppResult<Vec<String>> {
        let active = self.responses.get_active(user_id).await?;
        let mut lines = Vec::new();

        for response in active.iter().filter(|r| r.is_answered()) {
            let Some(text) = response.text.as_deref() else {
                continue;
            };
            match self.questions.find_by_id(&response.question_id).await? {
                Some(question) => lines.push(format!("{} : {}", question.text, text)),
                None => log::warn!(
                    "Question {} not found for response {}",
                    response.question_id,
                    response.id
                ),
            }
        }

        if lines.len() < MIN_ANSWERED_LINES {
            for response in active.iter().filter(|r| !r.is_answered()) {
                if let Some(question) = self.questions.find_by_id(&response.question_id).await? {
                    lines.push(format!("{} : Question passée", question.text));
                }
            }
        }

        if follow_up {
            let historical = self
                .responses
                .get_historical(user_id, Some(HISTORY_LIMIT))
                .await?;

            let mut history_lines = Vec::new();
            for response in &historical {
                let Some(text) = response.text.as_deref() else {
                    continue;
                };
                if let Some(question) = self.questions.find_by_id(&response.question_id).await? {
                    history_lines.push(format!("ANCIEN - {} : {}", question.text, text));
                }
            }

            if !history_lines.is_empty() {
                lines.push(HISTORY_SEPARATOR.to_string());
                lines.extend(history_lines);
            }
        }

        log::info!(
            "Gathered {} formatted line(s) for user {}",
            lines.len(),
            user_id
        );
        Ok(lines)
    }
}

fn is_valid_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() > MIN_LINE_CHARS && trimmed.contains(':')
}
