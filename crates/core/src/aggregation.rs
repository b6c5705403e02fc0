//! Dashboard aggregation: per-question distributions and NPS scores over
//! completed responses.

use serde::Serialize;

use crate::answer::AnswerValue;
use crate::nps::nps_score;
use crate::question::{Question, QuestionType};
use crate::types::DbId;

/// How many text answers to surface per question.
const TEXT_SAMPLE_LIMIT: usize = 5;

/// One labelled count in a distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: u64,
}

/// Aggregated view of a single question across all completed responses.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSummary {
    pub question_id: DbId,
    pub text: String,
    pub question_type: QuestionType,
    pub display_order: i32,
    /// Number of answers contributing to this question.
    pub total: u64,
    pub buckets: Vec<Bucket>,
    /// Global NPS score; present only for NPS questions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nps: Option<i32>,
    /// Most recent free-text answers; present only for text questions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sample_texts: Vec<String>,
}

/// Aggregated view of one form.
#[derive(Debug, Clone, Serialize)]
pub struct FormSummary {
    pub form_id: DbId,
    pub title: String,
    pub questions: Vec<QuestionSummary>,
}

/// Input to the dashboard builder: one form plus its questions and the
/// stored answers from completed responses.
#[derive(Debug, Clone)]
pub struct FormAggregate {
    pub form_id: DbId,
    pub title: String,
    pub questions: Vec<(Question, Vec<AnswerValue>)>,
}

/// Ordered counter that preserves a canonical label order, appending
/// unseen labels in encounter order.
struct OrderedCounts {
    labels: Vec<String>,
    counts: Vec<u64>,
}

impl OrderedCounts {
    fn with_labels(labels: Vec<String>) -> Self {
        let counts = vec![0; labels.len()];
        Self { labels, counts }
    }

    fn increment(&mut self, label: &str) {
        match self.labels.iter().position(|l| l == label) {
            Some(i) => self.counts[i] += 1,
            None => {
                self.labels.push(label.to_string());
                self.counts.push(1);
            }
        }
    }

    fn into_buckets(self) -> Vec<Bucket> {
        self.labels
            .into_iter()
            .zip(self.counts)
            .map(|(label, count)| Bucket { label, count })
            .collect()
    }
}

/// Summarize one question. Returns `None` when no answers contribute,
/// so empty charts never reach the dashboard.
pub fn summarize_question(question: &Question, answers: &[AnswerValue]) -> Option<QuestionSummary> {
    let mut total: u64 = 0;
    let mut buckets = Vec::new();
    let mut nps = None;
    let mut sample_texts = Vec::new();

    match question.question_type {
        QuestionType::Nps => {
            let scores: Vec<i64> = answers
                .iter()
                .filter_map(|a| match a {
                    AnswerValue::Numeric(n) if (0..=10).contains(n) => Some(*n),
                    _ => None,
                })
                .collect();
            total = scores.len() as u64;
            let mut counts = OrderedCounts::with_labels((0..=10).map(|n| n.to_string()).collect());
            for s in &scores {
                counts.increment(&s.to_string());
            }
            buckets = counts.into_buckets();
            nps = nps_score(&scores);
        }
        QuestionType::Rating1To5 => {
            let mut counts = OrderedCounts::with_labels((1..=5).map(|n| n.to_string()).collect());
            for a in answers {
                if let AnswerValue::Numeric(n) = a {
                    if (1..=5).contains(n) {
                        counts.increment(&n.to_string());
                        total += 1;
                    }
                }
            }
            buckets = counts.into_buckets();
        }
        QuestionType::SingleChoice | QuestionType::Comparison => {
            // Declared options order; unknown selections append after.
            let mut counts = OrderedCounts::with_labels(question.options.clone());
            for a in answers {
                if let AnswerValue::Selection(s) = a {
                    counts.increment(s);
                    total += 1;
                }
            }
            buckets = counts.into_buckets();
        }
        QuestionType::MultipleChoice => {
            // One answer fans out across every selected option's bucket.
            let mut counts = OrderedCounts::with_labels(question.options.clone());
            for a in answers {
                let AnswerValue::Text(stored) = a else { continue };
                let Ok(selected) = serde_json::from_str::<Vec<String>>(stored) else {
                    continue;
                };
                total += 1;
                for option in &selected {
                    counts.increment(option);
                }
            }
            buckets = counts.into_buckets();
        }
        QuestionType::TextShort | QuestionType::TextLong => {
            for a in answers {
                if let AnswerValue::Text(s) = a {
                    if !s.trim().is_empty() {
                        total += 1;
                        sample_texts.push(s.clone());
                    }
                }
            }
            // Keep the most recent answers (input is in submission order).
            if sample_texts.len() > TEXT_SAMPLE_LIMIT {
                sample_texts.drain(..sample_texts.len() - TEXT_SAMPLE_LIMIT);
            }
        }
    }

    if total == 0 {
        return None;
    }

    Some(QuestionSummary {
        question_id: question.id,
        text: question.text.clone(),
        question_type: question.question_type,
        display_order: question.display_order,
        total,
        buckets,
        nps,
        sample_texts,
    })
}

/// Build the full dashboard: forms sorted by title, questions in declared
/// order, zero-answer questions and thereby-emptied forms dropped.
pub fn build_dashboard(mut aggregates: Vec<FormAggregate>) -> Vec<FormSummary> {
    aggregates.sort_by(|a, b| a.title.cmp(&b.title));

    let mut out = Vec::new();
    for mut aggregate in aggregates {
        aggregate
            .questions
            .sort_by_key(|(q, _)| q.display_order);

        let questions: Vec<QuestionSummary> = aggregate
            .questions
            .iter()
            .filter_map(|(q, answers)| summarize_question(q, answers))
            .collect();

        if questions.is_empty() {
            continue;
        }
        out.push(FormSummary {
            form_id: aggregate.form_id,
            title: aggregate.title,
            questions,
        });
    }
    out
}
