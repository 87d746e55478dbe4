//! Coach - one user-initiated AI request, end to end
//!
//! validate → render prompt → single chat completion → parse. Exactly one
//! request is sent per call. Errors reach the caller unchanged and nothing is
//! retried; a second call while one is pending is the caller's concern.

use tracing::debug;

use crate::error::Result;
use crate::prompts::PromptLibrary;

use super::parsing::{parse_insight_response, parse_savings_recommendations};
use super::prompt_builder::{build_insight_prompt, build_savings_prompt};
use super::types::{
    ChatPrompt, ChatRequest, ChatResponse, GeneratedInsight, InsightPromptInput,
    SavingsRecommendation,
};
use super::{AIBackend, AIClient};

pub struct Coach {
    client: AIClient,
    prompts: PromptLibrary,
}

impl Coach {
    /// Coach using the platform prompt override directory
    pub fn new(client: AIClient) -> Self {
        Self {
            client,
            prompts: PromptLibrary::new(),
        }
    }

    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    /// Short read of the month plus suggestions
    pub async fn generate_insight(
        &mut self,
        input: &InsightPromptInput<'_>,
    ) -> Result<GeneratedInsight> {
        let prompt = build_insight_prompt(input, &mut self.prompts)?;
        let response = self.ask(prompt).await?;
        Ok(parse_insight_response(
            &response.content,
            input.spent_total,
            input.budget_total,
        ))
    }

    /// Structured savings actions
    pub async fn recommend_savings(
        &mut self,
        input: &InsightPromptInput<'_>,
    ) -> Result<Vec<SavingsRecommendation>> {
        let prompt = build_savings_prompt(input, &mut self.prompts)?;
        let response = self.ask(prompt).await?;
        Ok(parse_savings_recommendations(&response.content))
    }

    async fn ask(&self, prompt: ChatPrompt) -> Result<ChatResponse> {
        debug!(
            host = self.client.host(),
            model = self.client.model(),
            "Requesting coaching reply"
        );
        self.client.complete(&ChatRequest::new(prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockBackend, Sentiment};
    use crate::error::Error;
    use crate::models::{Category, Transaction};
    use chrono::{TimeZone, Utc};

    fn transactions() -> Vec<Transaction> {
        vec![Transaction {
            id: 1,
            amount: 42.0,
            category: Category::Food,
            description: Some("Groceries".into()),
            occurred_at: Utc.with_ymd_and_hms(2026, 10, 3, 9, 0, 0).unwrap(),
            recurring: false,
        }]
    }

    fn coach(mock: &MockBackend) -> Coach {
        Coach::new(AIClient::Mock(mock.clone())).with_prompts(PromptLibrary::embedded_only())
    }

    fn input(transactions: &[Transaction]) -> InsightPromptInput<'_> {
        InsightPromptInput {
            transactions,
            budget_total: 1000.0,
            spent_total: 950.0,
            monthly_income: 3000.0,
            goals: &[],
            focus: None,
        }
    }

    #[tokio::test]
    async fn test_generate_insight_end_to_end() {
        let mock = MockBackend::new();
        let txs = transactions();
        let insight = coach(&mock).generate_insight(&input(&txs)).await.unwrap();

        assert_eq!(
            insight.insight,
            "Your spending is mostly on track this month. Food and shopping make up the largest share."
        );
        assert_eq!(insight.suggestions.len(), 3);
        // 95% utilization regardless of the upbeat reply
        assert_eq!(insight.sentiment, Sentiment::Warning);

        let sent = mock.requests();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].user.contains("Groceries"));
    }

    #[tokio::test]
    async fn test_recommend_savings_end_to_end() {
        let mock = MockBackend::new();
        let txs = transactions();
        let recs = coach(&mock).recommend_savings(&input(&txs)).await.unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].estimated_savings, Some(15.0));
    }

    #[tokio::test]
    async fn test_validation_error_sends_nothing() {
        let mock = MockBackend::new();
        let result = coach(&mock).generate_insight(&input(&[])).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_service_error_is_not_retried() {
        let mock = MockBackend::failing("AI API error 500");
        let txs = transactions();
        let err = coach(&mock).recommend_savings(&input(&txs)).await.unwrap_err();
        assert!(err.is_external_service());
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_unstructured_reply_degrades() {
        let mock = MockBackend::with_response("Try spending less on takeout.");
        let txs = transactions();
        let recs = coach(&mock).recommend_savings(&input(&txs)).await.unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].action, "Try spending less on takeout.");
        assert!(recs[0].estimated_savings.is_none());
    }
}
