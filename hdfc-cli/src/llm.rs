//! LLM fallback classification against an Ollama-style completion endpoint.
//!
//! One serial network call per unmatched transaction; this is the dominant
//! latency cost on statements with many uncategorized rows. Every failure
//! (network, timeout, malformed answer) is logged and collapses to "no
//! opinion" so classification never fails the run.

use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use hdfc_core::{Categories, Error, Result, Strategy};

/// A timeout counts as an LLM failure rather than stalling the batch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub host: String,
}

/// Fallback strategy that asks the model for a single JSON answer
/// `{"category": "<name>"}`.
pub struct LlmClassifier {
    config: LlmConfig,
    names: Vec<String>,
    rules_json: String,
}

impl LlmClassifier {
    pub fn new(config: LlmConfig, rules: &Categories) -> Self {
        Self {
            config,
            names: rules.names().iter().map(|n| n.to_string()).collect(),
            rules_json: rules.to_json().to_string(),
        }
    }

    fn build_prompt(&self, description: &str) -> String {
        format!(
            "You assign one spending category to a bank transaction.\n\
             Known categories: {}.\n\
             Keyword rules used so far, as JSON: {}\n\
             Transaction description: {:?}\n\
             Respond with JSON only, exactly: {{\"category\": \"<one of the known categories>\"}}",
            self.names.join(", "),
            self.rules_json,
            description,
        )
    }

    fn request_category(&self, description: &str) -> Result<String> {
        let raw = self.complete(&self.build_prompt(description))?;
        parse_answer(&raw)
    }

    /// Run the completion synchronously. The CLI runs under
    /// `#[tokio::main]`, so creating a nested runtime and calling block_on
    /// would panic; reuse the running handle when there is one.
    fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.complete_async(prompt)))
        } else {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| Error::Llm(format!("create tokio runtime: {e}")))?;
            rt.block_on(self.complete_async(prompt))
        }
    }

    async fn complete_async(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            format: &'a str,
        }

        #[derive(Deserialize)]
        struct Resp {
            response: String,
        }

        let body = Req {
            model: &self.config.model,
            prompt,
            stream: false,
            format: "json",
        };

        let url = format!(
            "{}/api/generate",
            self.config.host.trim_end_matches('/')
        );
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Llm(format!("build http client: {e}")))?;

        let resp = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Llm(format!("request to {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(Error::Llm(format!("{url}: {status} {txt}")));
        }

        let out: Resp = resp
            .json()
            .await
            .map_err(|e| Error::Llm(format!("decode response: {e}")))?;
        Ok(out.response.trim().to_string())
    }
}

/// Parse the JSON-only answer contract.
fn parse_answer(raw: &str) -> Result<String> {
    #[derive(Deserialize)]
    struct Answer {
        category: String,
    }

    let answer: Answer = serde_json::from_str(raw)
        .map_err(|e| Error::Llm(format!("malformed answer {raw:?}: {e}")))?;
    let category = answer.category.trim();
    if category.is_empty() {
        return Err(Error::Llm(format!("empty category in answer {raw:?}")));
    }
    Ok(category.to_string())
}

impl Strategy for LlmClassifier {
    fn classify(&self, description: &str) -> Option<String> {
        match self.request_category(description) {
            Ok(category) => Some(category),
            Err(e) => {
                warn!("llm fallback failed for {description:?}: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_description_names_and_rules() {
        let rules = Categories::parse(
            "[Food]\nkeywords = [\"swiggy\"]\n\n[Shopping]\nkeywords = [\"amazon\"]\n",
        )
        .unwrap();
        let llm = LlmClassifier::new(
            LlmConfig {
                model: "llama3".to_string(),
                host: "http://localhost:11434".to_string(),
            },
            &rules,
        );
        let prompt = llm.build_prompt("UPI-COFFEE DAY");
        assert!(prompt.contains("UPI-COFFEE DAY"));
        assert!(prompt.contains("Food, Shopping"));
        assert!(prompt.contains("\"swiggy\""));
        assert!(prompt.contains("{\"category\":"));
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("{\"category\": \"Food\"}").unwrap(), "Food");
        assert!(parse_answer("Food").is_err());
        assert!(parse_answer("{\"category\": \"\"}").is_err());
        assert!(parse_answer("{\"label\": \"Food\"}").is_err());
    }
}
