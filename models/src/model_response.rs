use serde::{Deserialize, Serialize};

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Normalized text returned by one provider call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    pub content: String,
    pub model_used: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u64>,
}

/// Whether tokens are sent to the model or generated by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenDirection {
    Input,
    Output,
}

/// USD price per million tokens for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPricing {
    pub input_price_per_million_tokens: f64,
    pub output_price_per_million_tokens: f64,
}

impl ModelPricing {
    pub const fn new(input: f64, output: f64) -> Self {
        Self {
            input_price_per_million_tokens: input,
            output_price_per_million_tokens: output,
        }
    }

    pub fn price_per_million(&self, direction: TokenDirection) -> f64 {
        match direction {
            TokenDirection::Input => self.input_price_per_million_tokens,
            TokenDirection::Output => self.output_price_per_million_tokens,
        }
    }

    /// `token_count * (price_per_million / 1_000_000)`
    pub fn estimate_cost(&self, token_count: u64, direction: TokenDirection) -> f64 {
        token_count as f64 * (self.price_per_million(direction) / TOKENS_PER_MILLION)
    }
}
