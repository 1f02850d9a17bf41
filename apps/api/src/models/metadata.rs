use serde::Serialize;

use crate::llm_client::types::UsageRecord;
use crate::llm_client::NormalizedResponse;

/// Call accounting attached to every LLM-backed HTTP response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub model: String,
    pub usage: UsageRecord,
    pub cost: f64,
    pub processing_time_ms: u64,
    pub used_continuation: bool,
    pub used_fallback: bool,
}

impl ResponseMetadata {
    pub fn new<T>(model: &str, response: &NormalizedResponse<T>) -> Self {
        Self {
            model: model.to_string(),
            usage: response.usage,
            cost: response.cost,
            processing_time_ms: response.processing_time_ms,
            used_continuation: response.used_continuation,
            used_fallback: response.used_fallback,
        }
    }

    /// Folds a follow-up call made for the same request into this record.
    pub fn absorb<T>(&mut self, response: &NormalizedResponse<T>) {
        self.usage = self.usage.add(response.usage);
        self.cost += response.cost;
        self.processing_time_ms += response.processing_time_ms;
        self.used_continuation |= response.used_continuation;
        self.used_fallback |= response.used_fallback;
    }

    /// Starts a record from `response`, or folds it into the existing one.
    pub fn record<T>(slot: &mut Option<Self>, model: &str, response: &NormalizedResponse<T>) {
        match slot {
            Some(meta) => meta.absorb(response),
            None => *slot = Some(Self::new(model, response)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn response(input: u32, output: u32, cost: f64, ms: u64) -> NormalizedResponse<Value> {
        NormalizedResponse {
            data: Value::Null,
            usage: UsageRecord::new(input, output),
            cost,
            processing_time_ms: ms,
            finish_reason: "stop".to_string(),
            used_tool_call: true,
            used_continuation: false,
            used_fallback: false,
        }
    }

    #[test]
    fn test_record_accumulates_follow_up_calls() {
        let mut slot = None;
        ResponseMetadata::record(&mut slot, "gpt-4.1-mini", &response(100, 50, 0.5, 10));
        let mut second = response(10, 5, 0.25, 20);
        second.used_fallback = true;
        ResponseMetadata::record(&mut slot, "gpt-4.1-mini", &second);

        let meta = slot.unwrap();
        assert_eq!(meta.usage.total_tokens, 165);
        assert_eq!(meta.cost, 0.75);
        assert_eq!(meta.processing_time_ms, 30);
        assert!(meta.used_fallback);
        assert!(!meta.used_continuation);
    }

    #[test]
    fn test_serializes_camel_case() {
        let meta = ResponseMetadata::new("m", &response(1, 2, 0.0, 3));
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["processingTimeMs"], 3);
        assert_eq!(json["usage"]["totalTokens"], 3);
    }
}
