//! Static per-model pricing and the cost calculator.
//!
//! Prices are USD per 1K tokens. Lookup never fails: unknown names are first
//! remapped through the legacy alias list, then fall back to the table's
//! default model.

/// OpenAI model identifiers.
pub mod openai_models {
    pub const NANO: &str = "gpt-4.1-nano";
    pub const MINI: &str = "gpt-4.1-mini";
    pub const NORMAL: &str = "gpt-4.1";
    pub const LARGE: &str = "o4-mini-high";
}

/// Anthropic model identifiers.
pub mod anthropic_models {
    pub const HAIKU: &str = "claude-3-5-haiku-20241022";
    pub const SONNET: &str = "claude-sonnet-4-20250514";
    pub const OPUS: &str = "claude-opus-4-20250514";
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPrice {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

const fn price(input_per_1k: f64, output_per_1k: f64) -> ModelPrice {
    ModelPrice {
        input_per_1k,
        output_per_1k,
    }
}

#[derive(Debug)]
pub struct PricingTable {
    pub models: &'static [(&'static str, ModelPrice)],
    pub legacy_aliases: &'static [(&'static str, &'static str)],
    pub default_model: &'static str,
}

pub static OPENAI_PRICING: PricingTable = PricingTable {
    models: &[
        (openai_models::MINI, price(0.00015, 0.0006)),
        (openai_models::NANO, price(0.00015, 0.0006)),
        (openai_models::NORMAL, price(0.005, 0.015)),
        (openai_models::LARGE, price(0.03, 0.06)),
    ],
    legacy_aliases: &[
        ("gpt-4o-mini", openai_models::MINI),
        ("gpt-4o", openai_models::NORMAL),
    ],
    default_model: openai_models::MINI,
};

pub static ANTHROPIC_PRICING: PricingTable = PricingTable {
    models: &[
        (anthropic_models::HAIKU, price(0.00025, 0.00125)),
        (anthropic_models::SONNET, price(0.003, 0.015)),
        (anthropic_models::OPUS, price(0.015, 0.075)),
    ],
    legacy_aliases: &[
        ("claude-3.5-haiku", anthropic_models::HAIKU),
        ("claude-4-sonnet", anthropic_models::SONNET),
        ("claude-4-opus", anthropic_models::OPUS),
    ],
    default_model: anthropic_models::SONNET,
};

impl PricingTable {
    fn exact(&self, model: &str) -> Option<ModelPrice> {
        self.models
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, p)| *p)
    }

    /// Resolves `model` to a price: exact match, then legacy alias, then default.
    pub fn price_for(&self, model: &str) -> ModelPrice {
        if let Some(p) = self.exact(model) {
            return p;
        }
        let aliased = self
            .legacy_aliases
            .iter()
            .find(|(legacy, _)| *legacy == model)
            .and_then(|(_, current)| self.exact(current));
        if let Some(p) = aliased {
            return p;
        }
        self.exact(self.default_model).unwrap_or(ModelPrice {
            input_per_1k: 0.0,
            output_per_1k: 0.0,
        })
    }

    pub fn cost(&self, model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
        let p = self.price_for(model);
        (input_tokens as f64 * p.input_per_1k + output_tokens as f64 * p.output_per_1k) / 1000.0
    }
}

/// Picks the vendor table a model name belongs to.
pub fn table_for_model(model: &str) -> &'static PricingTable {
    if model.starts_with("claude") {
        &ANTHROPIC_PRICING
    } else {
        &OPENAI_PRICING
    }
}

/// USD cost of a call. Never fails; unknown models use the vendor default price.
pub fn cost(model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
    table_for_model(model).cost(model, input_tokens, output_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_models() -> Vec<&'static str> {
        OPENAI_PRICING
            .models
            .iter()
            .chain(ANTHROPIC_PRICING.models.iter())
            .map(|(name, _)| *name)
            .collect()
    }

    #[test]
    fn test_zero_tokens_cost_nothing() {
        for model in all_models() {
            assert_eq!(cost(model, 0, 0), 0.0, "{model}");
        }
        assert_eq!(cost("totally-unknown", 0, 0), 0.0);
    }

    #[test]
    fn test_costs_are_non_negative() {
        for model in all_models() {
            assert!(cost(model, 1234, 567) >= 0.0, "{model}");
        }
    }

    #[test]
    fn test_sonnet_cost() {
        // 1000 * 0.003 + 2000 * 0.015 = 3 + 30 = 33 -> / 1000
        let c = cost(anthropic_models::SONNET, 1000, 2000);
        assert!((c - 0.033).abs() < 1e-12, "cost was {c}");
    }

    #[test]
    fn test_mini_cost() {
        let c = cost(openai_models::MINI, 10_000, 1_000);
        assert!((c - (1.5 + 0.6) / 1000.0).abs() < 1e-12, "cost was {c}");
    }

    #[test]
    fn test_legacy_alias_resolves() {
        assert_eq!(
            ANTHROPIC_PRICING.price_for("claude-4-opus"),
            ANTHROPIC_PRICING.price_for(anthropic_models::OPUS)
        );
        assert_eq!(
            cost("claude-3.5-haiku", 1000, 1000),
            cost(anthropic_models::HAIKU, 1000, 1000)
        );
    }

    #[test]
    fn test_unknown_model_uses_vendor_default() {
        assert_eq!(
            cost("claude-99", 500, 500),
            cost(anthropic_models::SONNET, 500, 500)
        );
        assert_eq!(
            cost("some-new-model", 500, 500),
            cost(openai_models::MINI, 500, 500)
        );
    }
}
