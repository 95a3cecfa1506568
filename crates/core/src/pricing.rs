//! LLM cost estimation: static per-model price table and token heuristic.
//!
//! Prices are per million tokens, in micro-dollars (1 USD = 1_000_000), so
//! all arithmetic stays integral. Exact token counts reported by the
//! provider take precedence; the `chars / 4` heuristic fills in when the
//! response carries no usage block.

/// Approximate characters per token for the fallback heuristic.
const CHARS_PER_TOKEN: u64 = 4;

/// Per-model pricing row. Input/output prices are micro-dollars per
/// million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelPrice {
    pub model: &'static str,
    pub input_per_mtok: u64,
    pub output_per_mtok: u64,
}

/// Fallback row applied when a model is missing from [`PRICE_TABLE`].
/// Deliberately priced at the high end so unknown models never under-bill.
pub const DEFAULT_PRICE: ModelPrice = ModelPrice {
    model: "unknown",
    input_per_mtok: 15_000_000,
    output_per_mtok: 75_000_000,
};

/// Known chat-completion models and their list prices.
pub const PRICE_TABLE: &[ModelPrice] = &[
    ModelPrice {
        model: "gpt-4o",
        input_per_mtok: 2_500_000,
        output_per_mtok: 10_000_000,
    },
    ModelPrice {
        model: "gpt-4o-mini",
        input_per_mtok: 150_000,
        output_per_mtok: 600_000,
    },
    ModelPrice {
        model: "gpt-4.1",
        input_per_mtok: 2_000_000,
        output_per_mtok: 8_000_000,
    },
    ModelPrice {
        model: "gpt-4.1-mini",
        input_per_mtok: 400_000,
        output_per_mtok: 1_600_000,
    },
    ModelPrice {
        model: "claude-sonnet-4-20250514",
        input_per_mtok: 3_000_000,
        output_per_mtok: 15_000_000,
    },
    ModelPrice {
        model: "claude-haiku-3-5-20241022",
        input_per_mtok: 800_000,
        output_per_mtok: 4_000_000,
    },
];

/// Token counts plus the resulting charge for one LLM call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatedCost {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Total charge in micro-dollars.
    pub total_microdollars: u64,
}

impl EstimatedCost {
    /// Charge rounded up to whole cents, for the billing ledger.
    pub fn cents(&self) -> i64 {
        (self.total_microdollars.div_ceil(10_000)) as i64
    }
}

/// Look up the price row for `model`, falling back to [`DEFAULT_PRICE`].
pub fn price_for(model: &str) -> ModelPrice {
    PRICE_TABLE
        .iter()
        .copied()
        .find(|p| p.model == model)
        .unwrap_or(DEFAULT_PRICE)
}

/// Crude token-count heuristic: `ceil(chars / 4)`.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(CHARS_PER_TOKEN)
}

/// Compute the charge for a call given exact token counts.
pub fn cost_for_usage(model: &str, input_tokens: u64, output_tokens: u64) -> EstimatedCost {
    let price = price_for(model);
    let input_cost = input_tokens * price.input_per_mtok / 1_000_000;
    let output_cost = output_tokens * price.output_per_mtok / 1_000_000;
    EstimatedCost {
        input_tokens,
        output_tokens,
        total_microdollars: input_cost + output_cost,
    }
}

/// Compute the charge from raw prompt/completion text via the heuristic.
pub fn cost_for_text(model: &str, prompt: &str, completion: &str) -> EstimatedCost {
    cost_for_usage(model, estimate_tokens(prompt), estimate_tokens(completion))
}
