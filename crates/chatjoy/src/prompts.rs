//! Prompt templates for the AI analyst
//!
//! Variables are pre-formatted strings so the templates stay free of number
//! formatting logic.

use crate::format::{format_change, format_market_cap, format_money, format_optional};
use crate::snapshot::StockSnapshot;
use chatjoy_prompt::{JinjaTemplate, PromptRegistry, Result};
use serde_json::{Value, json};

pub const ANALYST_SYSTEM: &str = "chatjoy.analyst.system";
pub const ANALYZE_STOCK: &str = "chatjoy.analyst.analyze_stock";

pub fn analyst_system_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        ANALYST_SYSTEM,
        "You are a stock analysis expert.",
        "주식 분석 전문가",
    )
}

pub fn analyze_stock_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        ANALYZE_STOCK,
        r"Analyze {{ name }} ({{ ticker }}) based on the data below. Write complete, natural English sentences and reflect the data accurately.

- Current price: {{ price }} ({{ change }})
- Market cap: {{ market_cap }}
- 52-week range: {{ low_52w }} ~ {{ high_52w }}
- Sector: {{ sector }} > {{ industry }}
- Moving averages: 5-day {{ ma5 }}, 20-day {{ ma20 }}, 60-day {{ ma60 }}, 120-day {{ ma120 }}
- RSI: {{ rsi }}

Cover:
1. Price assessment: where the price sits relative to the 52-week range and the moving averages.
2. Competitiveness: the company's market position and strengths within its sector.
3. Moving average analysis: short-term (5, 20 day) and long-term (60, 120 day) trends.
4. Overall opinion: about 300 characters, including the reasoning.

Output format:
{{ name }} ({{ ticker }}) analysis:
- The current price is {{ price }}, {{ change }} from the previous close.
- [price assessment]
- [competitiveness]
- [moving average analysis]
- Overall: [investment opinion]",
        r"다음 데이터를 바탕으로 {{ name }} ({{ ticker }})를 분석해 주세요. 분석은 자연스러운 한국어로, 문장을 완결하게 작성하며, 제공된 데이터를 정확히 반영하세요.

- 현재가: {{ price }} ({{ change }})
- 시가총액: {{ market_cap }}
- 52주 범위: {{ low_52w }} ~ {{ high_52w }}
- 업종: {{ sector }} > {{ industry }}
- 이동평균: 5일 {{ ma5 }}, 20일 {{ ma20 }}, 60일 {{ ma60 }}, 120일 {{ ma120 }}
- RSI: {{ rsi }}

분석 내용:
1. 현재 주가 평가: 주가가 52주 범위와 이동평균 대비 어떤 위치인지.
2. 업종 내 경쟁력: 회사의 시장 지위와 강점.
3. 다중 이동평균 분석: 단기(5일, 20일) 및 장기(60일, 120일) 추세.
4. 종합 투자 의견: 300자 내외로, 투자 판단 근거 포함.

출력 형식:
{{ name }} ({{ ticker }}) 분석:
- 현재 주가는 {{ price }}이며, 전일 대비 {{ change }} 변동했습니다.
- [주가 평가 문장]
- [경쟁력 문장]
- [이동평균 분석 문장]
- 종합 의견: [투자 의견]",
    )
}

/// Template variables for [`analyze_stock_prompt`]
pub fn snapshot_vars(snapshot: &StockSnapshot) -> Value {
    let money = |v: f64| format_money(v, snapshot.currency);
    let ma = |v: Option<f64>| format_optional(v, money);
    let ind = &snapshot.indicators;

    json!({
        "name": snapshot.name,
        "ticker": snapshot.ticker,
        "price": money(snapshot.price),
        "change": format_change(snapshot.change_pct),
        "market_cap": format_market_cap(snapshot),
        "low_52w": money(snapshot.low_52w),
        "high_52w": money(snapshot.high_52w),
        "sector": snapshot.sector,
        "industry": snapshot.industry,
        "ma5": ma(ind.ma5),
        "ma20": ma(ind.ma20),
        "ma60": ma(ind.ma60),
        "ma120": ma(ind.ma120),
        "rsi": format_optional(ind.rsi14, |v| format!("{v:.1}")),
    })
}

pub fn register_prompts(registry: &mut PromptRegistry) -> Result<()> {
    registry.register(analyst_system_prompt()?);
    registry.register(analyze_stock_prompt()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CompanyProfile;
    use crate::api::testing::bars;
    use chatjoy_prompt::Language;

    fn snapshot() -> StockSnapshot {
        let profile = CompanyProfile {
            name: Some("Apple Inc.".to_string()),
            market_cap: Some(3.0e12),
            sector: Some("Technology".to_string()),
            ..Default::default()
        };
        let closes: Vec<f64> = (1..=25).map(|i| 100.0 + f64::from(i)).collect();
        StockSnapshot::assemble("AAPL", bars(&closes), profile).unwrap()
    }

    #[test]
    fn test_register_prompts() {
        let mut registry = PromptRegistry::new();
        register_prompts(&mut registry).unwrap();
        assert!(registry.contains(ANALYST_SYSTEM));
        assert!(registry.contains(ANALYZE_STOCK));
        assert_eq!(registry.render(ANALYST_SYSTEM, &json!({})).unwrap(), "주식 분석 전문가");
    }

    #[test]
    fn test_korean_prompt_renders_snapshot() {
        let mut registry = PromptRegistry::new();
        register_prompts(&mut registry).unwrap();

        let prompt = registry
            .render(ANALYZE_STOCK, &snapshot_vars(&snapshot()))
            .unwrap();
        assert!(prompt.contains("Apple Inc. (AAPL)를 분석해 주세요"));
        assert!(prompt.contains("- 현재가: $125.00 (+0.8%)"));
        assert!(prompt.contains("- 시가총액: 30,000.0 억 달러"));
        assert!(prompt.contains("업종: Technology > N/A"));
        assert!(prompt.contains("5일 $123.00, 20일 $115.50, 60일 N/A"));
    }

    #[test]
    fn test_english_prompt() {
        let mut registry = PromptRegistry::with_language(Language::English);
        register_prompts(&mut registry).unwrap();

        let prompt = registry
            .render(ANALYZE_STOCK, &snapshot_vars(&snapshot()))
            .unwrap();
        assert!(prompt.starts_with("Analyze Apple Inc. (AAPL)"));
        assert!(prompt.contains("Overall: [investment opinion]"));
    }
}
