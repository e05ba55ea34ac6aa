//! Beginner's glossary of stock terms

pub const NOT_FOUND: &str = "❗ 용어를 찾을 수 없습니다. 다른 키워드를 시도해보세요.";

const TERMS: [(&str, &str); 7] = [
    (
        "PER",
        "PER(주가수익비율)은 주가를 주당순이익(EPS)으로 나눈 값입니다. 숫자가 작을수록 저평가된 주식일 수 있습니다.",
    ),
    (
        "PBR",
        "PBR(주가순자산비율)은 주가를 주당순자산(BPS)으로 나눈 값입니다. 1보다 낮으면 자산 대비 주가가 낮은 상태입니다.",
    ),
    (
        "시가총액",
        "시가총액은 기업의 전체 시장 가치입니다. 주가 × 총 주식 수로 계산합니다.",
    ),
    (
        "배당",
        "기업이 이익의 일부를 주주에게 돌려주는 것을 말합니다. 배당 수익률은 투자자 입장에서 중요한 수익 요소입니다.",
    ),
    (
        "우선주",
        "의결권은 없지만 보통주보다 배당을 우선적으로 받을 수 있는 주식입니다.",
    ),
    (
        "분할",
        "주식을 쪼개는 것(예: 1주 → 5주). 유동성을 높이고 개인 투자자 접근성을 높입니다.",
    ),
    (
        "ETF",
        "여러 종목을 묶어 하나처럼 거래하는 상장지수펀드입니다. 분산투자에 유리합니다.",
    ),
];

fn normalize(text: &str) -> String {
    text.trim().to_uppercase().replace(' ', "")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Glossary;

impl Glossary {
    pub fn new() -> Self {
        Self
    }

    /// All terms with definitions, in display order
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        TERMS.iter().copied()
    }

    /// First term whose name contains the query, ignoring case and spaces
    pub fn lookup(&self, query: &str) -> Option<(&'static str, &'static str)> {
        let key = normalize(query);
        if key.is_empty() {
            return None;
        }
        self.entries().find(|(term, _)| normalize(term).contains(&key))
    }

    pub fn reply(&self, query: &str) -> String {
        match self.lookup(query) {
            Some((term, definition)) => format!("✅ {term}\n{definition}"),
            None => NOT_FOUND.to_string(),
        }
    }
}
