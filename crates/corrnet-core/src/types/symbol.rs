//! 종목 식별자 정의.
//!
//! 종목 식별자는 대문자 티커 문자열입니다 (예: AAPL, BF.B).
//! 식별자 간의 고정된 전체 순서(바이트 단위 사전순)가 행렬 열 순서,
//! 그래프 노드 순서, 연결 요소 ID 결정에 사용됩니다.

/// 종목 식별자.
pub type InstrumentId = String;

/// 티커 문자열을 표준 형식으로 정규화합니다 (공백 제거, 대문자 변환).
pub fn normalize_symbol(raw: &str) -> InstrumentId {
    raw.trim().to_uppercase()
}

/// 쉼표로 구분된 티커 목록을 파싱합니다.
///
/// 빈 항목은 무시하며 입력 순서와 중복은 그대로 유지합니다.
pub fn parse_symbol_list(raw: &str) -> Vec<InstrumentId> {
    raw.split(',')
        .map(normalize_symbol)
        .filter(|s| !s.is_empty())
        .collect()
}
