//! 파이프라인 전반에서 사용되는 공통 타입.

mod options;
mod period;
mod symbol;

pub use options::*;
pub use period::*;
pub use symbol::*;
