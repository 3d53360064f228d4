#![deny(warnings)]
pub mod logic;
pub mod model;

pub struct EngineInfo;

impl EngineInfo {
    pub const fn name() -> &'static str {
        "syllogism-core"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::EngineInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(EngineInfo::name(), "syllogism-core");
        assert!(!EngineInfo::version().is_empty());
    }
}
