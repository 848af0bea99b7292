//! Translation between internal tag names and a container's own names.

/// Static internal → external tag name table.
///
/// Names missing from the table are used unchanged in both directions.
#[derive(Debug, Clone, Copy)]
pub struct TagFieldMap {
    pairs: &'static [(&'static str, &'static str)],
}

impl TagFieldMap {
    pub const fn new(pairs: &'static [(&'static str, &'static str)]) -> Self {
        Self { pairs }
    }

    /// A map that renames nothing.
    pub const fn identity() -> Self {
        Self { pairs: &[] }
    }

    /// Name the container stores `internal` under.
    pub fn external<'a>(&self, internal: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(from, _)| *from == internal)
            .map_or(internal, |(_, to)| *to)
    }

    /// Internal name for a key read from the container.
    ///
    /// Container keys are matched case-insensitively and returned lowercase.
    pub fn internal(&self, external: &str) -> String {
        self.pairs
            .iter()
            .find(|(_, to)| to.eq_ignore_ascii_case(external))
            .map_or_else(|| external.to_ascii_lowercase(), |(from, _)| from.to_string())
    }

    pub fn pairs(&self) -> &'static [(&'static str, &'static str)] {
        self.pairs
    }
}
