//! Port declarations.

use itertools::Itertools;

/// Port declarations of a signal: a tree of named bit vectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortDecls {
    /// Struct of named members. A member without a name is flattened into its parent.
    Struct(Vec<(Option<String>, PortDecls)>),

    /// Bit vector of the given width.
    Bits(usize),
}

impl PortDecls {
    /// Returns the total width.
    pub fn width(&self) -> usize {
        match self {
            Self::Struct(inner) => inner.iter().map(|(_, m)| m.width()).sum(),
            Self::Bits(width) => *width,
        }
    }

    /// Returns port declarations of `n` copies of `self`, named by their index.
    pub fn multiple(self, n: usize) -> Self { Self::Struct((0..n).map(|i| (Some(i.to_string()), self.clone())).collect()) }

    /// Flattens the declarations into `(name, width)` leaves in bit order.
    ///
    /// Names are joined with `_`; zero-width leaves are skipped.
    pub fn flatten(&self, prefix: &str) -> Vec<(String, usize)> {
        match self {
            Self::Bits(0) => vec![],
            Self::Bits(width) => vec![(prefix.to_string(), *width)],
            Self::Struct(inner) => inner
                .iter()
                .flat_map(|(name, member)| {
                    let prefix = match name {
                        Some(name) => [prefix, name.as_str()].iter().filter(|s| !s.is_empty()).join("_"),
                        None => prefix.to_string(),
                    };
                    member.flatten(&prefix)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_skips_unnamed_and_empty() {
        let decls = PortDecls::Struct(vec![
            (None, PortDecls::Struct(vec![(Some("addr".to_string()), PortDecls::Bits(32))])),
            (Some("valid".to_string()), PortDecls::Bits(1)),
            (Some("unit".to_string()), PortDecls::Bits(0)),
        ]);
        assert_eq!(decls.width(), 33);
        assert_eq!(decls.flatten("aw"), vec![("aw_addr".to_string(), 32), ("aw_valid".to_string(), 1)]);
        assert_eq!(decls.flatten(""), vec![("addr".to_string(), 32), ("valid".to_string(), 1)]);
    }
}
