use rtinject_core::{Result, RuntimeKind};

use crate::{BunRule, NodeRule, PythonRule, RipgrepRule, RuntimeRule, UvRule};

/// Immutable table of one rule per runtime kind.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    node: NodeRule,
    bun: BunRule,
    uv: UvRule,
    ripgrep: RipgrepRule,
    python: PythonRule,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, kind: RuntimeKind) -> &dyn RuntimeRule {
        match kind {
            RuntimeKind::Node => &self.node,
            RuntimeKind::Bun => &self.bun,
            RuntimeKind::Uv => &self.uv,
            RuntimeKind::Ripgrep => &self.ripgrep,
            RuntimeKind::Python => &self.python,
        }
    }

    pub fn lookup_name(&self, name: &str) -> Result<&dyn RuntimeRule> {
        RuntimeKind::parse(name).map(|kind| self.lookup(kind))
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn RuntimeRule> + '_ {
        RuntimeKind::ALL
            .into_iter()
            .map(move |kind| self.lookup(kind))
    }
}
