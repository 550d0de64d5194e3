use ai_core::{BbKey, BbType, Blackboard, ScopeId};

use crate::TreeError;

/// Which blackboard segment a leaf publishes into, relative to its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeSelector {
    /// The leaf's own segment: invisible to siblings.
    Own,
    /// The enclosing composite.
    Parent,
    /// `n` levels up; `Ancestor(0)` is the leaf itself.
    Ancestor(u16),
    /// Nearest ancestor composite carrying this label.
    Named(&'static str),
    /// The tree root.
    Root,
}

impl ScopeSelector {
    pub fn resolve(
        self,
        node: &'static str,
        from: ScopeId,
        blackboard: &Blackboard,
    ) -> Result<ScopeId, TreeError> {
        let distance = match self {
            ScopeSelector::Own => 0,
            ScopeSelector::Parent => 1,
            ScopeSelector::Ancestor(n) => n,
            ScopeSelector::Root => return Ok(ScopeId::ROOT),
            ScopeSelector::Named(label) => {
                return blackboard
                    .find_labeled(from, label)
                    .ok_or(TreeError::UnknownScope { node, label });
            }
        };
        blackboard
            .ancestor(from, distance)
            .ok_or(TreeError::ScopeOutOfRange {
                node,
                distance,
                depth: blackboard.depth(from).unwrap_or(0),
            })
    }
}

/// Blackboard binding of a leaf: its own segment plus the resolved publish target.
///
/// Before [`LeafScope::attach`] both point at the root segment, which keeps a
/// detached leaf usable against a bare `Blackboard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafScope {
    selector: ScopeSelector,
    own: ScopeId,
    publish: ScopeId,
}

impl LeafScope {
    pub fn new(selector: ScopeSelector) -> Self {
        Self {
            selector,
            own: ScopeId::ROOT,
            publish: ScopeId::ROOT,
        }
    }

    pub fn attach(
        &mut self,
        node: &'static str,
        scope: ScopeId,
        blackboard: &Blackboard,
    ) -> Result<(), TreeError> {
        self.publish = self.selector.resolve(node, scope, blackboard)?;
        self.own = scope;
        Ok(())
    }

    pub fn selector(&self) -> ScopeSelector {
        self.selector
    }

    pub fn own(&self) -> ScopeId {
        self.own
    }

    pub fn publish_scope(&self) -> ScopeId {
        self.publish
    }

    /// Read as seen from this leaf (own segment, then ancestors).
    pub fn get<T: BbType>(&self, blackboard: &Blackboard, key: BbKey<T>) -> Option<T> {
        blackboard.get(self.own, key)
    }

    pub fn has<T: BbType>(&self, blackboard: &Blackboard, key: BbKey<T>) -> bool {
        blackboard.contains(self.own, key)
    }

    /// Write into the publish scope, visible to every branch beneath it.
    pub fn publish<T: BbType>(&self, blackboard: &mut Blackboard, key: BbKey<T>, value: T) {
        blackboard.set(self.publish, key, value);
    }

    /// Write into the leaf's own segment only.
    pub fn set_local<T: BbType>(&self, blackboard: &mut Blackboard, key: BbKey<T>, value: T) {
        blackboard.set(self.own, key, value);
    }

    /// Retract whatever binding of `key` this leaf currently sees.
    pub fn retract<T: BbType>(&self, blackboard: &mut Blackboard, key: BbKey<T>) -> Option<T> {
        blackboard.clear(self.own, key)
    }
}
