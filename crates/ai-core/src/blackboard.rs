//! Hierarchical, per-tree shared memory.
//!
//! A [`Blackboard`] is an arena of segments, one per tree node, linked to their
//! parents. Reads resolve from the requesting segment upward and return the
//! first binding found, so a value published into an ancestor's segment is seen
//! by every node beneath that ancestor and by nothing outside it. Writes always
//! target one exact segment; which one is decided by the caller (usually at tree
//! construction time, see `ai-bt`'s scope selectors).
//!
//! Values are a closed sum ([`BbValue`]) addressed through typed keys
//! ([`BbKey`]), so a key's value type is fixed where the key is declared.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::{EntityId, NodeState, Vec3};

/// Index of a blackboard segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The segment every blackboard starts with. Trees bind it to their root node.
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

/// Tagged blackboard value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BbValue {
    Point(Vec3),
    Entity(EntityId),
    Float(f32),
    Flag(bool),
    Count(u32),
}

impl BbValue {
    pub fn kind(&self) -> &'static str {
        match self {
            BbValue::Point(_) => "point",
            BbValue::Entity(_) => "entity",
            BbValue::Float(_) => "float",
            BbValue::Flag(_) => "flag",
            BbValue::Count(_) => "count",
        }
    }
}

/// Rust types that can live on the blackboard.
pub trait BbType: Copy + 'static {
    const KIND: &'static str;

    fn into_value(self) -> BbValue;

    fn from_value(value: &BbValue) -> Option<Self>;
}

macro_rules! bb_type {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl BbType for $ty {
            const KIND: &'static str = $kind;

            fn into_value(self) -> BbValue {
                BbValue::$variant(self)
            }

            fn from_value(value: &BbValue) -> Option<Self> {
                match value {
                    BbValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

bb_type!(Vec3, Point, "point");
bb_type!(EntityId, Entity, "entity");
bb_type!(f32, Float, "float");
bb_type!(bool, Flag, "flag");
bb_type!(u32, Count, "count");

/// Named, typed blackboard key.
pub struct BbKey<T: BbType> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: BbType> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

impl<T: BbType> Copy for BbKey<T> {}

impl<T: BbType> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: BbType> PartialEq for BbKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T: BbType> Eq for BbKey<T> {}

impl<T: BbType> core::fmt::Debug for BbKey<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "BbKey<{}>({})", T::KIND, self.name)
    }
}

#[derive(Debug, Clone)]
struct Segment {
    parent: Option<ScopeId>,
    label: &'static str,
    depth: u16,
    entries: BTreeMap<&'static str, BbValue>,
    state: Option<NodeState>,
    pass: u64,
}

impl Segment {
    fn new(parent: Option<ScopeId>, label: &'static str, depth: u16) -> Self {
        Self {
            parent,
            label,
            depth,
            entries: BTreeMap::new(),
            state: None,
            pass: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Blackboard {
    segments: Vec<Segment>,
    pass: u64,
}

impl Default for Blackboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Blackboard {
    pub fn new() -> Self {
        Self {
            segments: vec![Segment::new(None, "root", 0)],
            pass: 0,
        }
    }

    /// Allocate a child segment under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this blackboard.
    pub fn add_scope(&mut self, parent: ScopeId, label: &'static str) -> ScopeId {
        assert!(
            parent.index() < self.segments.len(),
            "unknown parent scope {parent}"
        );
        let depth = self.segments[parent.index()].depth.saturating_add(1);
        let id = ScopeId(self.segments.len() as u32);
        self.segments.push(Segment::new(Some(parent), label, depth));
        id
    }

    pub fn relabel(&mut self, scope: ScopeId, label: &'static str) {
        if let Some(seg) = self.segments.get_mut(scope.index()) {
            seg.label = label;
        }
    }

    pub fn scope_count(&self) -> usize {
        self.segments.len()
    }

    pub fn scopes(&self) -> impl Iterator<Item = ScopeId> + '_ {
        (0..self.segments.len() as u32).map(ScopeId)
    }

    pub fn contains_scope(&self, scope: ScopeId) -> bool {
        scope.index() < self.segments.len()
    }

    pub fn label(&self, scope: ScopeId) -> Option<&'static str> {
        self.segments.get(scope.index()).map(|s| s.label)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.segments.get(scope.index())?.parent
    }

    pub fn depth(&self, scope: ScopeId) -> Option<u16> {
        self.segments.get(scope.index()).map(|s| s.depth)
    }

    /// `scope` itself, then each ancestor up to the root.
    pub fn lineage(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        let start = self.contains_scope(scope).then_some(scope);
        std::iter::successors(start, move |s| self.parent(*s))
    }

    /// The ancestor `distance` levels above `scope` (`0` is `scope` itself).
    pub fn ancestor(&self, scope: ScopeId, distance: u16) -> Option<ScopeId> {
        self.lineage(scope).nth(distance as usize)
    }

    /// Nearest segment at or above `scope` carrying `label`.
    pub fn find_labeled(&self, scope: ScopeId, label: &str) -> Option<ScopeId> {
        self.lineage(scope)
            .find(|s| self.segments[s.index()].label == label)
    }

    /// The segment that currently binds `key` as seen from `from`.
    pub fn holder<T: BbType>(&self, from: ScopeId, key: BbKey<T>) -> Option<ScopeId> {
        self.lineage(from)
            .find(|s| self.segments[s.index()].entries.contains_key(key.name))
    }

    pub fn contains<T: BbType>(&self, from: ScopeId, key: BbKey<T>) -> bool {
        self.holder(from, key).is_some()
    }

    /// Resolve `key` from `from` upward; the nearest binding wins.
    pub fn get<T: BbType>(&self, from: ScopeId, key: BbKey<T>) -> Option<T> {
        let holder = self.holder(from, key)?;
        self.decode(holder, key)
    }

    /// Read `key` from exactly one segment, without walking up.
    pub fn get_local<T: BbType>(&self, scope: ScopeId, key: BbKey<T>) -> Option<T> {
        self.decode(scope, key)
    }

    /// Bind `key` in exactly `scope`, replacing any previous value there.
    pub fn set<T: BbType>(&mut self, scope: ScopeId, key: BbKey<T>, value: T) {
        match self.segments.get_mut(scope.index()) {
            Some(seg) => {
                seg.entries.insert(key.name, value.into_value());
            }
            None => tracing::warn!(%scope, key = key.name, "write to unknown blackboard scope"),
        }
    }

    /// Retract the binding of `key` visible from `from` (the nearest one) and return it.
    pub fn clear<T: BbType>(&mut self, from: ScopeId, key: BbKey<T>) -> Option<T> {
        let holder = self.holder(from, key)?;
        self.clear_local(holder, key)
    }

    /// Remove `key` from exactly `scope`.
    pub fn clear_local<T: BbType>(&mut self, scope: ScopeId, key: BbKey<T>) -> Option<T> {
        let value = self.segments.get_mut(scope.index())?.entries.remove(key.name)?;
        Self::convert(scope, key, &value)
    }

    /// Drop every binding held directly by `scope`.
    pub fn clear_scope(&mut self, scope: ScopeId) {
        if let Some(seg) = self.segments.get_mut(scope.index()) {
            seg.entries.clear();
        }
    }

    /// Drop every binding and every recorded node state in every segment.
    ///
    /// The segment structure is kept: this is a reset, not a rebuild.
    pub fn clear_all(&mut self) {
        for seg in self.segments.iter_mut() {
            seg.entries.clear();
            seg.state = None;
            seg.pass = 0;
        }
    }

    /// `true` when no segment holds any binding.
    pub fn is_clear(&self) -> bool {
        self.segments.iter().all(|s| s.entries.is_empty())
    }

    pub fn entry_count(&self) -> usize {
        self.segments.iter().map(|s| s.entries.len()).sum()
    }

    pub fn keys(&self, scope: ScopeId) -> impl Iterator<Item = &'static str> + '_ {
        self.segments
            .get(scope.index())
            .into_iter()
            .flat_map(|s| s.entries.keys().copied())
    }

    pub fn raw(&self, scope: ScopeId, name: &str) -> Option<BbValue> {
        self.segments.get(scope.index())?.entries.get(name).copied()
    }

    /// Start a new evaluation pass; states recorded afterwards count as "visited".
    pub fn begin_pass(&mut self) -> u64 {
        self.pass = self.pass.wrapping_add(1);
        self.pass
    }

    pub fn record_state(&mut self, scope: ScopeId, state: NodeState) {
        let pass = self.pass;
        if let Some(seg) = self.segments.get_mut(scope.index()) {
            seg.state = Some(state);
            seg.pass = pass;
        }
    }

    /// Last state computed by the node bound to `scope`, whenever that was.
    pub fn last_state(&self, scope: ScopeId) -> Option<NodeState> {
        self.segments.get(scope.index())?.state
    }

    /// State recorded for `scope` during the current pass only.
    pub fn visited_state(&self, scope: ScopeId) -> Option<NodeState> {
        let seg = self.segments.get(scope.index())?;
        if seg.pass == self.pass && self.pass != 0 {
            seg.state
        } else {
            None
        }
    }

    fn decode<T: BbType>(&self, scope: ScopeId, key: BbKey<T>) -> Option<T> {
        let value = self.segments.get(scope.index())?.entries.get(key.name)?;
        Self::convert(scope, key, value)
    }

    fn convert<T: BbType>(scope: ScopeId, key: BbKey<T>, value: &BbValue) -> Option<T> {
        let decoded = T::from_value(value);
        if decoded.is_none() {
            tracing::warn!(
                %scope,
                key = key.name,
                expected = T::KIND,
                found = value.kind(),
                "blackboard type mismatch"
            );
        }
        decoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: BbKey<f32> = BbKey::new("level");

    #[test]
    fn lineage_walks_to_root() {
        let mut bb = Blackboard::new();
        let a = bb.add_scope(ScopeId::ROOT, "a");
        let b = bb.add_scope(a, "b");
        let chain: Vec<_> = bb.lineage(b).collect();
        assert_eq!(chain, vec![b, a, ScopeId::ROOT]);
        assert_eq!(bb.ancestor(b, 2), Some(ScopeId::ROOT));
        assert_eq!(bb.ancestor(b, 3), None);
        assert_eq!(bb.depth(b), Some(2));
    }

    #[test]
    fn visited_state_is_pass_scoped() {
        let mut bb = Blackboard::new();
        bb.begin_pass();
        bb.record_state(ScopeId::ROOT, NodeState::Running);
        assert_eq!(bb.visited_state(ScopeId::ROOT), Some(NodeState::Running));
        bb.begin_pass();
        assert_eq!(bb.visited_state(ScopeId::ROOT), None);
        assert_eq!(bb.last_state(ScopeId::ROOT), Some(NodeState::Running));
    }

    #[test]
    fn unknown_scope_reads_are_absent() {
        let mut bb = Blackboard::new();
        bb.set(ScopeId::ROOT, LEVEL, 1.0);
        let missing = ScopeId(42);
        assert_eq!(bb.get(missing, LEVEL), None);
        assert_eq!(bb.lineage(missing).count(), 0);
    }
}
