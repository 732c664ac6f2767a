//! Status tag declarations and the accessor table generated from them.
//!
//! Declaring a tag group `[primary, alias...]` binds three accessors under
//! every name in the group:
//!
//! - a constructor `name`, building a [`ResultValue`] tagged with the primary status,
//! - a predicate `name?`, checking for the primary status,
//! - a continuation `name_then`, forwarding the payload only on a match.
//!
//! All accessors are plain closures capturing the normalized primary status,
//! so the full set of valid names can be enumerated at any time.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, trace};

use crate::builtin::BUILTIN_TAGS;
use crate::error::TagError;
use crate::status::StatusId;
use crate::value::{Payload, ResultValue};

/// Bound constructor: wraps a payload in a result tagged with the tag's primary status.
pub type Constructor = Arc<dyn Fn(Payload) -> ResultValue + Send + Sync>;

/// Bound predicate: does the result carry the tag's primary status?
pub type Predicate = Arc<dyn Fn(&ResultValue) -> bool + Send + Sync>;

/// Bound continuation: on a match, the payload (or the continuation's result); `None` otherwise.
pub type Continuation = Arc<
    dyn Fn(&ResultValue, Option<&dyn Fn(&Payload) -> Payload>) -> Option<Payload> + Send + Sync,
>;

const PREDICATE_SUFFIX: &str = "?";
const CONTINUATION_SUFFIX: &str = "_then";

/// Accessor names owned by [`ResultValue`] itself; no tag may generate them.
const RESERVED: &[(AccessorKind, &str)] = &[
    (AccessorKind::Constructor, "new"),
    (AccessorKind::Predicate, "status_is?"),
    (AccessorKind::Predicate, "any?"),
    (AccessorKind::Continuation, "any_then"),
    (AccessorKind::Continuation, "assert_then"),
];

/// The three accessor flavours generated per tag name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessorKind {
    Constructor,
    Predicate,
    Continuation,
}

impl AccessorKind {
    const ALL: [AccessorKind; 3] = [
        AccessorKind::Constructor,
        AccessorKind::Predicate,
        AccessorKind::Continuation,
    ];

    /// Accessor name generated for a tag name of this kind.
    pub fn format(self, name: &StatusId) -> String {
        match self {
            AccessorKind::Constructor => name.to_string(),
            AccessorKind::Predicate => format!("{name}{PREDICATE_SUFFIX}"),
            AccessorKind::Continuation => format!("{name}{CONTINUATION_SUFFIX}"),
        }
    }

    /// Normalize a caller-supplied accessor name into its table key.
    fn key(self, accessor: &str) -> Option<String> {
        let accessor = accessor.trim().to_lowercase();
        let base = match self {
            AccessorKind::Constructor => Some(accessor.as_str()),
            AccessorKind::Predicate => accessor.strip_suffix(PREDICATE_SUFFIX),
            AccessorKind::Continuation => accessor.strip_suffix(CONTINUATION_SUFFIX),
        }?;
        let base = StatusId::new(base);
        if base.is_empty() {
            return None;
        }
        Some(self.format(&base))
    }
}

/// A primary tag name plus the aliases that share its accessors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagDeclaration {
    primary: String,
    aliases: Vec<String>,
}

impl TagDeclaration {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases<I>(primary: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            primary: primary.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a `[primary, alias...]` group. An empty group yields an
    /// empty primary, which declaration rejects.
    pub fn from_group<I>(group: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut names = group.into_iter().map(Into::into);
        let primary = names.next().unwrap_or_default();
        Self {
            primary,
            aliases: names.collect(),
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }
}

impl From<&str> for TagDeclaration {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TagDeclaration {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl<const N: usize> From<[&str; N]> for TagDeclaration {
    fn from(group: [&str; N]) -> Self {
        Self::from_group(group)
    }
}

impl From<&[&str]> for TagDeclaration {
    fn from(group: &[&str]) -> Self {
        Self::from_group(group.iter().copied())
    }
}

impl From<Vec<String>> for TagDeclaration {
    fn from(group: Vec<String>) -> Self {
        Self::from_group(group)
    }
}

impl From<Vec<&str>> for TagDeclaration {
    fn from(group: Vec<&str>) -> Self {
        Self::from_group(group)
    }
}

/// A declared tag as recorded by the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagEntry {
    pub primary: StatusId,
    pub aliases: Vec<StatusId>,
}

impl TagEntry {
    /// Primary name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &StatusId> {
        std::iter::once(&self.primary).chain(self.aliases.iter())
    }
}

#[derive(Clone)]
enum Accessor {
    Constructor(Constructor),
    Predicate(Predicate),
    Continuation(Continuation),
}

impl Accessor {
    fn bind(kind: AccessorKind, status: &StatusId) -> Self {
        let status = status.clone();
        match kind {
            AccessorKind::Constructor => {
                Accessor::Constructor(Arc::new(move |payload: Payload| {
                    ResultValue::with_value(&status, payload)
                }))
            }
            AccessorKind::Predicate => Accessor::Predicate(Arc::new(move |result: &ResultValue| {
                result.status_is(&status)
            })),
            AccessorKind::Continuation => Accessor::Continuation(Arc::new(
                move |result: &ResultValue, continuation: Option<&dyn Fn(&Payload) -> Payload>| {
                    let payload = result.assert_then(&status)?;
                    Some(match continuation {
                        Some(f) => f(payload),
                        None => payload.clone(),
                    })
                },
            )),
        }
    }
}

#[derive(Clone)]
struct Binding {
    status: StatusId,
    accessor: Accessor,
}

struct PlannedGroup {
    primary: StatusId,
    names: Vec<StatusId>,
    accessors: Vec<(AccessorKind, String)>,
}

/// Table of declared status tags and their generated accessors.
///
/// Registries are independent values: construct one, declare tags, optionally
/// [`freeze`](TagRegistry::freeze) it, then hand it to whoever dispatches by name.
#[derive(Clone)]
pub struct TagRegistry {
    tags: Vec<TagEntry>,
    index: HashMap<StatusId, usize>,
    accessors: BTreeMap<(AccessorKind, String), Binding>,
    frozen: bool,
}

impl TagRegistry {
    /// A registry seeded with the built-in vocabulary.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .install(
                BUILTIN_TAGS
                    .iter()
                    .map(|group| TagDeclaration::from(*group))
                    .collect(),
            )
            .expect("built-in tags are conflict free");
        registry
    }

    /// A registry with no tags at all.
    pub fn empty() -> Self {
        Self {
            tags: Vec::new(),
            index: HashMap::new(),
            accessors: BTreeMap::new(),
            frozen: false,
        }
    }

    /// Declare a batch of tag groups.
    ///
    /// The whole batch is validated before anything is installed: on error
    /// the registry is left untouched. Re-declaring a name for the tag it
    /// already belongs to is a no-op, so groups may be re-declared with extra
    /// aliases.
    pub fn declare_tags<I>(&mut self, declarations: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<TagDeclaration>,
    {
        if self.frozen {
            return Err(TagError::Frozen.into());
        }
        self.install(declarations.into_iter().map(Into::into).collect())
    }

    pub fn declare_tag(&mut self, declaration: impl Into<TagDeclaration>) -> Result<()> {
        self.declare_tags([declaration.into()])
    }

    /// Reject every further declaration.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn install(&mut self, declarations: Vec<TagDeclaration>) -> Result<()> {
        let plan = self.plan(&declarations)?;
        for group in plan {
            self.commit(group);
        }
        Ok(())
    }

    fn plan(&self, declarations: &[TagDeclaration]) -> Result<Vec<PlannedGroup>> {
        let mut pending: HashMap<(AccessorKind, String), StatusId> = HashMap::new();
        let mut plan = Vec::with_capacity(declarations.len());

        for declaration in declarations {
            let primary = StatusId::new(declaration.primary());
            let mut names = vec![primary.clone()];
            for alias in declaration.aliases() {
                let alias = StatusId::new(alias);
                if !names.contains(&alias) {
                    names.push(alias);
                }
            }
            if names.iter().any(StatusId::is_empty) {
                return Err(TagError::EmptyTagName.into());
            }

            let mut accessors = Vec::new();
            for name in &names {
                for kind in AccessorKind::ALL {
                    let accessor = kind.format(name);
                    if RESERVED.contains(&(kind, accessor.as_str())) {
                        return Err(TagError::ReservedAccessor { accessor }.into());
                    }
                    let key = (kind, accessor);
                    let existing = self
                        .accessors
                        .get(&key)
                        .map(|binding| &binding.status)
                        .or_else(|| pending.get(&key));
                    match existing {
                        Some(owner) if *owner == primary => {}
                        Some(owner) => {
                            return Err(TagError::AccessorDefined {
                                accessor: key.1,
                                existing: owner.clone(),
                                requested: primary,
                            }
                            .into());
                        }
                        None => {
                            pending.insert(key.clone(), primary.clone());
                            accessors.push(key);
                        }
                    }
                }
            }

            plan.push(PlannedGroup {
                primary,
                names,
                accessors,
            });
        }
        Ok(plan)
    }

    fn commit(&mut self, group: PlannedGroup) {
        let PlannedGroup {
            primary,
            names,
            accessors,
        } = group;
        let primary = StatusId::interned(primary.as_str());
        let names: Vec<StatusId> = names
            .iter()
            .map(|name| StatusId::interned(name.as_str()))
            .collect();

        match self.index.get(&primary).copied() {
            Some(slot) => {
                let entry = &mut self.tags[slot];
                for name in names.into_iter().skip(1) {
                    if !entry.aliases.contains(&name) {
                        entry.aliases.push(name);
                    }
                }
            }
            None => {
                self.index.insert(primary.clone(), self.tags.len());
                self.tags.push(TagEntry {
                    primary: primary.clone(),
                    aliases: names.into_iter().skip(1).collect(),
                });
            }
        }

        let bound: BTreeMap<AccessorKind, Accessor> = AccessorKind::ALL
            .into_iter()
            .map(|kind| (kind, Accessor::bind(kind, &primary)))
            .collect();
        let installed = accessors.len();
        for (kind, accessor) in accessors {
            trace!(tag = %primary, %accessor, "installing accessor");
            self.accessors.insert(
                (kind, accessor),
                Binding {
                    status: primary.clone(),
                    accessor: bound[&kind].clone(),
                },
            );
        }
        debug!(tag = %primary, installed, "declared status tag");
    }

    fn lookup(&self, kind: AccessorKind, accessor: &str) -> Result<&Binding> {
        kind.key(accessor)
            .and_then(|key| self.accessors.get(&(kind, key)))
            .ok_or_else(|| {
                TagError::UnknownOperation {
                    accessor: accessor.to_string(),
                }
                .into()
            })
    }

    /// The constructor bound to `name` (a primary tag name or alias).
    pub fn constructor(&self, name: &str) -> Result<Constructor> {
        match &self.lookup(AccessorKind::Constructor, name)?.accessor {
            Accessor::Constructor(f) => Ok(f.clone()),
            _ => unreachable!("constructor slot holds a constructor"),
        }
    }

    /// The predicate bound to `accessor`, e.g. `"ok?"`.
    pub fn predicate(&self, accessor: &str) -> Result<Predicate> {
        match &self.lookup(AccessorKind::Predicate, accessor)?.accessor {
            Accessor::Predicate(f) => Ok(f.clone()),
            _ => unreachable!("predicate slot holds a predicate"),
        }
    }

    /// The continuation bound to `accessor`, e.g. `"ok_then"`.
    pub fn continuation(&self, accessor: &str) -> Result<Continuation> {
        match &self.lookup(AccessorKind::Continuation, accessor)?.accessor {
            Accessor::Continuation(f) => Ok(f.clone()),
            _ => unreachable!("continuation slot holds a continuation"),
        }
    }

    pub fn construct(&self, name: &str, payload: impl Into<Payload>) -> Result<ResultValue> {
        Ok(self.constructor(name)?(payload.into()))
    }

    pub fn check(&self, accessor: &str, result: &ResultValue) -> Result<bool> {
        Ok(self.predicate(accessor)?(result))
    }

    /// Payload on a match, `None` (the no-match sentinel) otherwise.
    pub fn then(&self, accessor: &str, result: &ResultValue) -> Result<Option<Payload>> {
        Ok(self.continuation(accessor)?(result, None))
    }

    pub fn then_with(
        &self,
        accessor: &str,
        result: &ResultValue,
        continuation: impl Fn(&Payload) -> Payload,
    ) -> Result<Option<Payload>> {
        let continuation: &dyn Fn(&Payload) -> Payload = &continuation;
        Ok(self.continuation(accessor)?(result, Some(continuation)))
    }

    /// Declared tags in declaration order.
    pub fn tags(&self) -> &[TagEntry] {
        &self.tags
    }

    /// True when `name` resolves to any generated accessor.
    pub fn responds_to(&self, name: &str) -> bool {
        AccessorKind::ALL
            .into_iter()
            .any(|kind| self.lookup(kind, name).is_ok())
    }

    /// Primary status behind a constructor name or alias.
    pub fn primary_of(&self, name: &str) -> Option<&StatusId> {
        self.lookup(AccessorKind::Constructor, name)
            .ok()
            .map(|binding| &binding.status)
    }

    /// Every generated accessor name, sorted.
    pub fn accessor_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.accessors.keys().map(|(_, name)| name.clone()).collect();
        names.sort();
        names
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("tags", &self.tags)
            .field("accessors", &self.accessors.len())
            .field("frozen", &self.frozen)
            .finish()
    }
}
