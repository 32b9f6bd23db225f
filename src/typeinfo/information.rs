// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolved type occurrences.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Weak}
};

use dashmap::DashMap;
use parking_lot::RwLock;

use crate::{
    model::{
        ClassDef, ConstructorDef, FieldDef, MethodDef, TypeRef,
        builtins::{ITERABLE, MAP, OBJECT}
    },
    reflect::TypeIntrospector,
    utils::naming
};

/// Top-level cache shared by a resolver and the instances it produced.
pub(crate) type TypeCache = DashMap<TypeRef, TypeInformation>;

/// Structural variant of a [`TypeInformation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Non-generic named type.
    Class,
    /// Named type with generic arguments.
    Parameterized,
    /// Array type.
    Array,
    /// Generic parameter without a binding.
    Variable
}

impl TypeKind {
    fn of(ty: &TypeRef) -> Self {
        match ty {
            TypeRef::Named { args, .. } if args.is_empty() => Self::Class,
            TypeRef::Named { .. } => Self::Parameterized,
            TypeRef::Array(_) => Self::Array,
            TypeRef::Param(_) => Self::Variable
        }
    }
}

/// Identity of a type occurrence: what it is and where it was resolved.
#[derive(Debug, PartialEq, Eq, Hash)]
struct TypeKey {
    kind:   TypeKind,
    ty:     TypeRef,
    parent: Option<Arc<TypeKey>>
}

impl TypeKey {
    /// Context for an unresolved occurrence.
    ///
    /// An occurrence repeating one further up its own context chain takes
    /// that occurrence's context, so recursive generic types keep a finite
    /// chain.
    fn enclosing(
        kind: TypeKind,
        ty: &TypeRef,
        parent: Option<Arc<TypeKey>>
    ) -> Option<Arc<TypeKey>> {
        let mut cursor = parent.as_deref();
        while let Some(key) = cursor {
            if key.kind == kind && key.ty == *ty {
                return key.parent.clone();
            }
            cursor = key.parent.as_deref();
        }
        parent
    }
}

/// What a type occurrence needs to create further occurrences.
#[derive(Clone)]
pub(crate) struct Env {
    catalog: Arc<dyn TypeIntrospector>,
    cache:   Weak<TypeCache>
}

impl Env {
    pub(crate) fn new(catalog: Arc<dyn TypeIntrospector>, cache: Weak<TypeCache>) -> Self {
        Self { catalog, cache }
    }

    /// Shared top-level instance for `ty`, or a fresh one once the owning
    /// resolver is gone.
    pub(crate) fn resolve(&self, ty: TypeRef) -> TypeInformation {
        match self.cache.upgrade() {
            Some(cache) => cache
                .entry(ty.clone())
                .or_insert_with(|| TypeInformation::build(ty, None, self.clone()))
                .value()
                .clone(),
            None => TypeInformation::build(ty, None, self.clone())
        }
    }

    pub(crate) fn detached(&self, ty: TypeRef) -> TypeInformation {
        TypeInformation::build(ty, None, self.clone())
    }
}

/// Memoized field lookup. Class-kind results live in the resolver cache
/// and are only referenced by type, so instances never own each other in
/// a cycle.
enum Memo {
    Shared(TypeRef),
    Owned(TypeInformation)
}

struct Node {
    key:      Arc<TypeKey>,
    bindings: HashMap<Arc<str>, TypeRef>,
    class:    Option<Arc<ClassDef>>,
    env:      Env,
    fields:   RwLock<HashMap<Arc<str>, Memo>>
}

/// A type occurrence resolved against its enclosing generic context.
///
/// Cloning is cheap. Equality compares the variant and the resolved type.
/// Occurrences that still contain an unbound parameter also compare their
/// enclosing context: the raw `GenericType<S, Object>` field of two
/// different owners is two distinct occurrences, while a fully resolved
/// `Localized<String>` is the same wherever it is reached.
#[derive(Clone)]
pub struct TypeInformation {
    node: Arc<Node>
}

impl TypeInformation {
    fn build(ty: TypeRef, parent: Option<Arc<TypeKey>>, env: Env) -> Self {
        let kind = TypeKind::of(&ty);
        let class = ty.raw_name().and_then(|name| env.catalog.class(name));
        let bindings = match (&class, ty.args()) {
            (Some(class), args) if !args.is_empty() => class
                .generic_params()
                .iter()
                .cloned()
                .zip(args.iter().cloned())
                .collect(),
            _ => HashMap::new()
        };
        let parent = if kind == TypeKind::Class || ty.is_resolved() {
            None
        } else {
            TypeKey::enclosing(kind, &ty, parent)
        };
        Self {
            node: Arc::new(Node {
                key: Arc::new(TypeKey { kind, ty, parent }),
                bindings,
                class,
                env,
                fields: RwLock::new(HashMap::new())
            })
        }
    }

    /// Structural variant.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.node.key.kind
    }

    /// Type expression with every resolvable generic parameter substituted.
    #[must_use]
    pub fn resolved_type(&self) -> &TypeRef {
        &self.node.key.ty
    }

    /// Raw type name; `None` for arrays and unbound parameters.
    #[must_use]
    pub fn raw_name(&self) -> Option<&str> {
        self.node.key.ty.raw_name()
    }

    /// Definition of the raw type, when the introspector knows it.
    #[must_use]
    pub fn class_def(&self) -> Option<&Arc<ClassDef>> {
        self.node.class.as_ref()
    }

    /// Store-facing alias declared on the raw type.
    #[must_use]
    pub fn type_alias(&self) -> Option<&str> {
        self.node.class.as_deref().and_then(ClassDef::type_alias)
    }

    /// Whether this is an array type.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.node.key.ty.is_array()
    }

    /// Generic parameters of the raw type bound to this occurrence's
    /// arguments.
    #[must_use]
    pub fn bindings(&self) -> &HashMap<Arc<str>, TypeRef> {
        &self.node.bindings
    }

    pub(crate) fn introspector(&self) -> &Arc<dyn TypeIntrospector> {
        &self.node.env.catalog
    }

    /// Occurrence of an already-resolved type inside this context.
    fn child(&self, resolved: TypeRef) -> Self {
        if resolved == self.node.key.ty {
            return self.clone();
        }
        match TypeKind::of(&resolved) {
            TypeKind::Class => self.node.env.resolve(resolved),
            _ => Self::build(
                resolved,
                Some(Arc::clone(&self.node.key)),
                self.node.env.clone()
            )
        }
    }

    /// Resolve a type expression declared by this type against this context.
    ///
    /// Generic parameters of this type are replaced by their bindings;
    /// parameters without a binding stay unresolved.
    ///
    /// # Arguments
    ///
    /// * `declared` - Type as written in this type's declaration
    #[must_use]
    pub fn create_info(&self, declared: &TypeRef) -> Self {
        self.child(declared.substitute(&self.node.bindings))
    }

    /// Type of a property, supporting dotted paths (`address.city`).
    ///
    /// Inherited fields resolve against the specialization of the declaring
    /// ancestor. Lookups try the exact name first, then its snake_case form.
    ///
    /// # Returns
    ///
    /// `None` if any segment does not name a field.
    #[must_use]
    pub fn property(&self, path: &str) -> Option<Self> {
        let (head, tail) = match path.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (path, None)
        };
        let info = self.lookup_field(head)?;
        match tail {
            Some(rest) => info.property(rest),
            None => Some(info)
        }
    }

    fn lookup_field(&self, name: &str) -> Option<Self> {
        if let Some(memo) = self.node.fields.read().get(name) {
            return Some(match memo {
                Memo::Owned(info) => info.clone(),
                Memo::Shared(ty) => self.node.env.resolve(ty.clone())
            });
        }

        let resolved = self.resolve_field(name)?;
        let memo = if resolved.kind() == TypeKind::Class {
            Some(Memo::Shared(resolved.resolved_type().clone()))
        } else if Arc::ptr_eq(&resolved.node, &self.node) {
            None
        } else {
            Some(Memo::Owned(resolved.clone()))
        };
        if let Some(memo) = memo {
            self.node.fields.write().insert(Arc::from(name), memo);
        }
        Some(resolved)
    }

    fn resolve_field(&self, name: &str) -> Option<Self> {
        let owner = self.raw_name()?;
        let fields = self.node.env.catalog.fields(owner);
        let field = naming::find_by_name(&fields, name, |field| field.name())?;
        Some(self.field_type(field))
    }

    /// Type of a field declared by this type or one of its ancestors.
    ///
    /// Unlike [`property`](Self::property), the field is taken as given, so
    /// a field shadowed by a descendant still resolves to its own type.
    #[must_use]
    pub fn field_type(&self, field: &FieldDef) -> Self {
        self.declaring_context(field.declaring())
            .create_info(field.ty())
    }

    /// This type, or the specialization of the ancestor that declares a
    /// member.
    fn declaring_context(&self, declaring: &str) -> Self {
        if self.raw_name() == Some(declaring) {
            return self.clone();
        }
        self.super_type(declaring)
            .unwrap_or_else(|| self.clone())
    }

    /// Resolved generic arguments, in order.
    #[must_use]
    pub fn type_arguments(&self) -> Vec<Self> {
        self.node
            .key
            .ty
            .args()
            .iter()
            .map(|arg| self.child(arg.clone()))
            .collect()
    }

    /// Specialization of `candidate` among this type's supertypes.
    ///
    /// Interfaces are searched before the base chain: direct interfaces
    /// first, then their ancestors, then the base type recursively. The walk
    /// stops at the root type and never revisits a raw type.
    ///
    /// # Arguments
    ///
    /// * `candidate` - Raw name of the supertype
    ///
    /// # Returns
    ///
    /// `self` when the raw names are equal, `None` when `candidate` is not a
    /// supertype.
    #[must_use]
    pub fn super_type(&self, candidate: &str) -> Option<Self> {
        let mut visited = HashSet::new();
        self.find_super_type(candidate, &mut visited)
    }

    fn find_super_type(&self, candidate: &str, visited: &mut HashSet<Arc<str>>) -> Option<Self> {
        let name = self.raw_name()?;
        if name == candidate {
            return Some(self.clone());
        }
        if name == OBJECT || !visited.insert(Arc::from(name)) {
            return None;
        }
        let class = Arc::clone(self.node.class.as_ref()?);

        let interfaces: Vec<Self> = class
            .interfaces()
            .iter()
            .map(|interface| self.create_info(interface))
            .collect();
        if let Some(found) = interfaces
            .iter()
            .find(|interface| interface.raw_name() == Some(candidate))
        {
            return Some(found.clone());
        }
        for interface in &interfaces {
            if let Some(found) = interface.find_super_type(candidate, visited) {
                return Some(found);
            }
        }

        match class.base() {
            Some(base) => self.create_info(base).find_super_type(candidate, visited),
            None if candidate == OBJECT => Some(self.node.env.resolve(TypeRef::object())),
            None => None
        }
    }

    /// Whether this type is an associative container.
    #[must_use]
    pub fn is_map(&self) -> bool {
        self.super_type(MAP).is_some()
    }

    /// Whether this type is an array or iterable, excluding associative
    /// containers.
    #[must_use]
    pub fn is_collection_like(&self) -> bool {
        self.is_array() || (!self.is_map() && self.super_type(ITERABLE).is_some())
    }

    /// Element type of arrays and iterables; key type of associative
    /// containers.
    #[must_use]
    pub fn component_type(&self) -> Option<Self> {
        if let Some(element) = self.node.key.ty.element() {
            return Some(self.child(element.clone()));
        }
        if let Some(map) = self.super_type(MAP) {
            return map.type_arguments().into_iter().next();
        }
        self.super_type(ITERABLE)?
            .type_arguments()
            .into_iter()
            .next()
    }

    /// Value type of associative containers.
    #[must_use]
    pub fn map_value_type(&self) -> Option<Self> {
        self.super_type(MAP)?
            .type_arguments()
            .into_iter()
            .nth(1)
    }

    /// Payload type behind container wrappers.
    ///
    /// Arrays and collections yield their component type, associative
    /// containers their value type, other generic types their last type
    /// argument, and everything else itself.
    #[must_use]
    pub fn actual_type(&self) -> Option<Self> {
        if self.is_array() {
            return self.component_type();
        }
        if self.is_map() {
            return self.map_value_type();
        }
        if self.is_collection_like() {
            return self.component_type();
        }
        match self.type_arguments().pop() {
            Some(last) => Some(last),
            None => Some(self.clone())
        }
    }

    /// Whether a value of `target` can be used where this type is expected.
    ///
    /// Unbound parameters accept anything. Otherwise `target` must have this
    /// raw type among its supertypes, with assignable type arguments.
    #[must_use]
    pub fn is_assignable_from(&self, target: &Self) -> bool {
        if self == target || self.kind() == TypeKind::Variable {
            return true;
        }
        if self.is_array() {
            return match (self.component_type(), target.component_type()) {
                (Some(mine), Some(theirs)) if target.is_array() => mine.is_assignable_from(&theirs),
                _ => false
            };
        }
        let Some(name) = self.raw_name() else {
            return false;
        };
        let Some(specialization) = target.super_type(name) else {
            return false;
        };
        let mine = self.type_arguments();
        if mine.is_empty() {
            return true;
        }
        let theirs = specialization.type_arguments();
        mine.len() == theirs.len()
            && mine
                .iter()
                .zip(&theirs)
                .all(|(mine, theirs)| mine.is_assignable_from(theirs))
    }

    /// Parameter types of a constructor declared by this type or an
    /// ancestor.
    #[must_use]
    pub fn parameter_types(&self, constructor: &ConstructorDef) -> Vec<Self> {
        let context = self.declaring_context(constructor.declaring());
        constructor
            .params()
            .iter()
            .map(|param| context.create_info(param.ty()))
            .collect()
    }

    /// Parameter types of a method declared by this type or an ancestor.
    #[must_use]
    pub fn method_parameter_types(&self, method: &MethodDef) -> Vec<Self> {
        let context = self.declaring_context(method.declaring());
        method
            .params()
            .iter()
            .map(|param| context.create_info(param.ty()))
            .collect()
    }

    /// Return type of a method declared by this type or an ancestor.
    #[must_use]
    pub fn return_type(&self, method: &MethodDef) -> Option<Self> {
        let returns = method.returns()?;
        Some(
            self.declaring_context(method.declaring())
                .create_info(returns)
        )
    }

    /// Method by name, searching this type and then its base chain.
    #[must_use]
    pub fn find_method(&self, name: &str) -> Option<MethodDef> {
        let mut visited: HashSet<Arc<str>> = HashSet::new();
        let mut current = self.node.class.clone();
        while let Some(class) = current.take() {
            if !visited.insert(Arc::from(class.name())) {
                break;
            }
            if let Some(method) = class.find_method(name) {
                return Some(method.clone());
            }
            current = class
                .base()
                .and_then(TypeRef::raw_name)
                .and_then(|base| self.node.env.catalog.class(base));
        }
        None
    }

    /// Raw names of every base type and interface, nearest first.
    pub(crate) fn ancestor_names(&self) -> Vec<Arc<str>> {
        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut queue: VecDeque<Arc<ClassDef>> = self.node.class.iter().cloned().collect();

        while let Some(class) = queue.pop_front() {
            let supertypes = class.base().into_iter().chain(class.interfaces());
            for name in supertypes.filter_map(TypeRef::raw_name) {
                if !seen.insert(Arc::<str>::from(name)) {
                    continue;
                }
                names.push(Arc::from(name));
                if let Some(parent) = self.node.env.catalog.class(name) {
                    queue.push_back(parent);
                }
            }
        }
        names
    }
}

impl PartialEq for TypeInformation {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node) || self.node.key == other.node.key
    }
}

impl Eq for TypeInformation {}

impl Hash for TypeInformation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.key.hash(state);
    }
}

impl fmt::Display for TypeInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.node.key.ty, f)
    }
}

impl fmt::Debug for TypeInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInformation")
            .field("kind", &self.node.key.kind)
            .field("type", &format_args!("{}", self.node.key.ty))
            .field("contextual", &self.node.key.parent.is_some())
            .finish()
    }
}
