// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Raw type definitions: classes, fields, constructors and methods.
//!
//! Definitions are assembled with consuming builder methods:
//!
//! ```rust
//! use entity_mapping::model::{ClassDef, ConstructorDef, FieldDef, ParamDef, TypeRef};
//!
//! let person = ClassDef::class("Person")
//!     .field(FieldDef::new("name", TypeRef::named("String")))
//!     .constructor(ConstructorDef::new([ParamDef::new("name", TypeRef::named("String"))]));
//!
//! assert_eq!(person.fields()[0].declaring(), "Person");
//! assert_eq!(person.constructors()[0].declaring(), "Person");
//! ```

use std::sync::Arc;

use super::{Attributes, TypeRef, markers};

/// Kind of raw type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Struct-like type with fields.
    Class,
    /// Capability interface (trait).
    Interface,
    /// Enumeration.
    Enum,
    /// Built-in scalar.
    Primitive
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name:         Arc<str>,
    ty:           TypeRef,
    declaring:    Arc<str>,
    is_static:    bool,
    is_synthetic: bool,
    attributes:   Attributes
}

impl FieldDef {
    /// Instance field of the given declared type.
    ///
    /// The declaring type is filled in when the field is added to a
    /// [`ClassDef`].
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            declaring: Arc::from(""),
            is_static: false,
            is_synthetic: false,
            attributes: Attributes::new()
        }
    }

    /// Add a valueless marker such as [`markers::ID`].
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<Arc<str>>) -> Self {
        self.attributes.insert_marker(marker);
        self
    }

    /// Add a valued marker.
    #[must_use]
    pub fn with_value(mut self, marker: impl Into<Arc<str>>, value: impl Into<String>) -> Self {
        self.attributes.insert_value(marker, value);
        self
    }

    /// Mark as a static (type-level) field.
    #[must_use]
    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Mark as compiler-synthesized.
    #[must_use]
    pub fn synthetic(mut self) -> Self {
        self.is_synthetic = true;
        self
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type, possibly referencing generic parameters of the
    /// declaring type.
    #[must_use]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Name of the type that declares this field.
    #[must_use]
    pub fn declaring(&self) -> &str {
        &self.declaring
    }

    /// Whether the field is static.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether the field is compiler-synthesized.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.is_synthetic
    }

    /// Marker table.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// One constructor or method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDef {
    name:       Option<Arc<str>>,
    ty:         TypeRef,
    attributes: Attributes
}

impl ParamDef {
    /// Named parameter.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, ty: TypeRef) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            attributes: Attributes::new()
        }
    }

    /// Parameter whose name is not recoverable.
    #[must_use]
    pub fn unnamed(ty: TypeRef) -> Self {
        Self {
            name: None,
            ty,
            attributes: Attributes::new()
        }
    }

    /// Attach an override expression ([`markers::VALUE`]).
    #[must_use]
    pub fn with_value(mut self, expression: impl Into<String>) -> Self {
        self.attributes.insert_value(markers::VALUE, expression);
        self
    }

    /// Declared name, if known.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared type.
    #[must_use]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Marker table.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// One constructor.
///
/// Constructors are identified by their declaring type and their position
/// among that type's constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDef {
    declaring:  Arc<str>,
    position:   usize,
    params:     Vec<ParamDef>,
    is_public:  bool,
    attributes: Attributes
}

impl ConstructorDef {
    /// Public constructor taking `params`.
    #[must_use]
    pub fn new(params: impl IntoIterator<Item = ParamDef>) -> Self {
        Self {
            declaring:  Arc::from(""),
            position:   0,
            params:     params.into_iter().collect(),
            is_public:  true,
            attributes: Attributes::new()
        }
    }

    /// Public zero-argument constructor.
    #[must_use]
    pub fn no_arg() -> Self {
        Self::new([])
    }

    /// Restrict visibility.
    #[must_use]
    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    /// Mark as the explicitly preferred constructor.
    #[must_use]
    pub fn explicit(mut self) -> Self {
        self.attributes
            .insert_marker(markers::PERSISTENCE_CONSTRUCTOR);
        self
    }

    /// Name of the declaring type.
    #[must_use]
    pub fn declaring(&self) -> &str {
        &self.declaring
    }

    /// Position among the declaring type's constructors.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParamDef] {
        &self.params
    }

    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether the constructor is public.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.is_public
    }

    /// Whether the constructor carries [`markers::PERSISTENCE_CONSTRUCTOR`].
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.attributes.has(markers::PERSISTENCE_CONSTRUCTOR)
    }

    /// Marker table.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// One instance method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    name:      Arc<str>,
    declaring: Arc<str>,
    params:    Vec<ParamDef>,
    returns:   Option<TypeRef>
}

impl MethodDef {
    /// Method with parameters and an optional return type.
    #[must_use]
    pub fn new(
        name: impl Into<Arc<str>>,
        params: impl IntoIterator<Item = ParamDef>,
        returns: Option<TypeRef>
    ) -> Self {
        Self {
            name: name.into(),
            declaring: Arc::from(""),
            params: params.into_iter().collect(),
            returns
        }
    }

    /// Method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the declaring type.
    #[must_use]
    pub fn declaring(&self) -> &str {
        &self.declaring
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn params(&self) -> &[ParamDef] {
        &self.params
    }

    /// Declared return type; `None` for unit.
    #[must_use]
    pub fn returns(&self) -> Option<&TypeRef> {
        self.returns.as_ref()
    }
}

/// Definition of one raw type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    name:         Arc<str>,
    kind:         ClassKind,
    type_params:  Vec<Arc<str>>,
    base:         Option<TypeRef>,
    interfaces:   Vec<TypeRef>,
    fields:       Vec<FieldDef>,
    constructors: Vec<ConstructorDef>,
    methods:      Vec<MethodDef>,
    attributes:   Attributes
}

impl ClassDef {
    fn of_kind(name: impl Into<Arc<str>>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            attributes: Attributes::new()
        }
    }

    /// Struct-like type.
    #[must_use]
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        Self::of_kind(name, ClassKind::Class)
    }

    /// Capability interface.
    #[must_use]
    pub fn interface(name: impl Into<Arc<str>>) -> Self {
        Self::of_kind(name, ClassKind::Interface)
    }

    /// Enumeration.
    #[must_use]
    pub fn enumeration(name: impl Into<Arc<str>>) -> Self {
        Self::of_kind(name, ClassKind::Enum)
    }

    /// Built-in scalar.
    #[must_use]
    pub fn primitive(name: impl Into<Arc<str>>) -> Self {
        Self::of_kind(name, ClassKind::Primitive)
    }

    /// Declare generic parameters, in order.
    #[must_use]
    pub fn type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Set the base type.
    #[must_use]
    pub fn extends(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented interface.
    #[must_use]
    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Add a field declared by this type.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.add_field(field);
        self
    }

    /// Add a constructor declared by this type.
    #[must_use]
    pub fn constructor(mut self, constructor: ConstructorDef) -> Self {
        self.add_constructor(constructor);
        self
    }

    /// Add a method declared by this type.
    #[must_use]
    pub fn method(mut self, method: MethodDef) -> Self {
        self.add_method(method);
        self
    }

    /// Set the store-facing type alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.attributes.insert_value(markers::TYPE_ALIAS, alias);
        self
    }

    /// Replace the base type.
    pub fn set_base(&mut self, base: Option<TypeRef>) {
        self.base = base;
    }

    /// Append an interface unless already present.
    pub fn add_interface(&mut self, interface: TypeRef) {
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
    }

    /// Append a field, recording this type as its declaring type.
    pub fn add_field(&mut self, mut field: FieldDef) {
        field.declaring = Arc::clone(&self.name);
        self.fields.push(field);
    }

    /// Append a constructor, recording declaring type and position.
    pub fn add_constructor(&mut self, mut constructor: ConstructorDef) {
        constructor.declaring = Arc::clone(&self.name);
        constructor.position = self.constructors.len();
        self.constructors.push(constructor);
    }

    /// Append a method, recording this type as its declaring type.
    pub fn add_method(&mut self, mut method: MethodDef) {
        method.declaring = Arc::clone(&self.name);
        self.methods.push(method);
    }

    /// Type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type kind.
    #[must_use]
    pub const fn kind(&self) -> ClassKind {
        self.kind
    }

    /// Generic parameter names.
    #[must_use]
    pub fn generic_params(&self) -> &[Arc<str>] {
        &self.type_params
    }

    /// Declared base type.
    #[must_use]
    pub fn base(&self) -> Option<&TypeRef> {
        self.base.as_ref()
    }

    /// Declared interfaces.
    #[must_use]
    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }

    /// Fields declared directly by this type.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Constructors declared by this type.
    #[must_use]
    pub fn constructors(&self) -> &[ConstructorDef] {
        &self.constructors
    }

    /// Methods declared by this type.
    #[must_use]
    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    /// Method declared by this type, by name.
    #[must_use]
    pub fn find_method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|method| method.name() == name)
    }

    /// Type-level marker table.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Store-facing alias; blank aliases count as absent.
    #[must_use]
    pub fn type_alias(&self) -> Option<&str> {
        self.attributes
            .value(markers::TYPE_ALIAS)
            .filter(|alias| !alias.trim().is_empty())
    }
}
