// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Two-pass catalog loader.
//!
//! ```text
//! source ──parse──► items ──pass 1──► ClassDef (struct, enum, trait)
//!                     │
//!                     └────pass 2──► PendingImpl ──apply──► interfaces,
//!                                         │                 constructors,
//!                                         │                 methods, consts
//!                                         └── target unknown: kept pending
//! ```
//!
//! A source is converted completely before anything is registered, so a
//! failing source leaves the catalog untouched.

use std::{collections::HashMap, fs, path::Path, sync::Arc};

use syn::{
    DeriveInput, Fields, FnArg, Generics, ImplItem, Item, ItemEnum, ItemImpl, ItemStruct,
    ItemTrait, Pat, ReturnType, Signature, TraitItem, TypeParamBound, Visibility
};
use tracing::{debug, trace};

use super::{
    attrs::{TypeAttrs, member_markers},
    convert::Scope
};
use crate::{
    error::SourceError,
    model::{
        ClassDef, ConstructorDef, FieldDef, MethodDef, ParamDef, TypeCatalog, TypeRef, markers
    }
};

/// Loads Rust item definitions into a [`TypeCatalog`].
///
/// | Item | Registered as |
/// |------|---------------|
/// | `struct` | Class; named fields, or tuple fields `0`, `1`, ... |
/// | `enum` | Enumeration (a simple type) |
/// | `trait` | Interface; supertraits become its interfaces |
/// | `impl Trait for Type` | Interface of `Type` |
/// | `impl Type` | Constructors (associated functions returning `Self`), methods, constants |
///
/// Inline modules are walked; items in them are registered by their bare
/// name.
///
/// # Examples
///
/// ```rust
/// use entity_mapping::source::SourceLoader;
///
/// let catalog = SourceLoader::parse(
///     r#"
///     #[entity(alias = "people")]
///     pub struct Person {
///         #[id]
///         id: String,
///         name: Option<String>,
///     }
///
///     impl Person {
///         pub fn new(id: String, name: Option<String>) -> Self {
///             Self { id, name }
///         }
///     }
///     "#
/// )
/// .unwrap();
///
/// let person = catalog.get("Person").unwrap();
/// assert_eq!(person.type_alias(), Some("people"));
/// assert_eq!(person.constructors()[0].arity(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SourceLoader {
    catalog: TypeCatalog,
    pending: Vec<PendingImpl>
}

impl SourceLoader {
    /// Loader over a catalog with the built-in types.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(TypeCatalog::with_builtins())
    }

    /// Loader adding to an existing catalog.
    #[must_use]
    pub const fn with_catalog(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            pending: Vec::new()
        }
    }

    /// Parse one source into a fresh catalog with the built-in types.
    ///
    /// # Errors
    ///
    /// See [`load_str`](Self::load_str).
    pub fn parse(source: &str) -> Result<TypeCatalog, SourceError> {
        let mut loader = Self::new();
        loader.load_str(source)?;
        Ok(loader.finish())
    }

    /// Load the items of `source`.
    ///
    /// Impl blocks whose target is not known yet are kept until a later
    /// source declares it.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Syntax`] when the source or an attribute does not
    ///   parse
    /// - [`SourceError::Attribute`] for a malformed `#[entity(...)]`
    /// - [`SourceError::UnsupportedType`] for type syntax the catalog cannot
    ///   represent
    pub fn load_str(&mut self, source: &str) -> Result<&mut Self, SourceError> {
        let file = syn::parse_file(source)?;

        let mut classes = Vec::new();
        let mut impls = Vec::new();
        collect(&file.items, &mut classes, &mut impls)?;

        let mut pending = Vec::with_capacity(impls.len());
        for item in impls {
            pending.extend(PendingImpl::convert(item)?);
        }

        debug!(
            types = classes.len(),
            impls = pending.len(),
            "loaded source items"
        );
        for class in classes {
            trace!(name = class.name(), kind = ?class.kind(), "registering type");
            self.catalog.register(class);
        }
        self.pending.extend(pending);
        self.apply_pending();
        Ok(self)
    }

    /// Load the items of the file at `path`.
    ///
    /// # Errors
    ///
    /// [`SourceError::Io`] when the file cannot be read, otherwise as
    /// [`load_str`](Self::load_str).
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, SourceError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source
        })?;
        self.load_str(&source)
    }

    /// Catalog loaded so far.
    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Number of impl blocks waiting for their target type.
    #[must_use]
    pub fn pending_impls(&self) -> usize {
        self.pending.len()
    }

    /// Finish loading; impl blocks still pending are dropped.
    #[must_use]
    pub fn finish(self) -> TypeCatalog {
        if !self.pending.is_empty() {
            debug!(
                count = self.pending.len(),
                "dropping impl blocks for unknown types"
            );
        }
        self.catalog
    }

    fn apply_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for block in pending {
            if let Err(block) = block.apply(&mut self.catalog) {
                self.pending.push(block);
            }
        }
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn collect<'a>(
    items: &'a [Item],
    classes: &mut Vec<ClassDef>,
    impls: &mut Vec<&'a ItemImpl>
) -> Result<(), SourceError> {
    for item in items {
        match item {
            Item::Struct(item) => classes.push(struct_def(item)?),
            Item::Enum(item) => classes.push(enum_def(item)?),
            Item::Trait(item) => classes.push(trait_def(item)?),
            Item::Impl(item) => impls.push(item),
            Item::Mod(module) => {
                if let Some((_, items)) = &module.content {
                    collect(items, classes, impls)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn type_params(generics: &Generics) -> Vec<Arc<str>> {
    generics
        .type_params()
        .map(|param| Arc::from(param.ident.to_string()))
        .collect()
}

fn self_type(name: &str, params: &[Arc<str>]) -> TypeRef {
    TypeRef::generic(name, params.iter().map(|param| TypeRef::param(Arc::clone(param))))
}

/// Apply `#[entity(...)]` to a freshly built definition.
fn with_type_attrs(
    mut class: ClassDef,
    input: &DeriveInput,
    scope: &Scope
) -> Result<ClassDef, SourceError> {
    let attrs = TypeAttrs::parse(input)?;
    if let Some(alias) = attrs.alias() {
        class = class.alias(alias);
    }
    if let Some(base) = attrs.extends() {
        let ty: syn::Type = syn::parse_str(base).map_err(|error| SourceError::Attribute {
            item:    attrs.ident().to_string(),
            message: format!("invalid `extends`: {error}")
        })?;
        class = class.extends(scope.convert(&ty)?);
    }
    Ok(class)
}

fn struct_def(item: &ItemStruct) -> Result<ClassDef, SourceError> {
    let name = item.ident.to_string();
    let params = type_params(&item.generics);
    let scope = Scope::new(params.clone()).with_self(self_type(&name, &params));

    let mut class = ClassDef::class(name.as_str()).type_params(params);
    let fields: Vec<_> = match &item.fields {
        Fields::Named(named) => named.named.iter().collect(),
        Fields::Unnamed(unnamed) => unnamed.unnamed.iter().collect(),
        Fields::Unit => Vec::new()
    };
    for (index, field) in fields.into_iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .map_or_else(|| index.to_string(), ToString::to_string);
        let mut def = FieldDef::new(field_name, scope.convert(&field.ty)?);
        for (marker, value) in member_markers(&field.attrs)?.iter() {
            def = match value {
                Some(value) => def.with_value(marker, value),
                None => def.with_marker(marker)
            };
        }
        class = class.field(def);
    }

    with_type_attrs(class, &DeriveInput::from(item.clone()), &scope)
}

fn enum_def(item: &ItemEnum) -> Result<ClassDef, SourceError> {
    let params = type_params(&item.generics);
    let scope = Scope::new(params.clone());
    let class = ClassDef::enumeration(item.ident.to_string()).type_params(params);
    with_type_attrs(class, &DeriveInput::from(item.clone()), &scope)
}

fn trait_def(item: &ItemTrait) -> Result<ClassDef, SourceError> {
    let name = item.ident.to_string();
    let params = type_params(&item.generics);
    let scope = Scope::new(params.clone()).with_self(self_type(&name, &params));

    let mut class = ClassDef::interface(name.as_str()).type_params(params);
    for bound in &item.supertraits {
        if let TypeParamBound::Trait(bound) = bound
            && matches!(bound.modifier, syn::TraitBoundModifier::None)
        {
            class = class.implements(scope.convert_path(&bound.path, bound)?);
        }
    }
    for member in &item.items {
        if let TraitItem::Fn(function) = member
            && function.sig.receiver().is_some()
        {
            class = class.method(method_def(&function.sig, &scope)?);
        }
    }
    Ok(class)
}

fn method_def(sig: &Signature, scope: &Scope) -> Result<MethodDef, SourceError> {
    let scope = scope.extended(type_params(&sig.generics));
    let params = params(sig, &scope)?
        .into_iter()
        .map(PendingParam::into_def)
        .collect::<Vec<_>>();
    Ok(MethodDef::new(sig.ident.to_string(), params, returns(sig, &scope)?))
}

fn params(sig: &Signature, scope: &Scope) -> Result<Vec<PendingParam>, SourceError> {
    sig.inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(typed) => Some(typed),
            FnArg::Receiver(_) => None
        })
        .map(|typed| {
            let name = match typed.pat.as_ref() {
                Pat::Ident(ident) => Some(ident.ident.to_string()),
                _ => None
            };
            let value = member_markers(&typed.attrs)?
                .value(markers::VALUE)
                .map(str::to_owned);
            Ok(PendingParam {
                name,
                ty: scope.convert(&typed.ty)?,
                value
            })
        })
        .collect()
}

/// Whether `sig` returns `Self` or the type named `target`, unwrapped.
fn returns_self(sig: &Signature, target: &str) -> bool {
    let ReturnType::Type(_, ty) = &sig.output else {
        return false;
    };
    let syn::Type::Path(path) = ty.as_ref() else {
        return false;
    };
    path.qself.is_none()
        && path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Self" || segment.ident == target)
}

fn returns(sig: &Signature, scope: &Scope) -> Result<Option<TypeRef>, SourceError> {
    match &sig.output {
        ReturnType::Default => Ok(None),
        ReturnType::Type(_, ty) => scope.convert(ty).map(Some)
    }
}

/// Constructor or method parameter awaiting generic renaming.
#[derive(Debug, Clone)]
struct PendingParam {
    name:  Option<String>,
    ty:    TypeRef,
    value: Option<String>
}

impl PendingParam {
    fn renamed(&self, bindings: &HashMap<Arc<str>, TypeRef>) -> ParamDef {
        Self {
            ty: self.ty.substitute(bindings),
            ..self.clone()
        }
        .into_def()
    }

    fn into_def(self) -> ParamDef {
        let def = match self.name {
            Some(name) => ParamDef::new(name, self.ty),
            None => ParamDef::unnamed(self.ty)
        };
        match self.value {
            Some(value) => def.with_value(value),
            None => def
        }
    }
}

#[derive(Debug, Clone)]
enum Member {
    Constructor {
        params:   Vec<PendingParam>,
        public:   bool,
        explicit: bool
    },
    Method {
        name:    String,
        params:  Vec<PendingParam>,
        returns: Option<TypeRef>
    },
    Constant {
        name: String,
        ty:   TypeRef
    }
}

/// Impl block converted against its own generic parameters.
#[derive(Debug, Clone)]
struct PendingImpl {
    target:    String,
    args:      Vec<TypeRef>,
    interface: Option<TypeRef>,
    members:   Vec<Member>
}

impl PendingImpl {
    /// Convert `item`; `None` when its self type is not a named type.
    fn convert(item: &ItemImpl) -> Result<Option<Self>, SourceError> {
        let scope = Scope::new(type_params(&item.generics));
        let TypeRef::Named { name, args } = scope.convert(&item.self_ty)? else {
            return Ok(None);
        };
        let scope = scope.with_self(TypeRef::generic(Arc::clone(&name), args.clone()));

        let interface = match &item.trait_ {
            Some((None, path, _)) => Some(scope.convert_path(path, path)?),
            Some((Some(_), ..)) | None => None
        };

        let mut members = Vec::new();
        for member in &item.items {
            match member {
                ImplItem::Fn(function) => {
                    let sig = &function.sig;
                    let scope = scope.extended(type_params(&sig.generics));
                    if sig.receiver().is_some() {
                        members.push(Member::Method {
                            name:    sig.ident.to_string(),
                            params:  params(sig, &scope)?,
                            returns: returns(sig, &scope)?
                        });
                    } else if interface.is_none() && returns_self(sig, &name) {
                        members.push(Member::Constructor {
                            params:   params(sig, &scope)?,
                            public:   matches!(function.vis, Visibility::Public(_)),
                            explicit: function.attrs.iter().any(|attr| {
                                attr.path().is_ident(markers::PERSISTENCE_CONSTRUCTOR)
                            })
                        });
                    }
                }
                ImplItem::Const(constant) => members.push(Member::Constant {
                    name: constant.ident.to_string(),
                    ty:   scope.convert(&constant.ty)?
                }),
                _ => {}
            }
        }

        Ok(Some(Self {
            target: name.to_string(),
            args,
            interface,
            members
        }))
    }

    /// Add the block to its target; hands the block back when the target is
    /// unknown.
    fn apply(self, catalog: &mut TypeCatalog) -> Result<(), Self> {
        let Some(class) = catalog.get_mut(&self.target) else {
            return Err(self);
        };

        let bindings: HashMap<Arc<str>, TypeRef> = self
            .args
            .iter()
            .zip(class.generic_params())
            .filter_map(|(arg, own)| match arg {
                TypeRef::Param(param) => {
                    Some((Arc::clone(param), TypeRef::param(Arc::clone(own))))
                }
                _ => None
            })
            .collect();

        if let Some(interface) = &self.interface {
            trace!(ty = %self.target, interface = %interface, "adding interface");
            class.add_interface(interface.substitute(&bindings));
        }
        for member in &self.members {
            match member {
                Member::Constructor {
                    params,
                    public,
                    explicit
                } => {
                    let mut constructor =
                        ConstructorDef::new(params.iter().map(|param| param.renamed(&bindings)));
                    if !public {
                        constructor = constructor.private();
                    }
                    if *explicit {
                        constructor = constructor.explicit();
                    }
                    class.add_constructor(constructor);
                }
                Member::Method {
                    name,
                    params,
                    returns
                } => class.add_method(MethodDef::new(
                    name.as_str(),
                    params.iter().map(|param| param.renamed(&bindings)),
                    returns.as_ref().map(|ty| ty.substitute(&bindings))
                )),
                Member::Constant { name, ty } => {
                    let field = FieldDef::new(name.as_str(), ty.substitute(&bindings));
                    class.add_field(field.static_field());
                }
            }
        }
        Ok(())
    }
}
