//! Signature descriptors and registration-time validation.
//!
//! Every transition handler of a machine type must accept the same argument
//! bundle as the type's reference "update" operation and may only produce
//! states of the type's domain. Both facts are captured as [`TypeTag`]s when a
//! handler value is built and checked once, by [`validate`], when the handler
//! is registered. Dispatch assumes every handler in a table already passed.

use super::model::Model;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;

/// Runtime identity of a Rust type, with its name kept for diagnostics.
///
/// Two tags are equal when they describe the same type; the name takes no
/// part in comparisons.
#[derive(Clone, Copy, Debug)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Tag for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this tag describes `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Reference shape all transition handlers of a registry must match.
///
/// # Example
///
/// ```rust
/// use microstate::core::{Signature, TypeTag};
///
/// let update = Signature::new::<Option<u8>, bool>("update");
///
/// assert_eq!(update.name(), "update");
/// assert_eq!(update.params(), TypeTag::of::<Option<u8>>());
/// assert_eq!(update.returns(), TypeTag::of::<bool>());
/// ```
#[derive(Clone, Debug)]
pub struct Signature {
    name: Cow<'static, str>,
    params: TypeTag,
    returns: TypeTag,
}

impl Signature {
    /// Describe an operation taking `A` and producing states of type `S`.
    pub fn new<A: 'static, S: 'static>(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            params: TypeTag::of::<A>(),
            returns: TypeTag::of::<S>(),
        }
    }

    /// The `update` signature of a model: `M::Input` in, `M::State` out.
    pub fn update<M: Model>() -> Self {
        Self::new::<M::Input, M::State>("update")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> TypeTag {
        self.params
    }

    pub fn returns(&self) -> TypeTag {
        self.returns
    }

    /// Structural equality: same parameter bundle and return type.
    ///
    /// The operation name is a label and is ignored.
    pub fn same_shape(&self, other: &Signature) -> bool {
        self.params == other.params && self.returns == other.returns
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) -> {}", self.name, self.params, self.returns)
    }
}

/// A type-erased value a handler declares it may return.
///
/// Targets are how a handler narrows its return set below the whole domain.
/// They are deliberately untyped so a declaration naming a value from the
/// wrong domain is representable and can be rejected with
/// [`SignatureError::ReturnTypeMismatch`].
#[derive(Clone)]
pub struct Target {
    ty: TypeTag,
    label: String,
    value: Arc<dyn Any + Send + Sync>,
}

impl Target {
    pub fn new<T: fmt::Debug + Send + Sync + 'static>(value: T) -> Self {
        Self {
            ty: TypeTag::of::<T>(),
            label: format!("{value:?}"),
            value: Arc::new(value),
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        self.ty
    }

    /// `Debug` rendering of the value, captured at declaration.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.ty)
    }
}

/// Declared return set of a handler.
#[derive(Clone, Debug)]
pub enum Returns {
    /// Any value of the given type.
    Type(TypeTag),
    /// Only the listed values.
    OneOf(Vec<Target>),
}

impl Returns {
    /// Whether `state` belongs to the declared set.
    ///
    /// A `Type` declaration admits every value of that type.
    pub fn admits<S: PartialEq + 'static>(&self, state: &S) -> bool {
        match self {
            Returns::Type(tag) => tag.is::<S>(),
            Returns::OneOf(targets) => targets
                .iter()
                .any(|t| t.downcast_ref::<S>().is_some_and(|v| v == state)),
        }
    }
}

/// Fingerprint of a handler, computed once when the handler value is built.
#[derive(Clone, Debug)]
pub struct HandlerSignature {
    pub params: TypeTag,
    pub returns: Returns,
}

/// Errors raised when a handler does not fit its reference signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error(
        "Handler `{handler}` does not have the same signature as `{reference}`: \
         parameters ({found}) != ({expected})"
    )]
    SignatureMismatch {
        handler: String,
        reference: String,
        expected: String,
        found: String,
    },

    #[error(
        "Handler `{handler}` does not return the state domain `{domain}`: \
         declared `{found}`"
    )]
    ReturnTypeMismatch {
        handler: String,
        domain: String,
        found: String,
    },
}

/// Check a handler fingerprint against a reference signature and a domain.
///
/// Parameters are compared first; a handler failing both checks reports the
/// parameter mismatch.
///
/// # Example
///
/// ```rust
/// use microstate::core::{validate, HandlerSignature, Returns, Signature, SignatureError, TypeTag};
///
/// let reference = Signature::new::<Option<u8>, bool>("update");
/// let missing_param = HandlerSignature {
///     params: TypeTag::of::<()>(),
///     returns: Returns::Type(TypeTag::of::<bool>()),
/// };
///
/// let err = validate("to_open", &missing_param, &reference, TypeTag::of::<bool>()).unwrap_err();
/// assert!(matches!(err, SignatureError::SignatureMismatch { .. }));
/// ```
pub fn validate(
    handler: &str,
    signature: &HandlerSignature,
    reference: &Signature,
    domain: TypeTag,
) -> Result<(), SignatureError> {
    if signature.params != reference.params() {
        return Err(SignatureError::SignatureMismatch {
            handler: handler.to_string(),
            reference: reference.name().to_string(),
            expected: reference.params().name().to_string(),
            found: signature.params.name().to_string(),
        });
    }

    match &signature.returns {
        Returns::Type(tag) if *tag == domain => Ok(()),
        Returns::Type(tag) => Err(SignatureError::ReturnTypeMismatch {
            handler: handler.to_string(),
            domain: domain.name().to_string(),
            found: tag.name().to_string(),
        }),
        Returns::OneOf(targets) => match targets.iter().find(|t| t.type_tag() != domain) {
            None => Ok(()),
            Some(stray) => Err(SignatureError::ReturnTypeMismatch {
                handler: handler.to_string(),
                domain: domain.name().to_string(),
                found: format!("{stray:?}"),
            }),
        },
    }
}
