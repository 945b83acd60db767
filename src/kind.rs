//! The failure kind trait.

use core::any::{Any, TypeId};
use core::fmt;

/// A category of exceptional condition.
///
/// Every kind renders itself to a stable descriptive string and carries a
/// human-readable kind name. Adding a kind means implementing this trait,
/// usually via `#[derive(FailureKind)]`:
///
/// ```
/// use trapline::FailureKind;
///
/// #[derive(Debug, FailureKind)]
/// struct QuotaExceeded {
///     used: u64,
/// }
///
/// impl std::fmt::Display for QuotaExceeded {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "QuotaExceeded: {} units used", self.used)
///     }
/// }
///
/// assert_eq!(QuotaExceeded { used: 3 }.kind_name(), "QuotaExceeded");
/// ```
///
/// Dispatch never looks at [`kind_name`](FailureKind::kind_name). Handlers
/// match on the concrete Rust type, so two unrelated kinds that pick the
/// same name stay distinguishable.
pub trait FailureKind: AsAny + fmt::Debug + Send + Sync + 'static {
    /// Stable label for this kind.
    fn kind_name(&self) -> &'static str;

    /// Render the kind and its fields. Must be pure.
    fn render(&self) -> String;
}

/// Upcast helper so `dyn FailureKind` can be downcast.
#[doc(hidden)]
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn FailureKind {
    /// `TypeId` of the concrete kind behind this trait object.
    #[inline]
    pub fn kind_id(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Whether the concrete kind is exactly `K`.
    #[inline]
    pub fn is<K: FailureKind>(&self) -> bool {
        self.kind_id() == TypeId::of::<K>()
    }

    /// Narrow to `K` if the concrete kind is exactly `K`.
    #[inline]
    pub fn downcast_ref<K: FailureKind>(&self) -> Option<&K> {
        self.as_any().downcast_ref::<K>()
    }

    /// Consume and narrow to `K`, handing the box back on mismatch.
    pub fn downcast<K: FailureKind>(self: Box<Self>) -> Result<Box<K>, Box<dyn FailureKind>> {
        if !self.is::<K>() {
            return Err(self);
        }
        match self.into_any().downcast::<K>() {
            Ok(kind) => Ok(kind),
            Err(_) => unreachable!("kind_id checked above"),
        }
    }
}

impl fmt::Display for dyn FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
