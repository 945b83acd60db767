//! The failure envelope and its causal chain.

use core::any::TypeId;
use core::fmt;
use core::panic::Location;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::sync::OnceLock;

use crate::hook;
use crate::kind::FailureKind;
use crate::stack::{self, Frames};
use crate::value::{IntoValue, Value};

/// Separator between links of [`Failure::full_message`].
pub const CAUSE_SEPARATOR: &str = " --> ";

/// A raised failure: one kind value, the stack captured where it was
/// raised, optional attachments, and an optional owned cause.
///
/// A cause must exist before the failure wrapping it, so chains are acyclic
/// by construction.
///
/// # Examples
///
/// ```
/// use trapline::{trap, throw_with_cause, FileError, InvalidOperation};
///
/// let io = trap(|| trapline::throw(FileError::new("app.toml", "missing")));
/// let outer = trap(move || throw_with_cause(InvalidOperation::new("init failed"), io.into_failure()));
///
/// let failure = outer.failure().unwrap();
/// assert!(failure.has_cause());
/// assert_eq!(failure.flatten().len(), 2);
/// assert!(failure.find_cause::<FileError>().is_some());
/// ```
pub struct Failure {
    pub(crate) kind: Box<dyn FailureKind>,
    /// Discriminant recorded at construction, compared during dispatch.
    pub(crate) kind_id: TypeId,
    pub(crate) frames: Frames,
    pub(crate) data: Option<Vec<(Cow<'static, str>, Value)>>,
    pub(crate) cause: Option<Box<Failure>>,
    /// Lazy render - only computed when accessed via `message()`.
    pub(crate) message: OnceLock<String>,
}

impl Failure {
    /// Build a failure for `kind`, capturing the stack at the caller.
    #[track_caller]
    pub fn new<K: FailureKind>(kind: K) -> Self {
        Self::with_cause(kind, None)
    }

    /// Build a failure for `kind` caused by `cause`.
    ///
    /// The stack is captured fresh at the caller; the cause keeps its own.
    #[track_caller]
    pub fn with_cause<K: FailureKind>(kind: K, cause: Option<Failure>) -> Self {
        let frames = stack::capture(Location::caller());
        Self {
            kind: Box::new(kind),
            kind_id: TypeId::of::<K>(),
            frames,
            data: None,
            cause: cause.map(Box::new),
            message: OnceLock::new(),
        }
    }

    /// Wrap an already boxed kind with frames captured elsewhere.
    pub(crate) fn from_boxed(kind: Box<dyn FailureKind>, frames: Frames) -> Self {
        let kind_id = kind.kind_id();
        Self {
            kind,
            kind_id,
            frames,
            data: None,
            cause: None,
            message: OnceLock::new(),
        }
    }

    /// Attach a key-value pair. Only available before the failure is raised.
    pub fn with(mut self, key: &'static str, val: impl IntoValue) -> Self {
        self.data
            .get_or_insert_with(Vec::new)
            .push((Cow::Borrowed(key), val.into_value()));
        self
    }

    /// Raise this failure.
    ///
    /// Inside [`trap`](crate::trap) it is carried unchanged to the result.
    /// Outside any protected region it surfaces like an ordinary panic.
    #[track_caller]
    pub fn throw(self) -> ! {
        hook::install();
        std::panic::panic_any(self)
    }

    /// The kind as a trait object.
    pub fn kind(&self) -> &dyn FailureKind {
        &*self.kind
    }

    /// Human-readable label of the kind.
    pub fn kind_name(&self) -> &'static str {
        self.kind.kind_name()
    }

    /// `TypeId` of the concrete kind.
    pub fn kind_id(&self) -> TypeId {
        self.kind_id
    }

    /// Whether the kind is exactly `K`.
    #[inline]
    pub fn is<K: FailureKind>(&self) -> bool {
        self.kind_id == TypeId::of::<K>()
    }

    /// The kind narrowed to `K`, if it is exactly `K`.
    #[inline]
    pub fn kind_as<K: FailureKind>(&self) -> Option<&K> {
        if self.is::<K>() {
            self.kind().downcast_ref::<K>()
        } else {
            None
        }
    }

    /// Consume and return the kind narrowed to `K`, or `self` on mismatch.
    pub fn into_kind<K: FailureKind>(self) -> Result<K, Self> {
        if !self.is::<K>() {
            return Err(self);
        }
        let Self {
            kind,
            kind_id,
            frames,
            data,
            cause,
            message,
        } = self;
        match kind.downcast::<K>() {
            Ok(k) => Ok(*k),
            Err(kind) => Err(Self {
                kind,
                kind_id,
                frames,
                data,
                cause,
                message,
            }),
        }
    }

    /// Rendered kind, computed once.
    pub fn message(&self) -> &str {
        self.message.get_or_init(|| self.kind.render())
    }

    /// Frames captured when this failure was raised, most recent first.
    pub fn stack_frames(&self) -> &[String] {
        &self.frames
    }

    /// Iterate over attachments in insertion order.
    pub fn data(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data
            .iter()
            .flat_map(|d| d.iter())
            .map(|(k, v)| (k.as_ref(), v))
    }

    /// Look up an attachment by key. The latest value wins.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data
            .as_ref()?
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    // ============================================================
    // Chain inspection
    // ============================================================

    pub fn has_cause(&self) -> bool {
        self.cause.is_some()
    }

    pub fn cause(&self) -> Option<&Failure> {
        self.cause.as_deref()
    }

    /// Detach and return the cause.
    pub fn into_cause(self) -> Option<Failure> {
        self.cause.map(|c| *c)
    }

    /// This failure followed by each cause, outermost first.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// Every failure in the chain, this one first.
    pub fn flatten(&self) -> Vec<&Failure> {
        self.chain().collect()
    }

    /// Rendered kinds of the whole chain joined by `" --> "`.
    pub fn full_message(&self) -> String {
        let mut out = String::new();
        for (idx, failure) in self.chain().enumerate() {
            if idx > 0 {
                out.push_str(CAUSE_SEPARATOR);
            }
            out.push_str(failure.message());
        }
        out
    }

    /// First kind of type `K` in the chain, starting with this failure.
    pub fn find_cause<K: FailureKind>(&self) -> Option<&K> {
        self.chain().find_map(|f| f.kind_as::<K>())
    }

    /// First failure in the chain whose kind is `K`.
    pub fn find_failure<K: FailureKind>(&self) -> Option<&Failure> {
        self.chain().find(|f| f.is::<K>())
    }

    /// Every kind of type `K` in the chain, outermost first.
    pub fn chain_all<K: FailureKind>(&self) -> Vec<&K> {
        self.chain().filter_map(|f| f.kind_as::<K>()).collect()
    }
}

/// Iterator over a failure and its causes.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a Failure>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Failure;

    fn next(&mut self) -> Option<&'a Failure> {
        let current = self.next?;
        self.next = current.cause();
        Some(current)
    }
}

// ============================================================
// Display, Debug and Error
// ============================================================

impl fmt::Display for Failure {
    /// `{}` renders the kind. `{:#}` renders the full chain and the trace.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return f.write_str(self.message());
        }
        writeln!(f, "{}", self.full_message())?;
        for (k, v) in self.data() {
            writeln!(f, "    {}: {}", k, v)?;
        }
        if !self.frames.is_empty() {
            writeln!(f, "\nTrace (most recent first):")?;
            for frame in self.frames.iter() {
                writeln!(f, "  {}", frame)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("kind", &self.kind)
            .field("frames", &self.frames)
            .field("data", &self.data)
            .field("cause", &self.cause)
            .finish()
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause().map(|c| c as &(dyn StdError + 'static))
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Failure;
    use serde::ser::{SerializeMap, SerializeStruct};
    use serde::{Serialize, Serializer};

    struct Data<'a>(&'a Failure);

    impl Serialize for Data<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(None)?;
            for (k, v) in self.0.data() {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }

    impl Serialize for Failure {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut state = serializer.serialize_struct("Failure", 5)?;
            state.serialize_field("kind", self.kind_name())?;
            state.serialize_field("message", self.message())?;
            state.serialize_field("frames", self.stack_frames())?;
            if self.data.is_some() {
                state.serialize_field("data", &Data(self))?;
            } else {
                state.skip_field("data")?;
            }
            state.serialize_field("cause", &self.cause())?;
            state.end()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileError, InvalidOperation, NullArgument};

    fn chain_of(n: usize) -> Failure {
        let mut current = Failure::new(FileError::new("base.txt", "level 0"));
        for level in 1..n {
            current = Failure::with_cause(InvalidOperation::new(format!("level {}", level)), Some(current));
        }
        current
    }

    #[test]
    fn test_single_flatten() {
        let f = Failure::new(NullArgument::new("user", ""));
        assert!(!f.has_cause());
        assert_eq!(f.flatten().len(), 1);
        assert_eq!(f.full_message(), f.message());
    }

    #[test]
    fn test_chain_length() {
        for n in 1..6 {
            assert_eq!(chain_of(n).flatten().len(), n);
        }
    }

    #[test]
    fn test_full_message_order() {
        let f = chain_of(3);
        assert_eq!(
            f.full_message(),
            "InvalidOperation: level 2 --> InvalidOperation: level 1 --> FileError: level 0 (file: base.txt)"
        );
    }

    #[test]
    fn test_find_cause_first_match() {
        let f = chain_of(3);
        assert_eq!(f.find_cause::<InvalidOperation>().unwrap().message, "level 2");
        assert_eq!(f.find_cause::<FileError>().unwrap().filename, "base.txt");
        assert!(f.find_cause::<NullArgument>().is_none());
        assert_eq!(f.chain_all::<InvalidOperation>().len(), 2);
    }

    #[test]
    fn test_into_kind() {
        let f = Failure::new(NullArgument::new("id", "required"));
        let f = f.into_kind::<InvalidOperation>().unwrap_err();
        let k = f.into_kind::<NullArgument>().unwrap();
        assert_eq!(k.param, "id");
    }

    #[test]
    fn test_attachments() {
        let f = Failure::new(InvalidOperation::new("bad state"))
            .with("attempt", 3)
            .with("state", "closed")
            .with("attempt", 4);
        assert_eq!(f.get("attempt"), Some(&Value::Int(4)));
        assert_eq!(*f.get("state").unwrap(), *"closed");
        assert_eq!(f.data().count(), 3);
        assert!(f.get("missing").is_none());
    }

    #[test]
    fn test_error_source() {
        let f = chain_of(2);
        let source = f.source().unwrap();
        assert_eq!(source.to_string(), "FileError: level 0 (file: base.txt)");
    }

    #[test]
    fn test_alternate_display() {
        let f = chain_of(2).with("path", "/etc");
        let text = format!("{:#}", f);
        assert!(text.starts_with("InvalidOperation: level 1 --> FileError"));
        assert!(text.contains("path: /etc"));
        assert_eq!(format!("{}", f), "InvalidOperation: level 1");
    }
}
