//! Merge Policies
//!
//! A merge policy decides how two pieces of knowledge about the same quantity
//! combine: it either returns the merged (equal or more specific) value, or
//! `None` when the two disagree.

use std::fmt;
use std::sync::Arc;

/// Bounds every cell content type must satisfy.
///
/// Content is cloned out of cells for reading, compared for the fixed-point
/// check, and rendered with `Debug` when an inconsistency is reported.
pub trait Content: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> Content for T where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// A content type's own merge.
///
/// This is the policy [`PropagationNetwork::cell`](crate::network::PropagationNetwork::cell)
/// uses when none is given explicitly. Plain value types merge by equality.
pub trait Merge: Sized {
    /// Combine `content` with `increment`, or return `None` if they conflict.
    fn merge(content: &Self, increment: &Self) -> Option<Self>;
}

macro_rules! merge_by_equality {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Merge for $ty {
                fn merge(content: &Self, increment: &Self) -> Option<Self> {
                    (content == increment).then(|| content.clone())
                }
            }
        )*
    };
}

merge_by_equality!(
    f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char, String,
);

/// The merge policy rejected an increment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{policy} merge rejected the increment")]
pub struct MergeConflict {
    /// Name of the rejecting policy.
    pub policy: &'static str,
}

type MergeFn<T> = dyn Fn(&T, &T) -> Option<T> + Send + Sync;

/// A named merge function for content type `T`.
pub struct MergePolicy<T> {
    name: &'static str,
    merge: Arc<MergeFn<T>>,
}

impl<T> MergePolicy<T> {
    /// Wrap a merge function. `name` identifies the policy in error reports.
    pub fn new<F>(name: &'static str, merge: F) -> Self
    where
        F: Fn(&T, &T) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            name,
            merge: Arc::new(merge),
        }
    }

    /// Two pieces of knowledge merge only if they are identical.
    pub fn equality() -> Self
    where
        T: PartialEq + Clone + 'static,
    {
        Self::new("equality", |content: &T, increment: &T| {
            (content == increment).then(|| content.clone())
        })
    }

    /// The content type's own [`Merge`] implementation.
    pub fn of() -> Self
    where
        T: Merge + 'static,
    {
        Self::new(std::any::type_name::<T>(), T::merge)
    }

    /// Name of this policy.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Merge two present values.
    pub fn apply(&self, content: &T, increment: &T) -> Option<T> {
        (self.merge)(content, increment)
    }

    /// Merge possibly-absent values.
    ///
    /// Absence is not a conflict: if only one side is known it passes through
    /// unchanged. Only two present values that the policy rejects fail.
    pub fn merge_partial(
        &self,
        content: Option<&T>,
        increment: Option<&T>,
    ) -> Result<Option<T>, MergeConflict>
    where
        T: Clone,
    {
        match (content, increment) {
            (None, None) => Ok(None),
            (Some(content), None) => Ok(Some(content.clone())),
            (None, Some(increment)) => Ok(Some(increment.clone())),
            (Some(content), Some(increment)) => self
                .apply(content, increment)
                .map(Some)
                .ok_or(MergeConflict { policy: self.name }),
        }
    }
}

impl<T> Clone for MergePolicy<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            merge: Arc::clone(&self.merge),
        }
    }
}

impl<T> fmt::Debug for MergePolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergePolicy").field("name", &self.name).finish()
    }
}
