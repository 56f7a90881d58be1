//! Typed handles for mesh elements.
//!
//! Vertices, half-edges and faces live in flat arrays inside
//! [`HalfEdgeMesh`](super::HalfEdgeMesh). A handle is the position of an
//! element in its array, wrapped in a distinct type per element kind so a
//! face handle can never be used to look up a vertex. Handles are generic over
//! the integer that stores them; `u32` is the default.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Integer types that can back a mesh handle.
///
/// The largest value of the type is reserved as the "no element" sentinel,
/// which is how a half-edge without a twin or a vertex without an outgoing
/// edge is represented.
pub trait MeshIndex:
    Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static
{
    /// Sentinel for a missing element.
    const NONE: Self;

    /// Convert an array position into this index type.
    ///
    /// # Panics
    /// Panics if `v` does not fit below [`NONE`](Self::NONE).
    fn from_usize(v: usize) -> Self;

    /// Convert back into an array position.
    fn to_usize(self) -> usize;
}

macro_rules! impl_mesh_index {
    ($($ty:ty),*) => {
        $(
            impl MeshIndex for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn from_usize(v: usize) -> Self {
                    assert!(
                        v < <$ty>::MAX as usize,
                        "mesh element {} does not fit in {}",
                        v,
                        stringify!($ty)
                    );
                    v as $ty
                }

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_mesh_index!(u16, u32, u64);

/// Handle of a vertex. Equals the vertex's creation order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// Handle of a directed half-edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// Handle of a triangular face. Equals the face's creation order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_handle {
    ($name:ident, $tag:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Handle for the element at position `index`.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// The "no element" handle.
            #[inline]
            pub fn none() -> Self {
                Self(I::NONE)
            }

            /// Position of the element in its owning array.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Whether this handle refers to an element.
            #[inline]
            pub fn is_some(self) -> bool {
                self.0 != I::NONE
            }

            /// `Some(self)` unless this is the sentinel.
            #[inline]
            pub fn get(self) -> Option<Self> {
                self.is_some().then_some(self)
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.get() {
                    Some(h) => write!(f, "{}{}", $tag, h.index()),
                    None => write!(f, "{}-", $tag),
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::none()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }

        impl<I: MeshIndex> From<Option<$name<I>>> for $name<I> {
            fn from(v: Option<$name<I>>) -> Self {
                v.unwrap_or_else(Self::none)
            }
        }
    };
}

impl_handle!(VertexId, "v");
impl_handle!(HalfEdgeId, "he");
impl_handle!(FaceId, "f");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_roundtrip() {
        let v: VertexId = VertexId::new(7);
        assert_eq!(v.index(), 7);
        assert!(v.is_some());
        assert_eq!(v.get(), Some(v));
    }

    #[test]
    fn test_sentinel() {
        let he: HalfEdgeId = HalfEdgeId::none();
        assert!(!he.is_some());
        assert_eq!(he.get(), None);
        assert_eq!(HalfEdgeId::<u32>::default(), he);
        assert_eq!(HalfEdgeId::<u32>::from(None), he);
    }

    #[test]
    fn test_narrow_index() {
        let f: FaceId<u16> = FaceId::new(1200);
        assert_eq!(f.index(), 1200);
        assert!(f.is_some());
    }

    #[test]
    #[should_panic(expected = "does not fit in u16")]
    fn test_sentinel_position_is_rejected() {
        let _ = VertexId::<u16>::new(u16::MAX as usize);
    }

    #[test]
    #[should_panic(expected = "does not fit in u16")]
    fn test_wide_position_is_rejected() {
        let _ = FaceId::<u16>::new(70_000);
    }

    #[test]
    fn test_debug_format() {
        let v: VertexId = VertexId::new(3);
        assert_eq!(format!("{:?}", v), "v3");
        assert_eq!(format!("{:?}", FaceId::<u32>::none()), "f-");
    }
}
