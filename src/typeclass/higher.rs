//! Higher-kinded type emulation through Generic Associated Types.
//!
//! Rust cannot abstract over a type constructor such as `PersistentList<_>`
//! directly. [`TypeConstructor`] names the element type a value is built over
//! and the same constructor applied to another element type.
//!
//! ```rust
//! use arbors::persistent::PersistentTreeMap;
//! use arbors::typeclass::TypeConstructor;
//!
//! fn rebuilt<T: TypeConstructor>() -> T::WithType<String>
//! where
//!     T::WithType<String>: Default,
//! {
//!     Default::default()
//! }
//!
//! let map: PersistentTreeMap<i32, String> = rebuilt::<PersistentTreeMap<i32, u8>>();
//! assert!(map.is_empty());
//! ```

/// A type constructor applied to [`Inner`](TypeConstructor::Inner).
///
/// # Laws
///
/// `<F as TypeConstructor>::WithType<F::Inner>` is `F` itself.
pub trait TypeConstructor {
    /// The element type this constructor is applied to.
    type Inner;

    /// The same constructor applied to `B`.
    type WithType<B>: TypeConstructor<Inner = B>;
}
