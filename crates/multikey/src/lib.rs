//! Sets that keep their members in composite-key order.
//!
//! An [`OrderedSet`] is configured with a list of [`KeyComponentProfile`]s.
//! Each profile reads one column of a composite key from a member, through
//! explicitly registered [`Accessor`]s, and orders that column. Members are
//! indexed under every composite key they yield: a book with two authors is
//! filed under both when the set is ordered by author. The set also maintains,
//! per profile, the [`ComponentSet`] of every key component its members yield.
//!
//! ```
//! use multikey::{Accessor, Indexable, KeyComponent, KeyComponentProfile, OrderedSet};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
//! struct Genre(&'static str);
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
//! struct Title(&'static str);
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
//! struct Book {
//!     title: Title,
//!     genres: Vec<Genre>,
//! }
//!
//! impl Indexable for Book {
//!     fn accessors() -> Vec<Accessor<Self>> {
//!         vec![
//!             Accessor::scalar("title", |book: &Book| book.title.clone()),
//!             Accessor::collection("genres", |book: &Book| book.genres.clone()),
//!         ]
//!     }
//! }
//!
//! # fn main() -> multikey::Result<()> {
//! let by_genre = KeyComponentProfile::<Book>::ordered::<Genre>().discover()?;
//! let by_title = KeyComponentProfile::<Book>::ordered::<Title>().discover()?;
//!
//! let mut books = OrderedSet::new([by_genre.clone(), by_title])?;
//! books.insert(Book { title: Title("Solaris"), genres: vec![Genre("SF")] })?;
//! books.insert(Book {
//!     title: Title("Dracula"),
//!     genres: vec![Genre("Horror"), Genre("Classic")],
//! })?;
//!
//! let genres: Vec<&Genre> = books.key_component_set(&by_genre)?.iter_as().collect();
//! assert_eq!(genres, [&Genre("Classic"), &Genre("Horror"), &Genre("SF")]);
//!
//! let horror = books.values_for(&KeyComponent::new(Genre("Horror")))?;
//! assert_eq!(horror[0].title, Title("Dracula"));
//! # Ok(())
//! # }
//! ```

mod accessor;
pub use accessor::{Accessor, Indexable, Yields};

mod collation;
pub use collation::{Collation, OrderingRule};

mod component;
pub use component::{Component, ComponentType, Element, KeyComponent};

mod error;
pub use error::Error;

pub mod index;
pub use index::{CompositeKey, Entry, MapNode};

mod instrument;
pub use instrument::{Instrument, NodeCounter};

mod profile;
pub use profile::{Basis, KeyComponentProfile, ProfileBuilder};

pub mod set;
pub use set::{ComponentSet, Cursor, OrderedSet, OrderedSetBuilder};

/// A Result type alias that uses this crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
