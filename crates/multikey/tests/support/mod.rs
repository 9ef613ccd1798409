//! Fixtures shared by the integration tests: a small library catalog.

#![allow(dead_code)]

use multikey::{Accessor, Indexable, KeyComponentProfile};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Title(pub String);

/// A title type without an order; profiles over it fall back to hash order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoncomparableTitle(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Author {
    pub last: &'static str,
    pub first: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Genre(pub &'static str);

/// Books are identified by `id` alone; two books with the same id are the
/// same book even if their attributes differ.
#[derive(Debug, Clone)]
pub struct Book {
    pub id: u32,
    pub title: Option<Title>,
    pub subtitle: Option<Title>,
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Book {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Book {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl Indexable for Book {
    fn accessors() -> Vec<Accessor<Self>> {
        vec![
            Accessor::optional("title", |book: &Book| book.title.clone()),
            Accessor::optional("noncomparable_title", |book: &Book| {
                book.title
                    .as_ref()
                    .map(|title| NoncomparableTitle(title.0.clone()))
            }),
            Accessor::collection("authors", |book: &Book| book.authors.clone()),
            Accessor::collection("genres", |book: &Book| book.genres.clone()),
        ]
    }
}

/// Same catalog as [`Book`], but two accessors yield `Title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Booklet {
    pub title: Title,
    pub subtitle: Option<Title>,
}

impl Indexable for Booklet {
    fn accessors() -> Vec<Accessor<Self>> {
        vec![
            Accessor::scalar("title", |booklet: &Booklet| booklet.title.clone()),
            Accessor::optional("subtitle", |booklet: &Booklet| booklet.subtitle.clone()),
        ]
    }
}

pub fn author(last: &'static str, first: &'static str) -> Author {
    Author { last, first }
}

pub fn title(title: &str) -> Title {
    Title(title.to_string())
}

pub fn book(id: u32, title: &str, authors: &[Author], genres: &[&'static str]) -> Book {
    Book {
        id,
        title: Some(Title(title.to_string())),
        subtitle: None,
        authors: authors.to_vec(),
        genres: genres.iter().copied().map(Genre).collect(),
    }
}

pub fn by_title() -> KeyComponentProfile<Book> {
    KeyComponentProfile::<Book>::ordered::<Title>()
        .discover()
        .unwrap()
}

pub fn by_author() -> KeyComponentProfile<Book> {
    KeyComponentProfile::<Book>::ordered::<Author>()
        .discover()
        .unwrap()
}

pub fn by_genre() -> KeyComponentProfile<Book> {
    KeyComponentProfile::<Book>::ordered::<Genre>()
        .discover()
        .unwrap()
}

pub fn by_noncomparable_title() -> KeyComponentProfile<Book> {
    KeyComponentProfile::<Book>::hashed::<NoncomparableTitle>()
        .discover()
        .unwrap()
}

/// Five books; two have several authors and three have several genres.
pub fn library() -> Vec<Book> {
    let pratchett = author("Pratchett", "Terry");
    let gaiman = author("Gaiman", "Neil");
    let le_guin = author("Le Guin", "Ursula");
    let stross = author("Stross", "Charles");
    let doctorow = author("Doctorow", "Cory");

    vec![
        book(1, "Good Omens", &[pratchett.clone(), gaiman.clone()], &["Fantasy", "Comedy"]),
        book(2, "The Dispossessed", &[le_guin.clone()], &["SF"]),
        book(3, "Coraline", &[gaiman], &["Fantasy", "Horror"]),
        book(4, "Rapture of the Nerds", &[doctorow, stross], &["SF", "Comedy"]),
        book(5, "Mort", &[pratchett], &["Fantasy"]),
    ]
}

pub fn ids(values: &[&Book]) -> Vec<u32> {
    values.iter().map(|book| book.id).collect()
}
