use multikey::{Accessor, Indexable};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Title(pub &'static str);

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Author {
    pub last: &'static str,
    pub first: &'static str,
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Genre(pub &'static str);

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Published {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

#[derive(Clone)]
pub struct Book {
    pub id: u32,
    pub title: Title,
    pub genres: Vec<Genre>,
    pub authors: Vec<Author>,
    pub published: Published,
    pub revised: Option<Published>,
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
            Accessor::scalar("title", |book: &Book| book.title.clone()),
            Accessor::collection("genres", |book: &Book| book.genres.clone()),
            Accessor::collection("authors", |book: &Book| book.authors.clone()),
            Accessor::scalar("published", |book: &Book| book.published),
            Accessor::optional("revised", |book: &Book| book.revised),
        ]
    }
}

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Job(pub &'static str);

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Department(pub &'static str);

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Employee {
    pub id: u32,
    pub last: &'static str,
    pub first: &'static str,
    pub jobs: Vec<Job>,
    pub departments: Vec<Department>,
}

impl Indexable for Employee {
    fn accessors() -> Vec<Accessor<Self>> {
        vec![
            Accessor::collection("jobs", |employee: &Employee| employee.jobs.clone()),
            Accessor::collection("departments", |employee: &Employee| {
                employee.departments.clone()
            }),
        ]
    }
}

/// Key components are printed through `Debug`, so these read like the
/// report lines they end up in.
macro_rules! debug_as {
    ($ty:ty, |$this:ident, $f:ident| $body:expr) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, $f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let $this = self;
                $body
            }
        }
    };
}

debug_as!(Title, |this, f| write!(f, "TITLE: {}", this.0));
debug_as!(Author, |this, f| write!(f, "AUTHOR: {}, {}", this.last, this.first));
debug_as!(Genre, |this, f| write!(f, "GENRE: {}", this.0));
debug_as!(Published, |this, f| write!(
    f,
    "PUBLISHED: {:04}-{:02}-{:02}",
    this.year, this.month, this.day
));
debug_as!(Book, |this, f| write!(f, "BOOK #{}: {}", this.id, this.title.0));
debug_as!(Job, |this, f| write!(f, "JOB: {}", this.0));
debug_as!(Department, |this, f| write!(f, "DEPARTMENT: {}", this.0));
debug_as!(Employee, |this, f| write!(
    f,
    "EMPLOYEE #{}: {}, {}",
    this.id, this.last, this.first
));

const fn date(year: u16, month: u8, day: u8) -> Published {
    Published { year, month, day }
}

fn author(last: &'static str, first: &'static str) -> Author {
    Author { last, first }
}

pub fn books() -> Vec<Book> {
    let book = |id, title, genres: &[&'static str], authors: &[Author], published, revised| Book {
        id,
        title: Title(title),
        genres: genres.iter().copied().map(Genre).collect(),
        authors: authors.to_vec(),
        published,
        revised,
    };

    vec![
        book(
            1,
            "Adventures of Huckleberry Finn",
            &["Fiction", "Adventure"],
            &[author("Twain", "Mark")],
            date(1884, 12, 10),
            Some(date(1912, 1, 1)),
        ),
        book(
            2,
            "Merriam-Webster Dictionary",
            &["Nonfiction", "Reference"],
            &[author("Webster", "Noah"), author("Merriam", "George")],
            date(1840, 1, 1),
            Some(date(1864, 1, 1)),
        ),
        book(
            3,
            "Advice to Youth",
            &["Nonfiction", "Satire"],
            &[author("Twain", "Mark")],
            date(1882, 1, 1),
            None,
        ),
        book(
            4,
            "Lucifer's Hammer",
            &["Fiction", "Science Fiction", "Adventure"],
            &[author("Niven", "Larry"), author("Pournelle", "Jerry")],
            date(1977, 1, 1),
            Some(date(1993, 1, 1)),
        ),
        book(
            5,
            "Slaughterhouse-Five",
            &["Fiction", "Science Fiction", "Satire"],
            &[author("Vonnegut", "Kurt")],
            date(1969, 3, 1),
            Some(date(1972, 1, 1)),
        ),
        book(
            6,
            "Dissertation on the English Language",
            &["Nonfiction", "Essay"],
            &[author("Webster", "Noah")],
            date(1789, 1, 1),
            Some(date(1793, 1, 1)),
        ),
        book(
            7,
            "Man Without a Country",
            &["Nonfiction", "Satire"],
            &[author("Vonnegut", "Kurt")],
            date(2005, 1, 1),
            Some(date(2007, 1, 1)),
        ),
    ]
}

pub fn employees() -> Vec<Employee> {
    let employee = |id, last, first, jobs: &[&'static str], departments: &[&'static str]| Employee {
        id,
        last,
        first,
        jobs: jobs.iter().copied().map(Job).collect(),
        departments: departments.iter().copied().map(Department).collect(),
    };

    vec![
        employee(
            1,
            "Smith",
            "Elizabeth",
            &["Manager", "Analyst"],
            &["Sales", "Accounting", "Sysops"],
        ),
        employee(
            2,
            "Jones",
            "Alexander",
            &["Analyst", "TechRep"],
            &["Sales", "Marketing", "Accounting"],
        ),
        employee(
            3,
            "Anderson",
            "Judith",
            &["ProjectLead", "Analyst", "Designer"],
            &["Sysops"],
        ),
    ]
}
