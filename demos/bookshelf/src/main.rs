mod catalog;
mod print;

use anyhow::{Context, Result};
use catalog::{Author, Book, Department, Employee, Genre, Job, Published, Title};
use clap::{Parser, Subcommand};
use multikey::{Accessor, Element, KeyComponent, KeyComponentProfile, OrderedSet};
use std::io::{self, Write};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(about = "Walks through composite-key ordered sets of books and employees")]
#[command(version)]
struct Cli {
    /// Log library events to stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// After each listing, print the set's structure report and every index entry
    #[arg(long, global = true)]
    dump: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Books ordered by title
    ByTitle,

    /// Books ordered by author, then title
    ByAuthor,

    /// Books by genre, newest to oldest, followed by the genre list
    NewestFirst,

    /// Employees by department and job, then by job and department
    Employees,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(match cli.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        })
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::ByTitle => by_title(&mut out, cli.dump),
        Command::ByAuthor => by_author(&mut out, cli.dump),
        Command::NewestFirst => newest_first(&mut out, cli.dump),
        Command::Employees => employees(&mut out, cli.dump),
    }
}

fn by_title(out: &mut impl Write, dump: bool) -> Result<()> {
    let title = KeyComponentProfile::<Book>::ordered::<Title>().discover()?;
    let books = OrderedSet::builder()
        .name("books by title")
        .profile(title)
        .values(catalog::books())
        .build()?;

    writeln!(out, "\n========\nBooks ordered by TITLE\n========")?;
    print::hierarchically(out, &books)?;
    report(out, &books, dump)
}

fn by_author(out: &mut impl Write, dump: bool) -> Result<()> {
    let author = KeyComponentProfile::<Book>::ordered::<Author>().discover()?;
    let title = KeyComponentProfile::<Book>::ordered::<Title>().discover()?;

    let mut books = OrderedSet::builder()
        .name("books by author and title")
        .profiles([author.clone(), title])
        .build()?;
    books.extend_from(catalog::books())?;

    writeln!(out, "\n========\nBooks ordered by AUTHOR and TITLE\n========")?;
    print::hierarchically(out, &books)?;

    let twain = KeyComponent::new(Author {
        last: "Twain",
        first: "Mark",
    });
    print::listing(out, "Books by Mark Twain", books.values_for(&twain)?)?;
    print::listing(out, "Author listing", books.key_component_set(&author)?.iter())?;
    report(out, &books, dump)
}

fn newest_first(out: &mut impl Write, dump: bool) -> Result<()> {
    let genre = KeyComponentProfile::<Book>::ordered::<Genre>().discover()?;

    // Books also carry a revision date; order by first publication only.
    let published = KeyComponentProfile::<Book>::ordered::<Published>()
        .comparator("newest first", |a: &Published, b: &Published| b.cmp(a))
        .accessor(Accessor::scalar("published", |book: &Book| book.published))
        .build()
        .context("building the publication date profile")?;

    let title = KeyComponentProfile::<Book>::ordered::<Title>().discover()?;

    let books = OrderedSet::builder()
        .name("books by genre, newest first")
        .profiles([genre.clone(), published, title])
        .values(catalog::books())
        .build()?;

    writeln!(out, "\n========\nBooks by GENRE, listed NEWEST to OLDEST\n========")?;
    print::hierarchically(out, &books)?;
    print::listing(out, "GENRE list", books.key_component_set(&genre)?.iter())?;
    report(out, &books, dump)
}

fn employees(out: &mut impl Write, dump: bool) -> Result<()> {
    let department = KeyComponentProfile::<Employee>::ordered::<Department>().discover()?;
    let job = KeyComponentProfile::<Employee>::ordered::<Job>().discover()?;

    let by_department = OrderedSet::with_values(
        catalog::employees(),
        [department.clone(), job.clone()],
    )?;
    writeln!(out, "\n========\nEmployees by DEPARTMENT and JOB\n========")?;
    print::hierarchically(out, &by_department)?;
    report(out, &by_department, dump)?;

    let by_job =
        OrderedSet::with_values(catalog::employees(), [job.clone(), department.clone()])?;
    writeln!(out, "\n========\nEmployees by JOB and DEPARTMENT\n========")?;
    print::hierarchically(out, &by_job)?;

    // profiles are interchangeable across sets
    print::listing(
        out,
        "Department listing",
        by_job.key_component_set(&department)?.iter(),
    )?;
    print::listing(out, "Job listing", by_job.key_component_set(&job)?.iter())?;
    report(out, &by_job, dump)
}

fn report<V: Element>(out: &mut impl Write, set: &OrderedSet<V>, dump: bool) -> Result<()> {
    if dump {
        write!(out, "{set}")?;
        write!(out, "{}", set.dump())?;
    }
    Ok(())
}
