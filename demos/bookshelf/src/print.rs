use multikey::{Element, KeyComponent, OrderedSet};
use std::io::{self, Write};

const TAB: &str = "     ";

/// Prints every entry of `set` as an indented outline, one level per key
/// component. Components shared with the previous entry are not repeated.
pub fn hierarchically<V: Element>(out: &mut impl Write, set: &OrderedSet<V>) -> io::Result<()> {
    let mut previous: Vec<KeyComponent> = vec![];

    for entry in set.entries() {
        let key = entry.key();
        let shared = key
            .iter()
            .zip(&previous)
            .take_while(|(component, earlier)| component == earlier)
            .count();

        for (depth, component) in key.iter().enumerate().skip(shared) {
            writeln!(out, "{}{component:?}", TAB.repeat(depth))?;
        }

        previous = key.to_vec();
    }

    writeln!(out, "===============")
}

/// Prints a heading followed by every item, one per line.
pub fn listing<T: std::fmt::Debug>(
    out: &mut impl Write,
    heading: &str,
    items: impl IntoIterator<Item = T>,
) -> io::Result<()> {
    writeln!(out, "{heading}\n===============")?;
    for item in items {
        writeln!(out, "{item:?}")?;
    }
    writeln!(out, "===============")
}
