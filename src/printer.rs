//! The `-ast`/`-st` tree dump: each node's label on its own line,
//! pre-order, with a depth-indicating prefix of one `.` per level --
//! the format RPAL implementations have traditionally used, rather
//! than the box-drawing style of a general-purpose tree-printing
//! crate.

use std::io::{self, Write};

use crate::common::span::Spanned;
use crate::construct::ast::Node;
use crate::construct::tree::Standardized;

const MARKER: &str = ".";

/// Prints the pre-standardization AST as indented pre-order.
pub fn print_ast<W: Write>(root: &Spanned<Node>, out: &mut W) -> io::Result<()> {
    fn go<W: Write>(node: &Spanned<Node>, depth: usize, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}{}", MARKER.repeat(depth), node.item.label())?;
        for child in node.item.children() {
            go(child, depth + 1, out)?;
        }
        Ok(())
    }
    go(root, 0, out)
}

/// Prints the standardized core tree the same way, after standardization.
pub fn print_standardized<W: Write>(root: &Spanned<Standardized>, out: &mut W) -> io::Result<()> {
    fn go<W: Write>(node: &Spanned<Standardized>, depth: usize, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}{}", MARKER.repeat(depth), node.item.label())?;
        for child in node.item.children() {
            go(child, depth + 1, out)?;
        }
        Ok(())
    }
    go(root, 0, out)
}
