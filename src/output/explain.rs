//! Explain output formatter for human-readable display
//!
//! This module provides:
//! - Listing of every direct change with its reasons
//! - A tree of dependents rooted at each directly changed identifier
//!
//! In module-prefix mode a changed module's imported sub-packages hang
//! directly under it, ahead of its own dependents.
//!
//! Import graphs can be deep, so the tree is built and printed with explicit
//! stacks. A visited set keeps each identifier to a single node in the whole
//! forest, which also cuts import cycles.

use crate::domain::Report;
use crate::impact::{PropagationMode, ReverseGraph};
use crate::output::ReportFormatter;
use colored::Colorize;
use std::collections::HashSet;
use std::io::Write;

/// Explain formatter
#[derive(Debug)]
pub struct ExplainFormatter {
    /// Whether to highlight directly changed identifiers
    color: bool,
}

/// Arena node of the dependent forest
#[derive(Debug)]
struct TreeNode {
    id: String,
    children: Vec<usize>,
}

/// Dependent forest, nodes stored by index
#[derive(Debug, Default)]
struct Forest {
    nodes: Vec<TreeNode>,
    roots: Vec<usize>,
}

/// Walk state of one node on the build stack
struct Frame {
    index: usize,
    /// Next child to visit, counting `expansion` first
    cursor: usize,
    /// Sub-package paths matched by a root; empty below the roots
    expansion: Vec<String>,
}

impl Forest {
    /// Depth-first forest over `graph`, one root per identifier in `roots`
    /// not already reached from an earlier root. `mode` decides which
    /// sub-package paths a root matches, as in `ReverseGraph::propagate`.
    fn build<'a, I>(graph: &ReverseGraph, roots: I, mode: PropagationMode) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut forest = Forest::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack: Vec<Frame> = Vec::new();

        for root in roots {
            if !visited.insert(root.to_string()) {
                continue;
            }
            let index = forest.push(root.to_string());
            forest.roots.push(index);
            stack.push(Frame {
                index,
                cursor: 0,
                expansion: graph
                    .seed_expansion(root, mode)
                    .into_iter()
                    .cloned()
                    .collect(),
            });

            while let Some(top) = stack.last_mut() {
                let index = top.index;
                let child_id = match top.expansion.get(top.cursor) {
                    Some(path) => path.clone(),
                    None => {
                        let dependents = graph.dependents(&forest.nodes[index].id);
                        match dependents.get(top.cursor - top.expansion.len()) {
                            Some(dependent) => dependent.clone(),
                            None => {
                                stack.pop();
                                continue;
                            }
                        }
                    }
                };
                top.cursor += 1;

                if visited.insert(child_id.clone()) {
                    let child = forest.push(child_id);
                    forest.nodes[index].children.push(child);
                    stack.push(Frame {
                        index: child,
                        cursor: 0,
                        expansion: Vec::new(),
                    });
                }
            }
        }

        forest
    }

    fn push(&mut self, id: String) -> usize {
        self.nodes.push(TreeNode {
            id,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }
}

impl ExplainFormatter {
    /// Create a new explain formatter
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn write_changes(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "Direct changes detected:")?;

        for record in report.changes.records() {
            writeln!(writer, "- {}", record.id)?;
            writeln!(writer, "  Reasons:")?;
            for reason in &record.reasons {
                writeln!(writer, "  - {}", reason)?;
            }
        }

        Ok(())
    }

    fn write_tree(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "Dependency tree of affected packages:")?;

        let graph = ReverseGraph::build(&report.units);
        let forest = Forest::build(&graph, report.changes.ids(), report.propagation);

        // (node index, line prefix, last among siblings)
        let mut stack: Vec<(usize, String, bool)> = Vec::new();
        let root_count = forest.roots.len();
        for (i, &root) in forest.roots.iter().enumerate().rev() {
            stack.push((root, String::new(), i + 1 == root_count));
        }

        while let Some((index, prefix, is_last)) = stack.pop() {
            let node = &forest.nodes[index];
            let connector = if is_last { "└──" } else { "├──" };

            if self.color && report.changes.contains(&node.id) {
                writeln!(writer, "{}{} {}", prefix, connector, node.id.green())?;
            } else {
                writeln!(writer, "{}{} {}", prefix, connector, node.id)?;
            }

            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            let child_count = node.children.len();
            for (i, &child) in node.children.iter().enumerate().rev() {
                stack.push((child, child_prefix.clone(), i + 1 == child_count));
            }
        }

        Ok(())
    }
}

impl ReportFormatter for ExplainFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        self.write_changes(report, writer)?;

        writeln!(writer)?;
        writeln!(writer)?;

        self.write_tree(report, writer)
    }
}
