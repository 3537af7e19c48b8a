//! Structural validation for piece automatons.
//!
//! Checks the invariants the scanner relies on: consistent parent/child
//! edges, suffix links that strictly reduce depth, dictionary links that
//! land on terminals, and in-range piece ids. Lazily computed link slots
//! may legitimately still be empty; only populated slots are checked.
//! Intended for tests and diagnostics, not the hot path.

use crate::automaton::{PieceAutomaton, ROOT};

/// Validation outcome with errors, warnings, and statistics.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Critical invariant violations; a correct build never produces any.
    pub errors: Vec<String>,
    /// Non-fatal observations.
    pub warnings: Vec<String>,
    /// Statistics gathered during validation.
    pub stats: AutomatonStats,
}

impl ValidationResult {
    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Statistics gathered while walking the automaton.
#[derive(Debug, Clone, Default)]
pub struct AutomatonStats {
    /// Number of nodes, root included
    pub node_count: usize,
    /// Number of terminal nodes
    pub terminal_count: usize,
    /// Suffix link slots populated so far
    pub suffix_links_resolved: usize,
    /// Dictionary link slots populated so far
    pub dict_links_resolved: usize,
    /// Goto cache entries populated so far
    pub goto_entries_resolved: usize,
}

/// Validates the automaton's structure.
pub fn validate_automaton(automaton: &PieceAutomaton) -> ValidationResult {
    let nodes = &automaton.nodes;
    let piece_count = automaton.piece_count();
    let mut result = ValidationResult {
        errors: Vec::new(),
        warnings: Vec::new(),
        stats: AutomatonStats {
            node_count: nodes.len(),
            ..AutomatonStats::default()
        },
    };

    // Depths via BFS over the owning child edges; also detects orphans.
    let mut depth = vec![usize::MAX; nodes.len()];
    depth[ROOT as usize] = 0;
    let mut queue = vec![ROOT];
    while let Some(id) = queue.pop() {
        for child in nodes[id as usize].children.iter().flatten() {
            if depth[*child as usize] == usize::MAX {
                depth[*child as usize] = depth[id as usize] + 1;
                queue.push(*child);
            }
        }
    }
    let orphans = depth.iter().filter(|&&d| d == usize::MAX).count();
    if orphans > 0 {
        result
            .errors
            .push(format!("{orphans} nodes unreachable from the root"));
    }

    for (id, node) in nodes.iter().enumerate() {
        // Parent back-reference must mirror the owning child edge.
        match node.parent {
            None => {
                if id != ROOT as usize {
                    result.errors.push(format!("node {id} has no parent"));
                }
            }
            Some((parent, sym)) => {
                if id == ROOT as usize {
                    result.errors.push("root has a parent".to_string());
                } else if nodes
                    .get(parent as usize)
                    .and_then(|p| p.children.get(sym as usize))
                    .copied()
                    .flatten()
                    != Some(id as u32)
                {
                    result.errors.push(format!(
                        "node {id} claims parent {parent} via symbol {sym}, but the edge disagrees"
                    ));
                }
            }
        }

        if let Some(suffix) = node.suffix {
            result.stats.suffix_links_resolved += 1;
            if id != ROOT as usize
                && depth[suffix as usize] != usize::MAX
                && depth[id] != usize::MAX
                && depth[suffix as usize] >= depth[id]
            {
                result.errors.push(format!(
                    "suffix link of node {id} does not reduce depth ({} -> {})",
                    depth[id], depth[suffix as usize]
                ));
            }
        }

        if let Some(dict) = node.dict {
            result.stats.dict_links_resolved += 1;
            if dict != ROOT && !nodes[dict as usize].terminal {
                result.errors.push(format!(
                    "dictionary link of node {id} points at non-terminal node {dict}"
                ));
            }
        }

        result.stats.goto_entries_resolved += node.goto_cache.iter().flatten().count();

        if node.terminal {
            result.stats.terminal_count += 1;
            if node.piece_ids.is_empty() {
                result
                    .errors
                    .push(format!("terminal node {id} has no piece ids"));
            }
        } else if !node.piece_ids.is_empty() {
            result
                .errors
                .push(format!("non-terminal node {id} carries piece ids"));
        }

        for &piece_id in &node.piece_ids {
            if piece_id as usize >= piece_count {
                result.errors.push(format!(
                    "node {id} references piece id {piece_id} out of range (max {piece_count})"
                ));
            }
        }
    }

    if result.stats.terminal_count == 0 && piece_count > 0 {
        result
            .warnings
            .push("no terminal nodes despite a non-empty piece list".to_string());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::MaskQuery;

    fn automaton_for(mask: &str) -> PieceAutomaton {
        let query = MaskQuery::parse(mask).unwrap();
        PieceAutomaton::build(&query).unwrap()
    }

    #[test]
    fn test_fresh_automaton_is_valid() {
        let automaton = automaton_for("ab?cd?b");
        let result = validate_automaton(&automaton);
        assert!(result.is_valid(), "errors: {:?}", result.errors);
        assert_eq!(result.stats.terminal_count, 3);
        // Only the preset root links exist before any scan.
        assert_eq!(result.stats.suffix_links_resolved, 1);
        assert_eq!(result.stats.dict_links_resolved, 1);
    }

    #[test]
    fn test_scanned_automaton_stays_valid() {
        let automaton = {
            let mut automaton = automaton_for("ab?b");
            let mut scanner = automaton.scanner();
            for &byte in b"ababbabb" {
                scanner.advance(byte).unwrap();
            }
            scanner.finish();
            automaton
        };
        let result = validate_automaton(&automaton);
        assert!(result.is_valid(), "errors: {:?}", result.errors);
        assert!(result.stats.suffix_links_resolved > 1);
        assert!(result.stats.goto_entries_resolved > 0);
    }

    #[test]
    fn test_zero_piece_automaton_is_valid() {
        let automaton = automaton_for("??");
        let result = validate_automaton(&automaton);
        assert!(result.is_valid(), "errors: {:?}", result.errors);
        assert_eq!(result.stats.node_count, 1);
        assert_eq!(result.stats.terminal_count, 0);
        assert!(result.warnings.is_empty());
    }
}
