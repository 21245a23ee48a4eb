use crate::formula::Valuation;
use std::convert::TryFrom;
use std::iter::FusedIterator;

/// Most variables [`valuations`] can count through with its u64 counter.
pub const MAX_VARIABLES: usize = 63;

/// Every valuation over `variables`, in a fixed order.
///
/// The `i`-th valuation (counting from zero) gives `variables[k]` the value of
/// bit `k` of `i`, so the first one is all-false and the last one all-true.
/// Panics with more than [`MAX_VARIABLES`] variables.
pub fn valuations(variables: &[String]) -> Valuations<'_> {
    assert!(
        variables.len() <= MAX_VARIABLES,
        "cannot enumerate {} variables",
        variables.len()
    );
    Valuations {
        variables,
        next: 0,
        end: 1u64 << variables.len(),
    }
}

#[derive(Clone, Debug)]
pub struct Valuations<'a> {
    variables: &'a [String],
    next: u64,
    end: u64,
}

fn assignment_for(assignment: u64, x: usize) -> bool {
    assignment & (1 << x) != 0
}

impl Iterator for Valuations<'_> {
    type Item = Valuation;

    fn next(&mut self) -> Option<Valuation> {
        if self.next == self.end {
            return None;
        }
        let assignment = self.next;
        self.next += 1;
        Some(
            self.variables
                .iter()
                .enumerate()
                .map(|(x, name)| (name.clone(), assignment_for(assignment, x)))
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl ExactSizeIterator for Valuations<'_> {}

impl FusedIterator for Valuations<'_> {}
