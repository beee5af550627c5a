//! Recover span nesting from the flat event sequence.
//!
//! Thread-scoped spans (`B`/`E` pairs and `X` complete events) nest like a
//! call stack. Walking each thread in timestamp order with a scoped stack
//! (push on begin, pop on the matching end or once a complete event has
//! finished) gives every event its immediate parent, plus a duration for
//! `B` events once their `E` is seen.
//!
//! Example, one thread:
//! ```text
//! FunctionCall  |-------------------|
//! Layout              |-----|
//! ```
//! `Layout`'s parent is `FunctionCall`.

use crate::parser::{Phase, TraceEvent};
use log::debug;
use std::collections::BTreeMap;

/// Parent links and recovered durations, indexed like the event slice
///
/// **Public** - consumed by the metric aggregators
#[derive(Debug, Clone, Default)]
pub struct SpanTree {
    parents: Vec<Option<usize>>,
    durations: Vec<Option<f64>>,
}

impl SpanTree {
    /// Index of the innermost span enclosing event `index` on its thread
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.parents.get(index).copied().flatten()
    }

    /// Duration in microseconds: `dur` for complete events, `E - B` for
    /// matched begin events, `None` for everything else
    pub fn duration_of(&self, index: usize) -> Option<f64> {
        self.durations.get(index).copied().flatten()
    }

}

/// A span still open on the walk stack
struct OpenSpan {
    index: usize,
    /// `None` for `B` events: open until the matching `E`
    end: Option<f64>,
}

/// Build the span tree for a timestamp sorted event slice
///
/// **Public** - main entry point for nesting recovery
///
/// # Algorithm
/// 1. Group event indices by `(pid, tid)`
/// 2. Within a thread, order by timestamp; at equal timestamps the longer
///    complete event goes first so it becomes the parent
/// 3. Walk with a scoped stack, recording the top of stack as each
///    event's parent
pub fn build_span_tree(events: &[TraceEvent]) -> SpanTree {
    let mut tree = SpanTree {
        parents: vec![None; events.len()],
        durations: events.iter().map(TraceEvent::duration_micros).collect(),
    };

    let mut threads: BTreeMap<(Option<u64>, u64), Vec<usize>> = BTreeMap::new();
    for (index, event) in events.iter().enumerate() {
        if is_thread_scoped(&event.phase) {
            threads.entry((event.pid, event.tid)).or_default().push(index);
        }
    }

    for order in threads.values_mut() {
        order.sort_by(|&a, &b| {
            let (ea, eb) = (&events[a], &events[b]);
            ea.ts.total_cmp(&eb.ts).then_with(|| {
                let len_a = ea.duration_micros().unwrap_or(0.0);
                let len_b = eb.duration_micros().unwrap_or(0.0);
                len_b.total_cmp(&len_a)
            })
        });
        walk_thread(events, order, &mut tree);
    }

    tree
}

fn is_thread_scoped(phase: &Phase) -> bool {
    matches!(
        phase,
        Phase::Begin | Phase::End | Phase::Complete | Phase::Instant
    )
}

/// Scoped-stack walk over one thread
///
/// **Private** - internal helper for build_span_tree
fn walk_thread(events: &[TraceEvent], order: &[usize], tree: &mut SpanTree) {
    let mut stack: Vec<OpenSpan> = Vec::new();

    for &index in order {
        let event = &events[index];

        match event.phase {
            Phase::Complete => {
                pop_finished(&mut stack, event.ts);
                tree.parents[index] = stack.last().map(|s| s.index);
                stack.push(OpenSpan {
                    index,
                    end: Some(event.end_micros()),
                });
            }
            Phase::Begin => {
                pop_finished(&mut stack, event.ts);
                tree.parents[index] = stack.last().map(|s| s.index);
                stack.push(OpenSpan { index, end: None });
            }
            Phase::End => {
                // An unnamed E closes the innermost B; a named one looks for its B
                let matching = stack.iter().rposition(|s| {
                    s.end.is_none() && (event.name.is_empty() || events[s.index].name == event.name)
                });
                match matching {
                    Some(pos) => {
                        let begin = stack[pos].index;
                        tree.durations[begin] = Some((event.ts - events[begin].ts).max(0.0));
                        stack.truncate(pos);
                    }
                    None => debug!(
                        "Unmatched end event '{}' at {} on thread {}",
                        event.name, event.ts, event.tid
                    ),
                }
            }
            Phase::Instant => {
                pop_finished(&mut stack, event.ts);
                tree.parents[index] = stack.last().map(|s| s.index);
            }
            _ => {}
        }
    }
}

/// Drop complete events that ended at or before `ts`
fn pop_finished(stack: &mut Vec<OpenSpan>, ts: f64) {
    while let Some(top) = stack.last() {
        match top.end {
            Some(end) if end <= ts => {
                stack.pop();
            }
            _ => break,
        }
    }
}
