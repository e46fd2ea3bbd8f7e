// src/output/join.rs

//! Post-run aggregation for join mode.
//!
//! Hosts are partitioned into equivalence classes over their captured
//! output bytes. Class identifiers follow first occurrence in host-list
//! order, so the report is deterministic for a fixed host list regardless
//! of the order in which children finished.

use crate::hosts::Host;

use super::Colors;

/// Assign an output class to every host and return the number of classes.
///
/// Quadratic over the host list, which is fine for the list sizes a single
/// run sees; outputs are compared byte-for-byte.
pub fn assign_classes(hosts: &mut [Host]) -> usize {
    let mut next_id = 0;

    for h1 in 0..hosts.len() {
        if hosts[h1].output_class.is_some() {
            continue;
        }
        hosts[h1].output_class = Some(next_id);

        let (head, tail) = hosts.split_at_mut(h1 + 1);
        let needle = head[h1].output.as_deref().unwrap_or_default();

        for other in tail.iter_mut() {
            if other.output_class.is_none()
                && other.output.as_deref().unwrap_or_default() == needle
            {
                other.output_class = Some(next_id);
            }
        }

        next_id += 1;
    }

    next_id
}

/// Render the final join report.
///
/// One block per class: the member hosts in list order, the class output
/// (newline-appended if it lacks one), and a blank line.
pub fn render_report(hosts: &[Host], num_classes: usize, colors: &Colors) -> Vec<u8> {
    let c = colors;
    let total = hosts.len();
    let mut out = Vec::new();

    out.extend_from_slice(
        format!(
            "finished with {}{}{} unique result(s)\n",
            c.important, num_classes, c.reset
        )
        .as_bytes(),
    );

    for class in 0..num_classes {
        let members: Vec<&Host> = hosts
            .iter()
            .filter(|h| h.output_class == Some(class))
            .collect();

        out.extend_from_slice(
            format!("hosts ({}{}{}/{}): ", c.important, members.len(), c.reset, total)
                .as_bytes(),
        );
        for (i, h) in members.iter().enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            out.extend_from_slice(
                format!("{}{}{}", c.host, h.name, c.reset).as_bytes(),
            );
        }
        out.push(b'\n');

        let body = members
            .first()
            .and_then(|h| h.output.as_deref())
            .unwrap_or_default();
        out.extend_from_slice(body);
        if body.last() != Some(&b'\n') {
            out.push(b'\n');
        }
        out.push(b'\n');
    }

    out
}
