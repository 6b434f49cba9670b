use self::transition::{Dependencies, Error, Index};

pub mod transition;

/// Heads over `num_tokens + 1` positions, position 0 being a virtual root
/// that governs every token without a gold head.
fn rooted_heads(num_tokens: usize, gold: &Dependencies) -> Vec<i32> {
    let mut heads = vec![0; num_tokens + 1];
    for (i, head) in heads.iter_mut().enumerate().skip(1) {
        *head = gold
            .head((i - 1) as Index)
            .map(|h| h as i32 + 1)
            .unwrap_or(0);
    }
    heads
}

/// Returns true if no two arcs of `gold` cross, counting arcs from the
/// virtual root to every token without a head.
pub fn is_projective(num_tokens: usize, gold: &Dependencies) -> bool {
    let heads = rooted_heads(num_tokens, gold);
    let spans: Vec<(i32, i32)> = heads
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &head)| ((i as i32).min(head), (i as i32).max(head)))
        .collect();
    for (k, &(l1, r1)) in spans.iter().enumerate() {
        for &(l2, r2) in &spans[k + 1..] {
            if (l1 < l2 && l2 < r1 && r1 < r2) || (l2 < l1 && l1 < r2 && r2 < r1) {
                return false;
            }
        }
    }
    true
}

/// Projectivizes a dependency tree by repeatedly lifting the deepest crossing
/// arc to the grandparent. Tokens lifted onto the virtual root lose their head.
///
/// References:
/// - https://github.com/tensorflow/models/blob/7d30a017fe50b648be6dee544f8059bde52db562/syntaxnet/syntaxnet/document_filters.cc#L296
pub fn projectivize(num_tokens: usize, gold: &Dependencies) -> Result<Dependencies, Error> {
    gold.validate(num_tokens)?;
    let mut heads = rooted_heads(num_tokens, gold);
    let num_positions = heads.len();
    let mut left: Vec<i32> = vec![-1; num_positions];
    let mut right: Vec<i32> = vec![-1; num_positions];
    loop {
        for i in 0..num_positions {
            left[i] = -1;
            right[i] = num_positions as i32;
        }

        for (i, head) in heads.iter().enumerate() {
            let l = (i as i32).min(*head);
            let r = (i as i32).max(*head);
            for j in (l + 1)..r {
                let j = j as usize;
                if left[j] < l {
                    left[j] = l;
                }
                if right[j] > r {
                    right[j] = r;
                }
            }
        }

        let mut deepest_arc = -1;
        let mut max_depth = 0;
        for (i, head) in heads.iter().enumerate() {
            if *head == 0 {
                continue;
            }
            let l = (i as i32).min(*head);
            let r = (i as i32).max(*head);
            let left_bound = left[l as usize].max(left[r as usize]);
            let right_bound = right[l as usize].min(right[r as usize]);

            if l < left_bound || r > right_bound {
                let mut depth = 0;
                let mut j = i;
                while j != 0 {
                    depth += 1;
                    j = heads[j] as usize;
                }
                if depth > max_depth {
                    deepest_arc = i as i32;
                    max_depth = depth;
                }
            }
        }

        if deepest_arc == -1 {
            return Ok(heads
                .iter()
                .enumerate()
                .skip(1)
                .filter(|&(_, &head)| head != 0)
                .map(|(i, &head)| ((i - 1) as Index, (head - 1) as Index))
                .collect());
        }

        let lifted_head = heads[heads[deepest_arc as usize] as usize];
        heads[deepest_arc as usize] = lifted_head;
    }
}
