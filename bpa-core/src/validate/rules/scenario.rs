use std::collections::HashMap;

use crate::types::Step;
use crate::validate::rules::step;
use crate::validate::validator::Validator;

pub(crate) fn validate_header(v: &mut Validator, name: &str, tags: &[String]) {
    if name.trim().is_empty() {
        v.push("$.name", "must not be empty");
    }
    validate_tags(v, tags);
}

pub(crate) fn validate_tags(v: &mut Validator, tags: &[String]) {
    for (idx, tag) in tags.iter().enumerate() {
        if tag.trim().is_empty() {
            v.push(format!("$.tags[{idx}]"), "must not be empty");
        }
    }
}

pub(crate) fn validate_steps(v: &mut Validator, steps: &[Step]) {
    let mut seen = HashMap::<i64, usize>::new();
    for (idx, s) in steps.iter().enumerate() {
        let spath = format!("$.steps[{idx}]");
        if let Some(first) = seen.insert(s.order, idx) {
            v.push(
                format!("{spath}.order"),
                format!("order {} is already used by $.steps[{first}]", s.order),
            );
        }
        step::validate_step(v, s, &spath);
    }
}
