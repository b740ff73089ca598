mod rules;
mod validator;

use crate::error::ValidationError;
use crate::types::{Scenario, ScenarioDraft, ScenarioPatch, Variable};
use validator::Validator;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for ScenarioDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_draft(self)
    }
}

impl Validate for Scenario {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        rules::scenario::validate_header(&mut v, &self.name, &self.tags);
        rules::scenario::validate_steps(&mut v, &self.steps);
        v.finish()
    }
}

impl Validate for ScenarioPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            rules::scenario::validate_header(&mut v, name, self.tags.as_deref().unwrap_or(&[]));
        } else if let Some(tags) = &self.tags {
            rules::scenario::validate_tags(&mut v, tags);
        }
        if let Some(steps) = &self.steps {
            rules::scenario::validate_steps(&mut v, steps);
        }
        v.finish()
    }
}

impl Validate for Variable {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        rules::variable::validate_name(&mut v, &self.name);
        v.finish()
    }
}

pub fn validate_draft(draft: &ScenarioDraft) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    rules::scenario::validate_header(&mut v, &draft.name, &draft.tags);
    rules::scenario::validate_steps(&mut v, &draft.steps);
    v.finish()
}
