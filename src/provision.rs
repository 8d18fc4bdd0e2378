use tracing::{debug, trace};

use crate::domain::FltError;

/// Isolated rendering scope owned by a single component. Provisioning fills
/// it with style assets before the component becomes interactive; the UI
/// layer reads the styles back when drawing that component's output.
#[derive(Debug, Default)]
pub struct Scope {
    styles: Vec<String>,
}

impl Scope {
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    pub fn add_style(&mut self, style: impl Into<String>) {
        self.styles.push(style.into());
    }
}

/// Resource acquisition a component runs once at attach time. An `Err`
/// is fatal to that instance: it never becomes interactive and no retry
/// is attempted.
pub trait ResourceProvisioner {
    fn provision(&self, scope: &mut Scope) -> Result<(), FltError>;
}

type Step = Box<dyn Fn(&mut Scope) -> Result<(), FltError>>;

/// Injects styles, then runs an ordered list of steps one at a time. Each
/// step starts only after the previous one succeeded; the first failure
/// aborts the remainder. Style injection itself is non-gating.
#[derive(Default)]
pub struct SequentialProvisioner {
    styles: Vec<String>,
    steps: Vec<(String, Step)>,
}

impl SequentialProvisioner {
    pub fn new(styles: Vec<String>) -> Self {
        SequentialProvisioner {
            styles,
            steps: Vec::new(),
        }
    }

    pub fn with_step(
        mut self,
        name: impl Into<String>,
        step: impl Fn(&mut Scope) -> Result<(), FltError> + 'static,
    ) -> Self {
        self.steps.push((name.into(), Box::new(step)));
        self
    }
}

impl ResourceProvisioner for SequentialProvisioner {
    fn provision(&self, scope: &mut Scope) -> Result<(), FltError> {
        for style in &self.styles {
            scope.add_style(style.clone());
        }
        for (name, step) in &self.steps {
            trace!("provisioning step \"{name}\"");
            if let Err(err) = step(scope) {
                debug!("provisioning step \"{name}\" failed: {err:?}");
                return Err(FltError::Provision(format!("step \"{name}\" failed")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn steps_run_in_order() {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (ran.clone(), ran.clone());
        let provisioner = SequentialProvisioner::new(vec![])
            .with_step("first", move |_| {
                a.borrow_mut().push("first");
                Ok(())
            })
            .with_step("second", move |_| {
                b.borrow_mut().push("second");
                Ok(())
            });

        let mut scope = Scope::default();
        provisioner.provision(&mut scope).unwrap();
        assert_eq!(*ran.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn first_failure_aborts_the_rest() {
        let ran = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (ran.clone(), ran.clone());
        let provisioner = SequentialProvisioner::new(vec![])
            .with_step("first", move |_| {
                a.borrow_mut().push("first");
                Err(FltError::Provision("boom".into()))
            })
            .with_step("second", move |_| {
                b.borrow_mut().push("second");
                Ok(())
            });

        let mut scope = Scope::default();
        assert!(provisioner.provision(&mut scope).is_err());
        assert_eq!(*ran.borrow(), vec!["first"]);
    }

    #[test]
    fn styles_land_in_the_scope() {
        let provisioner = SequentialProvisioner::new(vec!["mark=yellow".into()]);
        let mut scope = Scope::default();
        provisioner.provision(&mut scope).unwrap();
        assert_eq!(scope.styles(), ["mark=yellow".to_string()]);
    }
}
