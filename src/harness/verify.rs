use std::fmt::Debug;

/// Records oracle mismatches without aborting the run.
#[derive(Debug, Default)]
pub struct Verifier {
    checks: usize,
    failures: Vec<String>,
}

impl Verifier {
    /// Fresh verifier with no checks recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `condition`; logs and counts a failure when it is false.
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.checks += 1;
        if !condition {
            log::error!("check failed: {what}");
            self.failures.push(what.to_owned());
        }
        condition
    }

    /// Record `actual == expected`.
    pub fn check_eq<T: PartialEq + Debug>(
        &mut self,
        actual: &T,
        expected: &T,
        what: &str,
    ) -> bool {
        if actual == expected {
            self.check(true, what)
        } else {
            self.check(
                false,
                &format!("{what}: expected {expected:?}, got {actual:?}"),
            )
        }
    }

    /// Number of checks run.
    #[must_use]
    pub fn checks(&self) -> usize {
        self.checks
    }

    /// Failure messages in the order they occurred.
    #[must_use]
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Whether every check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_counted_not_fatal() {
        let mut v = Verifier::new();
        assert!(v.check(true, "fine"));
        assert!(!v.check_eq(&1, &2, "numbers"));
        assert!(!v.check(false, "second"));
        assert_eq!(v.checks(), 3);
        assert_eq!(v.failures().len(), 2);
        assert!(v.failures()[0].contains("expected 2, got 1"));
        assert!(!v.passed());
    }
}
