//! Collision-free label naming for one translation run.

use std::collections::HashMap;

/// Kinds of compiler-generated labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelKind {
    EqTrue,
    EqEnd,
    GtTrue,
    GtEnd,
    LtTrue,
    LtEnd,
    Return,
    Halt,
}

impl LabelKind {
    fn tag(self) -> &'static str {
        match self {
            LabelKind::EqTrue => "EQ_TRUE",
            LabelKind::EqEnd => "EQ_END",
            LabelKind::GtTrue => "GT_TRUE",
            LabelKind::GtEnd => "GT_END",
            LabelKind::LtTrue => "LT_TRUE",
            LabelKind::LtEnd => "LT_END",
            LabelKind::Return => "RET",
            LabelKind::Halt => "HALT",
        }
    }
}

/// Anonymous labels come from one run-wide counter and render as
/// `__{KIND}_{n}`. Function entries render as `{name}__{n}`, where `n`
/// is fixed the first time the name is looked up, whether that lookup
/// comes from the declaration or from a call site.
#[derive(Clone, Debug, Default)]
pub struct LabelManager {
    next_anonymous: u32,
    next_function: u32,
    functions: HashMap<String, u32>,
}

impl LabelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A label no other call has returned in this run.
    pub fn fresh(&mut self, kind: LabelKind) -> String {
        let n = self.next_anonymous;
        self.next_anonymous += 1;
        format!("__{}_{}", kind.tag(), n)
    }

    /// Stable number for `name`, assigned on first lookup.
    pub fn function_number(&mut self, name: &str) -> u32 {
        if let Some(&n) = self.functions.get(name) {
            return n;
        }
        let n = self.next_function;
        self.next_function += 1;
        self.functions.insert(name.to_string(), n);
        n
    }

    /// Entry label for `name`; identical for every lookup in a run.
    pub fn function_label(&mut self, name: &str) -> String {
        let n = self.function_number(name);
        format!("{}__{}", name, n)
    }

    /// Anonymous labels handed out so far.
    pub fn anonymous_count(&self) -> u32 {
        self.next_anonymous
    }

    /// Distinct function names seen so far.
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fresh_labels_are_unique() {
        let mut labels = LabelManager::new();
        let mut seen = HashSet::new();
        for _ in 0..50 {
            for kind in [LabelKind::EqTrue, LabelKind::EqEnd, LabelKind::Return] {
                assert!(seen.insert(labels.fresh(kind)));
            }
        }
        assert_eq!(labels.anonymous_count(), 150);
    }

    #[test]
    fn test_fresh_label_format() {
        let mut labels = LabelManager::new();
        assert_eq!(labels.fresh(LabelKind::GtTrue), "__GT_TRUE_0");
        assert_eq!(labels.fresh(LabelKind::GtEnd), "__GT_END_1");
        assert_eq!(labels.fresh(LabelKind::Return), "__RET_2");
    }

    #[test]
    fn test_function_lookup_is_idempotent() {
        let mut labels = LabelManager::new();
        let call_site = labels.function_label("Main.fib");
        labels.fresh(LabelKind::Return);
        let other = labels.function_label("Sys.init");
        let decl = labels.function_label("Main.fib");
        assert_eq!(call_site, decl);
        assert_eq!(call_site, "Main.fib__0");
        assert_eq!(other, "Sys.init__1");
        assert_eq!(labels.function_count(), 2);
    }

    #[test]
    fn test_function_labels_never_match_anonymous_ones() {
        let mut labels = LabelManager::new();
        let entry = labels.function_label("__RET");
        let ret = labels.fresh(LabelKind::Return);
        assert_ne!(entry, ret);
    }
}
