use std::fmt;

use crate::config::{BatchConfig, FailurePolicy};
use crate::converter::FieldConverter;
use crate::copier::{FieldCopier, apply, construct};
use crate::error::CopyError;
use crate::record::{Construct, Record};

/// One element that did not make it into the output.
#[derive(Debug)]
pub struct BatchFailure {
    /// Position of the element in the input sequence.
    pub index: usize,
    pub error: CopyError,
}

/// Result of a batch copy: the produced targets plus every skipped element.
///
/// `items` keeps input order. Skipped elements leave no gap, so the `index`
/// of each failure is the only way to line results back up with inputs.
#[derive(Debug)]
pub struct BatchOutput<T> {
    pub items: Vec<T>,
    pub failures: Vec<BatchFailure>,
    /// The batch stopped early under [`FailurePolicy::Abort`].
    pub aborted: bool,
}

impl<T> BatchOutput<T> {
    fn with_capacity(n: usize) -> Self {
        Self {
            items: Vec::with_capacity(n),
            failures: Vec::new(),
            aborted: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.aborted
    }

    /// `Ok` with all targets if nothing failed, otherwise the full report.
    pub fn into_result(self) -> Result<Vec<T>, PartialFailure<T>> {
        if self.is_complete() {
            Ok(self.items)
        } else {
            Err(PartialFailure {
                items: self.items,
                failures: self.failures,
                aborted: self.aborted,
            })
        }
    }
}

/// A batch where at least one element was skipped.
#[derive(Debug)]
pub struct PartialFailure<T> {
    pub items: Vec<T>,
    pub failures: Vec<BatchFailure>,
    pub aborted: bool,
}

impl<T> fmt::Display for PartialFailure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} element(s) skipped, {} produced",
            self.failures.len(),
            self.items.len()
        )?;
        if let Some(first) = self.failures.first() {
            write!(f, "; first at index {}: {}", first.index, first.error)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug> std::error::Error for PartialFailure<T> {}

/// Maps sequences of records into freshly constructed targets.
#[derive(Debug, Clone, Default)]
pub struct BatchMapper {
    copier: FieldCopier,
    config: BatchConfig,
}

impl BatchMapper {
    pub fn new(copier: FieldCopier) -> Self {
        Self {
            copier,
            config: BatchConfig::default(),
        }
    }

    /// Batch mapper over the process-wide copier.
    pub fn global() -> Self {
        Self::new(FieldCopier::global().clone())
    }

    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn copier(&self) -> &FieldCopier {
        &self.copier
    }

    pub fn policy(&self) -> FailurePolicy {
        self.config.policy
    }

    /// Copy every source into a new `T`, fields as-is.
    pub fn map_all<'s, S, T, I>(&self, sources: I) -> BatchOutput<T>
    where
        S: Record,
        T: Record + Construct,
        I: IntoIterator<Item = &'s S>,
    {
        self.run(sources, None)
    }

    /// Copy every source into a new `T` through `converter`.
    pub fn map_all_with<'s, S, T, I>(&self, sources: I, converter: &dyn FieldConverter) -> BatchOutput<T>
    where
        S: Record,
        T: Record + Construct,
        I: IntoIterator<Item = &'s S>,
    {
        self.run(sources, Some(converter))
    }

    fn run<'s, S, T, I>(&self, sources: I, converter: Option<&dyn FieldConverter>) -> BatchOutput<T>
    where
        S: Record,
        T: Record + Construct,
        I: IntoIterator<Item = &'s S>,
    {
        let mut sources = sources.into_iter().peekable();
        let (lower, _) = sources.size_hint();
        let mut output = BatchOutput::with_capacity(lower);
        if sources.peek().is_none() {
            return output;
        }

        // Every element shares one source type and one target type.
        let plan = self.copier.plan::<S, T>();

        for (index, source) in sources.enumerate() {
            let result = construct::<T>().and_then(|mut target| {
                apply(&plan, source, &mut target, converter).map(|()| target)
            });
            match result {
                Ok(target) => output.items.push(target),
                Err(error) => {
                    tracing::warn!(
                        index,
                        source_type = %plan.source_type,
                        target_type = %plan.target_type,
                        error = %error,
                        "batch element skipped"
                    );
                    output.failures.push(BatchFailure { index, error });
                    if self.config.policy == FailurePolicy::Abort {
                        output.aborted = true;
                        break;
                    }
                }
            }
        }
        output
    }

    /// Map every element with `f`. No field matching, no plan.
    pub fn map_with<I, R, F>(sources: I, f: F) -> Vec<R>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> R,
    {
        sources.into_iter().map(f).collect()
    }

    /// Like [`map_with`](Self::map_with), stopping at the first error `f` returns.
    pub fn try_map_with<I, R, E, F>(sources: I, f: F) -> Result<Vec<R>, E>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Result<R, E>,
    {
        sources.into_iter().map(f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use crate::converter::ParseFields;
    use crate::error::ConstructError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Default, Record)]
    struct Source {
        id: String,
        name: String,
        age: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Record)]
    struct Target {
        id: String,
        name: String,
        age: Option<i32>,
    }

    static FLAKY_CALLS: AtomicUsize = AtomicUsize::new(0);

    /// Fails to construct on every third attempt.
    #[derive(Debug, Record)]
    struct Flaky {
        id: String,
    }

    impl Construct for Flaky {
        fn construct() -> Result<Self, ConstructError> {
            let n = FLAKY_CALLS.fetch_add(1, Ordering::SeqCst);
            if n % 3 == 1 {
                Err(ConstructError::new("out of slots"))
            } else {
                Ok(Flaky { id: String::new() })
            }
        }
    }

    fn make_sources(n: usize) -> Vec<Source> {
        (0..n)
            .map(|i| Source {
                id: i.to_string(),
                name: format!("name{i}"),
                age: format!("11{i}"),
            })
            .collect()
    }

    #[test]
    fn test_map_all_with_converter_keeps_order() {
        let mapper = BatchMapper::new(FieldCopier::new());
        let sources = make_sources(5);

        let out: BatchOutput<Target> =
            mapper.map_all_with(&sources, &ParseFields::integers(["age"]));

        assert!(out.is_complete());
        let ages: Vec<_> = out.items.iter().map(|t| t.age).collect();
        assert_eq!(ages, vec![Some(110), Some(111), Some(112), Some(113), Some(114)]);
        let ids: Vec<_> = out.items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_map_all_empty_input() {
        let mapper = BatchMapper::new(FieldCopier::new());

        let out: BatchOutput<Target> = mapper.map_all(&Vec::<Source>::new());

        assert!(out.items.is_empty());
        assert!(out.is_complete());
        assert!(mapper.copier().cache().is_empty());
    }

    #[test]
    fn test_map_all_builds_plan_once() {
        let mapper = BatchMapper::new(FieldCopier::new());
        let sources = make_sources(10);

        let _: BatchOutput<Target> =
            mapper.map_all_with(&sources, &ParseFields::integers(["age"]));

        assert_eq!(mapper.copier().cache().builds(), 1);
        assert_eq!(mapper.copier().cache().hits(), 0);
    }

    #[test]
    fn test_type_mismatch_skips_every_element() {
        let mapper = BatchMapper::new(FieldCopier::new());
        let sources = make_sources(3);

        let out: BatchOutput<Target> = mapper.map_all(&sources);

        assert!(out.items.is_empty());
        assert_eq!(
            out.failures.iter().map(|f| f.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(out.failures.iter().all(|f| f.error.is_field_error()));
    }

    #[test]
    fn test_construction_failure_is_reported_not_dropped() {
        FLAKY_CALLS.store(0, Ordering::SeqCst);
        let mapper = BatchMapper::new(FieldCopier::new());
        let sources = make_sources(5);

        let out: BatchOutput<Flaky> = mapper.map_all(&sources);

        // Attempts 1 and 4 fail.
        assert_eq!(
            out.items.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            vec!["0", "2", "3"]
        );
        assert_eq!(out.failures.len(), 2);
        assert_eq!(out.failures[0].index, 1);
        assert_eq!(out.failures[1].index, 4);
        assert!(matches!(
            out.failures[0].error,
            CopyError::ConstructionFailed { .. }
        ));

        let report = out.into_result().unwrap_err();
        assert_eq!(report.items.len(), 3);
        assert!(report.to_string().starts_with("2 element(s) skipped, 3 produced"));
    }

    #[test]
    fn test_abort_policy_stops_at_first_failure() {
        let mapper = BatchMapper::new(FieldCopier::new())
            .with_config(BatchConfig::with_policy(FailurePolicy::Abort));
        let mut sources = make_sources(4);
        sources[2].age = "not a number".to_string();

        let out: BatchOutput<Target> =
            mapper.map_all_with(&sources, &ParseFields::integers(["age"]));

        assert!(out.aborted);
        assert_eq!(out.items.len(), 2);
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].index, 2);
    }

    #[test]
    fn test_skip_policy_continues_after_failure() {
        let mapper = BatchMapper::new(FieldCopier::new());
        let mut sources = make_sources(4);
        sources[2].age = "not a number".to_string();

        let out: BatchOutput<Target> =
            mapper.map_all_with(&sources, &ParseFields::integers(["age"]));

        assert!(!out.aborted);
        assert_eq!(
            out.items.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            vec!["0", "1", "3"]
        );
    }

    #[test]
    fn test_map_with_transform() {
        let sources = make_sources(3);

        let names = BatchMapper::map_with(&sources, |s| s.name.clone());

        assert_eq!(names, vec!["name0", "name1", "name2"]);
    }

    #[test]
    fn test_try_map_with_propagates_error() {
        let ages = vec!["1", "x", "3"];

        let result = BatchMapper::try_map_with(ages, |a| a.parse::<i32>());

        assert!(result.is_err());
        let ok = BatchMapper::try_map_with(vec!["1", "2"], |a| a.parse::<i32>());
        assert_eq!(ok, Ok(vec![1, 2]));
    }
}
